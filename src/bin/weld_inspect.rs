//! Save File Inspector
//!
//! Prints the blueprint trees stored in an inventory save file and optionally
//! validates them against a catalog.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use weldcraft::blueprints::{validate, Catalog, ShapeBlueprint};
use weldcraft::core::{WeldConfig, WeldError};
use weldcraft::inventory::SaveFile;

/// Inspect an inventory save file
#[derive(Parser, Debug)]
#[command(name = "weld_inspect")]
#[command(about = "Print and validate the blueprint trees in a save file")]
struct Args {
    /// Save file to read
    #[arg(long)]
    save: PathBuf,

    /// Catalog used for validation (TOML with [[items]] tables)
    #[arg(long, default_value = "data/catalog.toml")]
    catalog: PathBuf,

    /// Validate every blueprint and exit non-zero on problems
    #[arg(long)]
    validate: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON summary of one stored blueprint
#[derive(Serialize)]
struct EntrySummary<'a> {
    shelf: &'static str,
    item_id: &'a str,
    display_name: &'a str,
    depth: usize,
    parts: usize,
    leaves: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    problems: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let save = match std::fs::read(&args.save)
        .map_err(WeldError::from)
        .and_then(|bytes| SaveFile::from_slice(&bytes))
    {
        Ok(save) => save,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.save.display(), e);
            std::process::exit(1);
        }
    };

    let catalog = if args.validate {
        match Catalog::load_toml(&args.catalog) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                eprintln!("Failed to load catalog {}: {}", args.catalog.display(), e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };
    let config = WeldConfig::default();

    let mut summaries = Vec::new();
    let shelves = [("inventory", &save.inventory), ("pile", &save.pile)];
    for (shelf, blueprints) in shelves {
        for blueprint in blueprints.iter() {
            let problems = match &catalog {
                Some(catalog) => match validate(blueprint, catalog, &config) {
                    Ok(()) => Vec::new(),
                    Err(WeldError::Validation(errors)) => errors,
                    Err(e) => vec![e.to_string()],
                },
                None => Vec::new(),
            };
            summaries.push(EntrySummary {
                shelf,
                item_id: blueprint.item_id.as_str(),
                display_name: &blueprint.display_name,
                depth: blueprint.depth(),
                parts: blueprint.node_count() - 1,
                leaves: blueprint.leaf_ids().into_iter().map(|id| id.as_str()).collect(),
                problems,
            });
        }
    }

    if args.format == "json" {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!(
            "{} inventory items, {} pile items",
            save.inventory.len(),
            save.pile.len()
        );
        for (shelf, blueprints) in shelves {
            println!("\n[{}]", shelf);
            for blueprint in blueprints.iter() {
                print_tree(blueprint, 1);
            }
        }
        for summary in summaries.iter().filter(|s| !s.problems.is_empty()) {
            println!("\n{} ({}):", summary.display_name, summary.item_id);
            for problem in &summary.problems {
                println!("  - {}", problem);
            }
        }
    }

    if summaries.iter().any(|s| !s.problems.is_empty()) {
        std::process::exit(2);
    }
}

fn print_tree(blueprint: &ShapeBlueprint, depth: usize) {
    println!("{}{} ({})", "  ".repeat(depth), blueprint.display_name, blueprint.item_id);
    for part in &blueprint.children {
        let p = part.local_position;
        println!(
            "{}  @ ({:.3}, {:.3}, {:.3}) scale ({:.2}, {:.2}, {:.2})",
            "  ".repeat(depth),
            p.x,
            p.y,
            p.z,
            part.local_scale.x,
            part.local_scale.y,
            part.local_scale.z
        );
        print_tree(&part.blueprint, depth + 1);
    }
}
