//! Weldcraft - Entry Point
//!
//! Interactive shell over the crafting core. It loads the catalog and the
//! save file, then lets you list items, weld two of them through a crafting
//! session, claim results from the pile and inspect spawned hierarchies.

use weldcraft::blueprints::{validate, Catalog};
use weldcraft::core::error::Result;
use weldcraft::core::types::Transform;
use weldcraft::core::WeldConfig;
use weldcraft::crafting::{
    CraftingSession, CraftingState, InventorySelection, PileSelection, Pose, SceneLayout,
};
use weldcraft::instantiate::Spawner;
use weldcraft::inventory::{FileStore, InventoryStore, LoadOutcome, Persistence, StoredBlueprint};

use clap::Parser;
use glam::{Quat, Vec3};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Weld items together and manage the inventory
#[derive(Parser, Debug)]
#[command(name = "weldcraft")]
#[command(about = "Interactive crafting shell: weld items, claim results, inspect blueprints")]
struct Args {
    /// Directory holding the save file and snapshot images
    #[arg(long, default_value = "save")]
    data_dir: PathBuf,

    /// Catalog of base items (TOML with [[items]] tables)
    #[arg(long, default_value = "data/catalog.toml")]
    catalog: PathBuf,

    /// Optional config file overriding defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weldcraft=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => WeldConfig::load(path)?,
        None => WeldConfig::default(),
    };
    let catalog = Catalog::load_toml(&args.catalog)?;

    let mut store = InventoryStore::new(catalog, FileStore::new(&args.data_dir), config.clone());
    match store.load()? {
        LoadOutcome::NewGame { items } => println!("New game: {} starter items", items),
        LoadOutcome::Restored { inventory, pile } => {
            println!("Loaded {} inventory items, {} in the pile", inventory, pile)
        }
    }

    let layout = SceneLayout {
        crafting_view: Pose::new(Vec3::new(0.0, 4.0, -6.0), Quat::from_rotation_x(30f32.to_radians())),
        welding_view: Pose::new(Vec3::new(0.0, 2.0, -2.5), Quat::from_rotation_x(20f32.to_radians())),
        spawn_point: Vec3::new(0.0, 1.0, 0.0),
    };
    let mut session = CraftingSession::new(config, layout, Pose::default());
    let mut crafting_picks = InventorySelection::new();
    let mut pile_pick = PileSelection::new();
    let clock = Instant::now();

    println!("\n=== WELDCRAFT ===");
    println!();
    println!("Commands:");
    println!("  inv / pile            - List inventory or crafting pile");
    println!("  show inv|pile <n>     - Spawn an item and print its hierarchy");
    println!("  check inv|pile <n>    - Validate an item against the catalog");
    println!("  craft <i> <j>         - Start welding inventory items i and j");
    println!("  move <x> <y> <z>      - Move the object being placed");
    println!("  rot x|y|z             - Rotate the object being placed");
    println!("  done                  - Confirm the current placement");
    println!("  weld                  - Weld the placed objects into the pile");
    println!("  claim <n>             - Move pile item n to the inventory");
    println!("  clear                 - Empty the crafting pile");
    println!("  save / load           - Write or re-read the save file");
    println!("  quit / q              - Exit");
    println!();

    loop {
        let state = session.state();
        session.tick(clock.elapsed().as_secs_f64());
        if session.state() != state {
            println!("[{}]", session.state().name());
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            continue;
        };
        let now = clock.elapsed().as_secs_f64();
        session.tick(now);

        match command {
            "quit" | "q" => break,
            "inv" => list("Inventory", store.inventory(), &store),
            "pile" => list("Crafting pile", store.pile(), &store),
            "show" => match pick(&store, rest) {
                Some(entry) => show(&store, entry),
                None => println!("Usage: show inv|pile <n>"),
            },
            "check" => match pick(&store, rest) {
                Some(entry) => match validate(&entry.blueprint, store.catalog(), store.config()) {
                    Ok(()) => println!("{} is valid", entry.blueprint.display_name),
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: check inv|pile <n>"),
            },
            "craft" => {
                crafting_picks.clear();
                for word in rest.iter().take(InventorySelection::MAX) {
                    if let Some(entry) = parse_index(Some(word)).and_then(|n| store.inventory().get(n)) {
                        crafting_picks.toggle(entry.id);
                    }
                }
                let blueprints = crafting_picks.take_pair().and_then(|(a, b)| {
                    Some((
                        store.find(a)?.0.blueprint.clone(),
                        store.find(b)?.0.blueprint.clone(),
                    ))
                });
                match blueprints {
                    Some((a, b)) => match session.start(a, b, now) {
                        Ok(()) => println!("Moving camera..."),
                        Err(e) => println!("{}", e),
                    },
                    None => println!("Usage: craft <i> <j> (two different inventory indices)"),
                }
            }
            "move" => {
                let coords: Vec<f32> = rest.iter().filter_map(|w| w.parse().ok()).collect();
                if coords.len() != 3 {
                    println!("Usage: move <x> <y> <z>");
                    continue;
                }
                let offset = Vec3::new(coords[0], coords[1], coords[2]);
                let dt = 1.0 / store.config().move_speed;
                if !session.translate(offset, dt) {
                    println!("Nothing is being placed");
                }
            }
            "rot" => {
                let axis = match rest.first().copied() {
                    Some("x") => Vec3::X,
                    Some("y") => Vec3::Y,
                    Some("z") => Vec3::Z,
                    _ => {
                        println!("Usage: rot x|y|z");
                        continue;
                    }
                };
                if !session.rotate(axis) {
                    println!("Nothing is being placed");
                }
            }
            "done" => {
                if session.is_camera_moving() {
                    println!("Camera still moving...");
                } else if session.done(now) {
                    println!("[{}]", session.state().name());
                } else {
                    println!("Nothing to confirm");
                }
            }
            "weld" => {
                if session.state() != CraftingState::ReadyToWeld {
                    println!("Not ready to weld yet ({})", session.state().name());
                    continue;
                }
                match session.finish(&mut store, None) {
                    Ok(outcome) => println!("SUCCESS: Saved {} to crafting pile", outcome.display_name),
                    Err(e) => println!("{}", e),
                }
            }
            "claim" => {
                pile_pick.clear();
                if let Some(entry) = parse_index(rest.first()).and_then(|n| store.pile().get(n)) {
                    pile_pick.toggle(entry.id);
                }
                match pile_pick.take() {
                    Some(id) => match store.move_to_inventory(id) {
                        Ok(_) => println!("Claimed"),
                        Err(e) => println!("Claim failed: {}", e),
                    },
                    None => println!("Usage: claim <n> (pile index)"),
                }
            }
            "clear" => match store.clear_pile() {
                Ok(removed) => println!("Removed {} items from the pile", removed),
                Err(e) => println!("Clear failed: {}", e),
            },
            "save" => match store.save() {
                Ok(()) => println!("Saved"),
                Err(e) => println!("Save failed: {}", e),
            },
            "load" => match store.load() {
                Ok(_) => println!("Reloaded"),
                Err(e) => println!("Load failed: {}", e),
            },
            _ => println!("Unknown command: {}", command),
        }
    }

    Ok(())
}

fn parse_index(word: Option<&&str>) -> Option<usize> {
    word.and_then(|w| w.parse().ok())
}

fn pick<'a, P: Persistence>(store: &'a InventoryStore<P>, rest: &[&str]) -> Option<&'a StoredBlueprint> {
    let list = match rest.first().copied() {
        Some("inv") => store.inventory(),
        Some("pile") => store.pile(),
        _ => return None,
    };
    parse_index(rest.get(1)).and_then(|n| list.get(n))
}

fn list<P: Persistence>(title: &str, entries: &[StoredBlueprint], store: &InventoryStore<P>) {
    println!("{} ({}):", title, entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let kind = if entry.blueprint.is_simple() {
            "simple".to_string()
        } else {
            format!("{} parts", entry.blueprint.node_count() - 1)
        };
        let icon = match store.icon_for(entry.id) {
            Some(icon) => format!("{:?}", icon),
            None => "no icon".to_string(),
        };
        println!("  [{}] {} ({}, {})", index, entry.blueprint.display_name, kind, icon);
    }
}

fn show<P: Persistence>(store: &InventoryStore<P>, entry: &StoredBlueprint) {
    let spawner = Spawner::new(store.catalog(), store.config());
    let spawned = spawner.spawn(&entry.blueprint, Transform::IDENTITY);

    for node in spawned.tree.iter() {
        let mut depth = 0;
        let mut parent = node.parent;
        while let Some(p) = parent {
            depth += 1;
            parent = spawned.tree.get(p).and_then(|n| n.parent);
        }
        let world = spawned.tree.world_transform(node.id).unwrap_or_default();
        let visual = node
            .visual
            .as_ref()
            .map(|v| format!(" <{}>", v.handle))
            .unwrap_or_default();
        println!(
            "{}{} @ ({:.2}, {:.2}, {:.2}){}",
            "  ".repeat(depth),
            node.name,
            world.position.x,
            world.position.y,
            world.position.z,
            visual
        );
    }

    for miss in &spawned.leaf_misses {
        println!("  ! unknown catalog item: {}", miss);
    }
}
