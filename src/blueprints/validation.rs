//! Structural validation of blueprint trees.
//!
//! Save files are plain JSON and may be edited by hand, so loaded trees are
//! checked before use: simple shapes must name catalog items, part
//! transforms must be finite with a unit rotation and a bounded positive
//! scale, and nesting must stay within the configured depth. Cycles cannot
//! occur because every part owns its nested blueprint.

use super::catalog::Catalog;
use super::schema::{ShapeBlueprint, WeldPart};
use crate::core::config::WeldConfig;
use crate::core::error::{Result, WeldError};

const ROTATION_NORM_TOLERANCE: f32 = 1e-3;

/// Validate a blueprint tree, collecting every problem found
pub fn validate(blueprint: &ShapeBlueprint, catalog: &Catalog, config: &WeldConfig) -> Result<()> {
    let mut errors = Vec::new();
    validate_node(blueprint, catalog, config, 1, &blueprint.display_name, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(WeldError::Validation(errors))
    }
}

/// Check only the part transforms of a tree.
///
/// Non-finite values serialize as `null` and make the save file unreadable,
/// so anything written to the store must pass this.
pub fn validate_transforms(blueprint: &ShapeBlueprint, config: &WeldConfig) -> Result<()> {
    let mut errors = Vec::new();
    collect_transform_errors(blueprint, config, &blueprint.display_name, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(WeldError::Validation(errors))
    }
}

fn collect_transform_errors(
    blueprint: &ShapeBlueprint,
    config: &WeldConfig,
    path: &str,
    errors: &mut Vec<String>,
) {
    for (index, part) in blueprint.children.iter().enumerate() {
        let child_path = format!("{}/{}[{}]", path, part.blueprint.display_name, index);
        validate_part(part, config, &child_path, errors);
        collect_transform_errors(&part.blueprint, config, &child_path, errors);
    }
}

fn validate_node(
    blueprint: &ShapeBlueprint,
    catalog: &Catalog,
    config: &WeldConfig,
    depth: usize,
    path: &str,
    errors: &mut Vec<String>,
) {
    if depth > config.max_weld_depth {
        errors.push(format!(
            "'{}' is nested {} levels deep (max {})",
            path, depth, config.max_weld_depth
        ));
        return;
    }

    if blueprint.is_simple() && !catalog.contains(blueprint.item_id.as_str()) {
        errors.push(format!(
            "'{}' is a simple shape but '{}' is not in the catalog",
            path, blueprint.item_id
        ));
    }

    for (index, part) in blueprint.children.iter().enumerate() {
        let child_path = format!("{}/{}[{}]", path, part.blueprint.display_name, index);
        validate_part(part, config, &child_path, errors);
        validate_node(&part.blueprint, catalog, config, depth + 1, &child_path, errors);
    }
}

fn validate_part(part: &WeldPart, config: &WeldConfig, path: &str, errors: &mut Vec<String>) {
    let local = part.local_transform();
    if !local.is_finite() {
        errors.push(format!("'{}' has a non-finite transform", path));
        return;
    }

    let rotation_len = part.local_rotation.length();
    if (rotation_len - 1.0).abs() > ROTATION_NORM_TOLERANCE {
        errors.push(format!(
            "'{}' rotation is not normalized (length {:.4})",
            path, rotation_len
        ));
    }

    let scale = part.local_scale;
    if scale.min_element() <= 0.0 || scale.max_element() > config.max_part_scale {
        errors.push(format!(
            "'{}' scale {:?} is outside (0, {}]",
            path,
            scale.to_array(),
            config.max_part_scale
        ));
    }
}
