//! Welding two placed blueprints into a composite.
//!
//! The first blueprint becomes the composite's local origin. The second is
//! stored relative to it, so spawning the composite at the first object's
//! world placement reproduces the second object's world placement.

use super::schema::{ShapeBlueprint, WeldPart};
use crate::core::types::{ItemId, Transform};

/// Display name given to the composite of `a` and `b`
pub fn weld_name(a: &ShapeBlueprint, b: &ShapeBlueprint) -> String {
    format!("Welded {}-{}", a.display_name, b.display_name)
}

/// Offset of `b` expressed in `a`'s local frame.
///
/// Position and rotation are made relative; `b`'s scale is carried over
/// unchanged.
pub fn relative_offset(a_world: &Transform, b_world: &Transform) -> Transform {
    Transform {
        position: a_world.inverse_transform_point(b_world.position),
        rotation: (a_world.rotation.inverse() * b_world.rotation).normalize(),
        scale: b_world.scale,
    }
}

/// Build a composite from two blueprints and their world placements.
///
/// The result gets a fresh id that never collides with catalog ids, so it
/// never resolves to a catalog visual.
pub fn weld(
    a: &ShapeBlueprint,
    a_world: &Transform,
    b: &ShapeBlueprint,
    b_world: &Transform,
) -> ShapeBlueprint {
    let offset = relative_offset(a_world, b_world);
    let composite = ShapeBlueprint::composite(
        ItemId::composite(),
        weld_name(a, b),
        vec![WeldPart::anchored(a.clone()), WeldPart::new(b.clone(), offset)],
    );

    tracing::debug!(
        "Welded {} and {} into {} ({})",
        a.item_id,
        b.item_id,
        composite.item_id,
        composite.display_name
    );

    composite
}
