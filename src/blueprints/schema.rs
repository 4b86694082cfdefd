//! Blueprint schema types for JSON (de)serialization.
//!
//! A `ShapeBlueprint` is either simple (no children, its id names a catalog
//! item) or welded (one or more `WeldPart`s, each placing a nested blueprint
//! relative to the parent's frame). Key names and the `{x,y,z}` / `{x,y,z,w}`
//! vector layout match the save files written by earlier versions of the game.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::types::{ItemId, Transform};

/// Recursive item descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeBlueprint {
    /// Catalog id for simple shapes, synthetic id for welded shapes
    #[serde(rename = "itemID")]
    pub item_id: ItemId,
    /// Name shown in UI and debug output
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    /// Empty for simple shapes
    #[serde(default)]
    pub children: Vec<WeldPart>,
}

/// One child attachment of a welded shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeldPart {
    #[serde(rename = "partBlueprint")]
    pub blueprint: ShapeBlueprint,
    #[serde(rename = "localPos", with = "vec3_xyz", default)]
    pub local_position: Vec3,
    #[serde(rename = "localRot", with = "quat_xyzw", default = "identity_rotation")]
    pub local_rotation: Quat,
    #[serde(rename = "localScale", with = "vec3_xyz", default = "unit_scale")]
    pub local_scale: Vec3,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl ShapeBlueprint {
    /// A leaf blueprint referring directly to a catalog item
    pub fn simple(item_id: impl Into<ItemId>, display_name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            display_name: display_name.into(),
            children: Vec::new(),
        }
    }

    /// A blueprint built entirely from its parts
    pub fn composite(
        item_id: impl Into<ItemId>,
        display_name: impl Into<String>,
        children: Vec<WeldPart>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            display_name: display_name.into(),
            children,
        }
    }

    pub fn is_simple(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// Nesting depth; a simple blueprint has depth 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|part| part.blueprint.depth())
            .max()
            .unwrap_or(0)
    }

    /// Total number of blueprints in this tree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|part| part.blueprint.node_count())
            .sum::<usize>()
    }

    /// Ids of all simple blueprints in pre-order
    pub fn leaf_ids(&self) -> Vec<&ItemId> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids<'a>(&'a self, out: &mut Vec<&'a ItemId>) {
        if self.is_simple() {
            out.push(&self.item_id);
        }
        for part in &self.children {
            part.blueprint.collect_leaf_ids(out);
        }
    }

    /// Structural equality with a tolerance on transform components
    pub fn approx_eq(&self, other: &ShapeBlueprint, max_abs_diff: f32) -> bool {
        self.item_id == other.item_id
            && self.display_name == other.display_name
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.approx_eq(b, max_abs_diff))
    }
}

impl WeldPart {
    pub fn new(blueprint: ShapeBlueprint, local: Transform) -> Self {
        Self {
            blueprint,
            local_position: local.position,
            local_rotation: local.rotation,
            local_scale: local.scale,
        }
    }

    /// Part at the parent's origin with no rotation or scaling
    pub fn anchored(blueprint: ShapeBlueprint) -> Self {
        Self::new(blueprint, Transform::IDENTITY)
    }

    pub fn local_transform(&self) -> Transform {
        Transform::new(self.local_position, self.local_rotation, self.local_scale)
    }

    pub fn approx_eq(&self, other: &WeldPart, max_abs_diff: f32) -> bool {
        self.local_transform()
            .abs_diff_eq(&other.local_transform(), max_abs_diff)
            && self.blueprint.approx_eq(&other.blueprint, max_abs_diff)
    }
}

mod vec3_xyz {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let Xyz { x, y, z } = Xyz::deserialize(deserializer)?;
        Ok(Vec3::new(x, y, z))
    }
}

mod quat_xyzw {
    use glam::Quat;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyzw {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        z: f32,
        #[serde(default)]
        w: f32,
    }

    pub fn serialize<S: Serializer>(q: &Quat, serializer: S) -> Result<S::Ok, S::Error> {
        Xyzw {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Quat, D::Error> {
        let Xyzw { x, y, z, w } = Xyzw::deserialize(deserializer)?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_leg() -> ShapeBlueprint {
        ShapeBlueprint::composite(
            "weld-1",
            "Welded Plank-Leg",
            vec![
                WeldPart::anchored(ShapeBlueprint::simple("plank", "Plank")),
                WeldPart::new(
                    ShapeBlueprint::simple("leg", "Leg"),
                    Transform::new(
                        Vec3::new(0.0, -1.0, 0.5),
                        Quat::from_rotation_x(0.5),
                        Vec3::new(1.0, 2.0, 1.0),
                    ),
                ),
            ],
        )
    }

    #[test]
    fn test_wire_key_names() {
        let json = serde_json::to_value(table_with_leg()).unwrap();

        assert_eq!(json["itemID"], "weld-1");
        assert_eq!(json["displayName"], "Welded Plank-Leg");
        let leg = &json["children"][1];
        assert_eq!(leg["partBlueprint"]["itemID"], "leg");
        assert_eq!(leg["localPos"]["y"], -1.0);
        assert_eq!(leg["localScale"]["y"], 2.0);
        assert!(leg["localRot"]["w"].is_number());
        assert_eq!(leg["partBlueprint"]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_children_defaults_to_simple() {
        let bp: ShapeBlueprint =
            serde_json::from_str(r#"{ "itemID": "cube", "displayName": "Cube" }"#).unwrap();
        assert!(bp.is_simple());
        assert_eq!(bp.item_id, ItemId::from("cube"));
    }

    #[test]
    fn test_part_without_transform_is_anchored() {
        let bp: ShapeBlueprint = serde_json::from_str(
            r#"{ "itemID": "w", "displayName": "W",
                 "children": [ { "partBlueprint": { "itemID": "cube", "displayName": "Cube" } } ] }"#,
        )
        .unwrap();
        assert_eq!(bp.children[0].local_transform(), Transform::IDENTITY);
    }

    #[test]
    fn test_depth_and_counts() {
        let nested = ShapeBlueprint::composite(
            "outer",
            "Outer",
            vec![
                WeldPart::anchored(table_with_leg()),
                WeldPart::anchored(ShapeBlueprint::simple("cube", "Cube")),
            ],
        );

        assert_eq!(ShapeBlueprint::simple("cube", "Cube").depth(), 1);
        assert_eq!(table_with_leg().depth(), 2);
        assert_eq!(nested.depth(), 3);
        assert_eq!(nested.node_count(), 5);

        let leaves: Vec<&str> = nested.leaf_ids().into_iter().map(|id| id.as_str()).collect();
        assert_eq!(leaves, vec!["plank", "leg", "cube"]);
    }

    #[test]
    fn test_approx_eq_tolerates_float_noise() {
        let a = table_with_leg();
        let mut b = a.clone();
        b.children[1].local_position.x += 1e-7;
        assert!(a.approx_eq(&b, 1e-5));

        b.children[1].local_position.x += 1.0;
        assert!(!a.approx_eq(&b, 1e-5));
    }
}
