//! Recursive blueprint instantiation.
//!
//! `Spawner` turns a `ShapeBlueprint` into a `NodeTree`: a root node at the
//! requested frame, a visual node for every blueprint whose id resolves in the
//! catalog, and one holder node per weld part carrying that part's local
//! transform. Nodes are created depth-first in pre-order.

use crate::blueprints::{Catalog, ShapeBlueprint};
use crate::core::config::WeldConfig;
use crate::core::error::{Result, WeldError};
use crate::core::types::{ItemId, Transform};

use super::node::{NodeId, NodeTree, VisualAttachment};

/// Result of instantiating one blueprint
#[derive(Debug, Clone)]
pub struct Spawned {
    pub tree: NodeTree,
    pub root: NodeId,
    /// Simple blueprints whose id was missing from the catalog
    pub leaf_misses: Vec<ItemId>,
}

impl Spawned {
    /// World placement of the first node with the given name
    pub fn world_of(&self, name: &str) -> Option<Transform> {
        self.tree
            .find_by_name(name)
            .and_then(|node| self.tree.world_transform(node.id))
    }
}

/// Builds node trees from blueprints
pub struct Spawner<'a> {
    catalog: &'a Catalog,
    tag: String,
}

impl<'a> Spawner<'a> {
    /// Create a spawner tagging visuals with the configured classification
    pub fn new(catalog: &'a Catalog, config: &WeldConfig) -> Self {
        Self {
            catalog,
            tag: config.interactive_tag.clone(),
        }
    }

    /// Instantiate `blueprint` with its root placed at `frame`.
    ///
    /// Welded shapes are never in the catalog, so their own misses are
    /// expected and ignored. A simple shape that misses is a data error: it
    /// gets no visual and is listed in `leaf_misses`.
    ///
    /// The blueprint tree must be finite; depth is not limited here (see
    /// `blueprints::validate`).
    pub fn spawn(&self, blueprint: &ShapeBlueprint, frame: Transform) -> Spawned {
        let mut tree = NodeTree::new();
        let mut leaf_misses = Vec::new();

        let root = tree.add(blueprint.display_name.clone(), None, frame);
        self.build_recursive(&mut tree, root, blueprint, &mut leaf_misses);

        if !leaf_misses.is_empty() {
            tracing::warn!(
                "Spawned {} with {} unresolved simple parts",
                blueprint.display_name,
                leaf_misses.len()
            );
        }

        Spawned {
            tree,
            root,
            leaf_misses,
        }
    }

    /// Like `spawn`, but fails on the first simple shape missing from the catalog
    pub fn spawn_checked(&self, blueprint: &ShapeBlueprint, frame: Transform) -> Result<Spawned> {
        let spawned = self.spawn(blueprint, frame);
        match spawned.leaf_misses.first() {
            Some(item_id) => Err(WeldError::LeafNotInCatalog {
                item_id: item_id.to_string(),
            }),
            None => Ok(spawned),
        }
    }

    fn build_recursive(
        &self,
        tree: &mut NodeTree,
        parent: NodeId,
        blueprint: &ShapeBlueprint,
        leaf_misses: &mut Vec<ItemId>,
    ) {
        match self.catalog.resolve(&blueprint.item_id) {
            Ok(entry) => {
                // The holder carries the placement; the visual sits at its origin
                let visual = tree.add(entry.visual_name(), Some(parent), Transform::IDENTITY);
                tree.set_visual(
                    visual,
                    VisualAttachment {
                        item_id: entry.id.clone(),
                        handle: entry.visual.clone(),
                        tag: self.tag.clone(),
                    },
                );
            }
            Err(_) if blueprint.is_composite() => {
                tracing::debug!("Composite {} has no catalog visual", blueprint.item_id);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                leaf_misses.push(blueprint.item_id.clone());
            }
        }

        for part in &blueprint.children {
            let holder = tree.add(
                part.blueprint.display_name.clone(),
                Some(parent),
                part.local_transform(),
            );
            self.build_recursive(tree, holder, &part.blueprint, leaf_misses);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprints::{CatalogEntry, WeldPart};
    use glam::{Quat, Vec3};

    fn catalog() -> Catalog {
        Catalog::load(vec![
            CatalogEntry::new("cube", "prefabs/Cube.prefab", Some("icons/cube.png")),
            CatalogEntry::new("rod", "prefabs/Rod.prefab", None),
        ])
    }

    #[test]
    fn test_simple_blueprint() {
        let catalog = catalog();
        let spawner = Spawner::new(&catalog, &WeldConfig::default());
        let frame = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));

        let spawned = spawner.spawn(&ShapeBlueprint::simple("cube", "Cube"), frame);

        assert_eq!(spawned.tree.len(), 2);
        let root = spawned.tree.get(spawned.root).unwrap();
        assert_eq!(root.name, "Cube");
        assert_eq!(root.local, frame);

        let visual = spawned.tree.get(root.children[0]).unwrap();
        assert_eq!(visual.local, Transform::IDENTITY);
        let attachment = visual.visual.as_ref().unwrap();
        assert_eq!(attachment.handle, "prefabs/Cube.prefab");
        assert_eq!(attachment.tag, "CraftingObjects");
        assert!(spawned.leaf_misses.is_empty());
    }

    #[test]
    fn test_composite_preorder() {
        let catalog = catalog();
        let spawner = Spawner::new(&catalog, &WeldConfig::default());
        let welded = ShapeBlueprint::composite(
            "weld-1",
            "Welded Cube-Rod",
            vec![
                WeldPart::anchored(ShapeBlueprint::simple("cube", "Cube")),
                WeldPart::new(
                    ShapeBlueprint::simple("rod", "Rod"),
                    Transform::new(Vec3::X, Quat::IDENTITY, Vec3::splat(2.0)),
                ),
            ],
        );

        let spawned = spawner.spawn(&welded, Transform::IDENTITY);

        let names: Vec<&str> = spawned.tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Welded Cube-Rod", "Cube", "Cube", "Rod", "Rod"]);
        assert_eq!(spawned.tree.visuals().count(), 2);
        assert!(spawned.leaf_misses.is_empty());

        let rod_holder = spawned.tree.find_by_name("Rod").unwrap();
        assert_eq!(rod_holder.local.scale, Vec3::splat(2.0));
        assert!(rod_holder.visual.is_none());
    }

    #[test]
    fn test_leaf_miss_reported() {
        let catalog = catalog();
        let spawner = Spawner::new(&catalog, &WeldConfig::default());
        let welded = ShapeBlueprint::composite(
            "weld-2",
            "Broken",
            vec![WeldPart::anchored(ShapeBlueprint::simple("sphere", "Sphere"))],
        );

        let spawned = spawner.spawn(&welded, Transform::IDENTITY);
        assert_eq!(spawned.leaf_misses, vec![ItemId::from("sphere")]);
        assert_eq!(spawned.tree.visuals().count(), 0);

        match spawner.spawn_checked(&welded, Transform::IDENTITY) {
            Err(WeldError::LeafNotInCatalog { item_id }) => assert_eq!(item_id, "sphere"),
            other => panic!("Expected LeafNotInCatalog, got {:?}", other.map(|s| s.tree.len())),
        }
    }

    #[test]
    fn test_custom_tag() {
        let catalog = catalog();
        let config = WeldConfig {
            interactive_tag: "Weldable".to_string(),
            ..WeldConfig::default()
        };
        let spawned = Spawner::new(&catalog, &config)
            .spawn(&ShapeBlueprint::simple("rod", "Rod"), Transform::IDENTITY);

        let tags: Vec<&str> = spawned
            .tree
            .visuals()
            .filter_map(|n| n.visual.as_ref().map(|v| v.tag.as_str()))
            .collect();
        assert_eq!(tags, vec!["Weldable"]);
    }
}
