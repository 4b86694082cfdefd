//! Adapter from a `NodeTree` onto a host scene graph.
//!
//! Engines implement `SceneHost`; `apply_to_host` replays a tree onto it in
//! creation order, so every parent exists before its children.

use glam::{Quat, Vec3};

use crate::core::types::Transform;

use super::node::NodeTree;

/// Scene graph operations a host engine provides
pub trait SceneHost {
    /// Host-side reference to a created node
    type Handle: Copy;

    /// Create an empty named node under `parent` (or at the scene root)
    fn create_node(
        &mut self,
        name: &str,
        position: Vec3,
        rotation: Quat,
        parent: Option<Self::Handle>,
    ) -> Self::Handle;

    /// Instantiate the visual resource as content of `node`
    fn attach_visual(&mut self, node: Self::Handle, visual: &str);

    fn set_local_transform(&mut self, node: Self::Handle, position: Vec3, rotation: Quat, scale: Vec3);

    /// Apply a classification to `node` and everything beneath it
    fn set_tag(&mut self, node: Self::Handle, tag: &str);
}

/// Replay `tree` onto `host`, attaching its roots under `parent`.
///
/// Returns the host handle of every node, indexed by `NodeId`.
pub fn apply_to_host<H: SceneHost>(
    tree: &NodeTree,
    host: &mut H,
    parent: Option<H::Handle>,
) -> Vec<H::Handle> {
    let mut handles: Vec<H::Handle> = Vec::with_capacity(tree.len());

    for node in tree.iter() {
        let node_parent = match node.parent {
            Some(p) => handles.get(p.0).copied(),
            None => parent,
        };
        let local: &Transform = &node.local;

        // create_node has no scale, so every node gets its full local transform
        let handle = host.create_node(&node.name, local.position, local.rotation, node_parent);
        host.set_local_transform(handle, local.position, local.rotation, local.scale);

        if let Some(visual) = &node.visual {
            host.attach_visual(handle, &visual.handle);
            host.set_tag(handle, &visual.tag);
        }

        handles.push(handle);
    }

    handles
}
