//! In-memory scene hierarchy produced by instantiation.
//!
//! Nodes live in an arena and refer to each other by `NodeId`. Each node
//! stores only its local transform; world placements are composed on demand.

use crate::core::types::{ItemId, Transform};

/// Index of a node inside its `NodeTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Visual attached to a node, resolved from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct VisualAttachment {
    /// Catalog item the visual was resolved from
    pub item_id: ItemId,
    /// Opaque visual handle for the host
    pub handle: String,
    /// Classification used by downstream selection logic
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub local: Transform,
    pub visual: Option<VisualAttachment>,
    pub children: Vec<NodeId>,
}

/// Arena of nodes in creation order
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and link it under `parent`
    pub fn add(&mut self, name: impl Into<String>, parent: Option<NodeId>, local: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            name: name.into(),
            parent,
            local,
            visual: None,
            children: Vec::new(),
        });
        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            parent_node.children.push(id);
        }
        id
    }

    pub fn set_visual(&mut self, id: NodeId, visual: VisualAttachment) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.visual = Some(visual);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Nodes in creation order; parents always precede their children
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Nodes carrying a visual, in creation order
    pub fn visuals(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.visual.is_some())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Placement of a node relative to the tree's root space
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            chain.push(node.local);
            current = node.parent;
        }

        Some(
            chain
                .iter()
                .rev()
                .fold(Transform::IDENTITY, |acc, local| acc.mul_transform(local)),
        )
    }

    /// First node with the given name, in creation order
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}
