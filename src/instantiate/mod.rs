//! Composite instantiation: blueprint trees to positioned node hierarchies.

pub mod host;
pub mod node;
pub mod spawner;

pub use host::{apply_to_host, SceneHost};
pub use node::{Node, NodeId, NodeTree, VisualAttachment};
pub use spawner::{Spawned, Spawner};
