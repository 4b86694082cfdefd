//! Crafting flow: selection, camera transitions and the weld session.

pub mod selection;
pub mod session;
pub mod transition;

pub use selection::{InventorySelection, PileSelection};
pub use session::{CraftingSession, CraftingState, PlacedObject, SceneLayout, WeldOutcome};
pub use transition::{smoothstep, Pose, Transition};
