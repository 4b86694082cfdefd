//! Weldcraft - crafting sandbox core
//!
//! Recursive welded blueprints, the item catalog, inventory persistence and
//! engine-independent instantiation.

pub mod blueprints;
pub mod core;
pub mod crafting;
pub mod instantiate;
pub mod inventory;
