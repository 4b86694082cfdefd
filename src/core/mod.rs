pub mod config;
pub mod error;
pub mod types;

pub use config::WeldConfig;
pub use error::{Result, WeldError};
pub use types::{EntryId, ItemId, Transform};
