pub mod icons;
pub mod persistence;
pub mod save_file;
pub mod store;

pub use icons::{resolve_icon, snapshot_key, write_snapshot, IconSource};
pub use persistence::{FileStore, MemoryStore, Persistence};
pub use save_file::SaveFile;
pub use store::{InventoryStore, LoadOutcome, Shelf, StoredBlueprint};
