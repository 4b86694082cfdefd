//! Icon lookup for inventory entries.
//!
//! A welded item may have a snapshot image stored next to the save file under
//! `<itemID>.png`. Otherwise simple items use their catalog icon, and welded
//! items without a snapshot borrow the icon of their first part.

use crate::blueprints::{Catalog, ShapeBlueprint};
use crate::core::error::Result;
use crate::core::types::ItemId;

use super::persistence::Persistence;

/// Where an entry's icon comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Snapshot side-file key in the persistence backend
    Snapshot(String),
    /// Icon handle from the catalog
    Catalog(String),
}

/// Key of the snapshot side-file for `item_id`
pub fn snapshot_key(item_id: &ItemId) -> String {
    format!("{}.png", item_id)
}

/// Store a rendered snapshot for a welded item
pub fn write_snapshot<P: Persistence>(backend: &mut P, item_id: &ItemId, png: &[u8]) -> Result<()> {
    let key = snapshot_key(item_id);
    backend.write(&key, png)?;
    tracing::info!("Saved icon snapshot to {}", key);
    Ok(())
}

/// Resolve the icon for a blueprint
pub fn resolve_icon<P: Persistence>(
    blueprint: &ShapeBlueprint,
    catalog: &Catalog,
    backend: &P,
) -> Option<IconSource> {
    let key = snapshot_key(&blueprint.item_id);
    if backend.exists(&key) {
        return Some(IconSource::Snapshot(key));
    }

    if let Some(icon) = catalog
        .get(blueprint.item_id.as_str())
        .and_then(|entry| entry.icon.as_ref())
    {
        return Some(IconSource::Catalog(icon.clone()));
    }

    let first = blueprint.children.first()?;
    tracing::debug!(
        "No icon for {}, falling back to part {}",
        blueprint.item_id,
        first.blueprint.item_id
    );
    resolve_icon(&first.blueprint, catalog, backend)
}
