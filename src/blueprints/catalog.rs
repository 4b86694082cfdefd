//! Item catalog: the read-only registry of base items.
//!
//! The catalog maps item ids to opaque visual and icon handles. It is built
//! once from an ordered list of entries (usually a TOML file) and only read
//! afterwards.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, WeldError};
use crate::core::types::ItemId;

/// One base item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    /// Handle of the mesh/prefab the host instantiates for this item
    pub visual: String,
    /// Handle of the inventory icon
    #[serde(default)]
    pub icon: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<ItemId>, visual: impl Into<String>, icon: Option<&str>) -> Self {
        Self {
            id: id.into(),
            visual: visual.into(),
            icon: icon.map(str::to_string),
        }
    }

    /// Human-readable name derived from the visual handle
    ///
    /// `"prefabs/Red Cube.prefab"` becomes `"Red Cube"`.
    pub fn visual_name(&self) -> &str {
        let file = self.visual.rsplit(['/', '\\']).next().unwrap_or(&self.visual);
        match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file,
        }
    }
}

/// TOML layout of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<CatalogEntry>,
}

/// Registry of base items indexed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Unique entries in registration order
    entries: Vec<CatalogEntry>,
    /// Map from id to index in `entries`
    lookup: AHashMap<ItemId, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from an ordered list of entries.
    ///
    /// The first entry registered under an id wins; later duplicates are
    /// dropped without error.
    pub fn load(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            if catalog.lookup.contains_key(&entry.id) {
                tracing::debug!("Ignoring duplicate catalog id: {}", entry.id);
                continue;
            }
            catalog.lookup.insert(entry.id.clone(), catalog.entries.len());
            catalog.entries.push(entry);
        }
        catalog
    }

    /// Parse a catalog from TOML text containing `[[items]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self::load(file.items))
    }

    /// Load a catalog from a TOML file
    pub fn load_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded {} catalog items from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Look up an entry, `None` if the id is unknown
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.lookup
            .get(id)
            .and_then(|&index| self.entries.get(index))
    }

    /// Look up an entry, reporting a miss as `WeldError::LookupMiss`.
    ///
    /// Whether a miss matters is up to the caller: welded shapes are never in
    /// the catalog.
    pub fn resolve(&self, id: &ItemId) -> Result<&CatalogEntry> {
        self.get(id.as_str())
            .ok_or_else(|| WeldError::LookupMiss(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// Iterate entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
