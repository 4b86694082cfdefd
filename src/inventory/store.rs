//! Inventory store: owned blueprints, the crafting pile and write-through saves.
//!
//! The store holds two ordered lists. `inventory` contains claimed items and
//! `pile` contains freshly welded items waiting to be claimed. Every mutation
//! is followed by a full save. Stored blueprints are addressed by `EntryId`,
//! which is unique per stored instance, so an entry lives in exactly one of
//! the two lists.

use serde::Serialize;

use crate::blueprints::{validate, validate_transforms, Catalog, ShapeBlueprint};
use crate::core::config::WeldConfig;
use crate::core::error::Result;
use crate::core::types::EntryId;

use super::icons::{resolve_icon, IconSource};
use super::persistence::Persistence;
use super::save_file::SaveFile;

/// A blueprint held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlueprint {
    pub id: EntryId,
    pub blueprint: ShapeBlueprint,
}

impl StoredBlueprint {
    fn new(blueprint: ShapeBlueprint) -> Self {
        Self {
            id: EntryId::next(),
            blueprint,
        }
    }
}

/// Which list an entry currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Inventory,
    Pile,
}

/// What `load` found in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// An existing save was read
    Restored { inventory: usize, pile: usize },
    /// No save existed; one simple blueprint per catalog item was created and saved
    NewGame { items: usize },
}

/// Borrowing view serialized by `save`, same layout as `SaveFile`
#[derive(Serialize)]
struct SaveView<'a> {
    inventory: Vec<&'a ShapeBlueprint>,
    pile: Vec<&'a ShapeBlueprint>,
}

pub struct InventoryStore<P: Persistence> {
    catalog: Catalog,
    backend: P,
    config: WeldConfig,
    inventory: Vec<StoredBlueprint>,
    pile: Vec<StoredBlueprint>,
}

impl<P: Persistence> InventoryStore<P> {
    /// Create an empty store; call `load` before use
    pub fn new(catalog: Catalog, backend: P, config: WeldConfig) -> Self {
        Self {
            catalog,
            backend,
            config,
            inventory: Vec::new(),
            pile: Vec::new(),
        }
    }

    /// Read the save file, or bootstrap a new game if there is none.
    ///
    /// Replaces the current contents of both lists.
    pub fn load(&mut self) -> Result<LoadOutcome> {
        let key = self.config.save_file_name.clone();

        match self.backend.read(&key)? {
            Some(bytes) => {
                let save = SaveFile::from_slice(&bytes)?;
                for blueprint in save.inventory.iter().chain(save.pile.iter()) {
                    if let Err(e) = validate(blueprint, &self.catalog, &self.config) {
                        tracing::warn!("Loaded blueprint {} is invalid: {}", blueprint.item_id, e);
                    }
                }

                self.inventory = save.inventory.into_iter().map(StoredBlueprint::new).collect();
                self.pile = save.pile.into_iter().map(StoredBlueprint::new).collect();

                tracing::info!(
                    "Loaded {} inventory items and {} pile items from {}",
                    self.inventory.len(),
                    self.pile.len(),
                    key
                );
                Ok(LoadOutcome::Restored {
                    inventory: self.inventory.len(),
                    pile: self.pile.len(),
                })
            }
            None => {
                tracing::info!("New game detected. Populating inventory from catalog...");

                self.inventory = self
                    .catalog
                    .iter()
                    .map(|entry| {
                        StoredBlueprint::new(ShapeBlueprint::simple(entry.id.clone(), entry.visual_name()))
                    })
                    .collect();
                self.pile.clear();

                self.save()?;
                Ok(LoadOutcome::NewGame {
                    items: self.inventory.len(),
                })
            }
        }
    }

    /// Overwrite the save file with the current state
    pub fn save(&mut self) -> Result<()> {
        let view = SaveView {
            inventory: self.inventory.iter().map(|e| &e.blueprint).collect(),
            pile: self.pile.iter().map(|e| &e.blueprint).collect(),
        };
        let bytes = serde_json::to_vec_pretty(&view)?;

        self.backend.write(&self.config.save_file_name, &bytes)?;
        tracing::debug!("Saved data to {}", self.config.save_file_name);
        Ok(())
    }

    /// Append a blueprint to the crafting pile and save.
    ///
    /// Blueprints with unusable transforms are rejected before anything
    /// changes. If the save fails the entry is taken back out.
    pub fn add_to_pile(&mut self, blueprint: ShapeBlueprint) -> Result<EntryId> {
        validate_transforms(&blueprint, &self.config)?;

        let entry = StoredBlueprint::new(blueprint);
        let id = entry.id;
        self.pile.push(entry);
        if let Err(e) = self.save() {
            self.pile.pop();
            return Err(e);
        }
        Ok(id)
    }

    /// Move a pile entry to the end of the inventory and save.
    ///
    /// Returns `false` without saving if `id` is not in the pile. If the
    /// save fails the entry goes back to its old pile position.
    pub fn move_to_inventory(&mut self, id: EntryId) -> Result<bool> {
        let Some(index) = self.pile.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let entry = self.pile.remove(index);
        self.inventory.push(entry);
        if let Err(e) = self.save() {
            if let Some(entry) = self.inventory.pop() {
                self.pile.insert(index, entry);
            }
            return Err(e);
        }

        if let Some(entry) = self.inventory.last() {
            tracing::info!("Moved {} to inventory", entry.blueprint.display_name);
        }
        Ok(true)
    }

    /// Drop everything in the pile and save. Returns how many entries were removed.
    pub fn clear_pile(&mut self) -> Result<usize> {
        let cleared = std::mem::take(&mut self.pile);
        let removed = cleared.len();
        if let Err(e) = self.save() {
            self.pile = cleared;
            return Err(e);
        }
        tracing::info!("Crafting pile emptied ({} items)", removed);
        Ok(removed)
    }

    pub fn inventory(&self) -> &[StoredBlueprint] {
        &self.inventory
    }

    pub fn pile(&self) -> &[StoredBlueprint] {
        &self.pile
    }

    /// Find an entry in either list
    pub fn find(&self, id: EntryId) -> Option<(&StoredBlueprint, Shelf)> {
        if let Some(entry) = self.inventory.iter().find(|e| e.id == id) {
            return Some((entry, Shelf::Inventory));
        }
        self.pile
            .iter()
            .find(|e| e.id == id)
            .map(|entry| (entry, Shelf::Pile))
    }

    /// Icon for an entry: snapshot side-file, catalog icon, or first part's icon
    pub fn icon_for(&self, id: EntryId) -> Option<IconSource> {
        let (entry, _) = self.find(id)?;
        resolve_icon(&entry.blueprint, &self.catalog, &self.backend)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &WeldConfig {
        &self.config
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut P {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprints::{CatalogEntry, WeldPart};
    use crate::core::error::WeldError;
    use crate::inventory::persistence::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::load(vec![
            CatalogEntry::new("cube", "prefabs/Cube.prefab", Some("icons/cube.png")),
            CatalogEntry::new("rod", "prefabs/Rod.prefab", Some("icons/rod.png")),
            CatalogEntry::new("plate", "prefabs/Plate.prefab", None),
        ])
    }

    fn new_store() -> InventoryStore<MemoryStore> {
        let mut store = InventoryStore::new(catalog(), MemoryStore::new(), WeldConfig::default());
        store.load().unwrap();
        store
    }

    fn weld_of(a: &str, b: &str) -> ShapeBlueprint {
        ShapeBlueprint::composite(
            format!("{}+{}", a, b),
            format!("Welded {}-{}", a, b),
            vec![
                WeldPart::anchored(ShapeBlueprint::simple(a, a)),
                WeldPart::anchored(ShapeBlueprint::simple(b, b)),
            ],
        )
    }

    #[test]
    fn test_bootstrap_new_game() {
        let mut store = InventoryStore::new(catalog(), MemoryStore::new(), WeldConfig::default());

        let outcome = store.load().unwrap();

        assert_eq!(outcome, LoadOutcome::NewGame { items: 3 });
        let names: Vec<&str> = store
            .inventory()
            .iter()
            .map(|e| e.blueprint.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Cube", "Rod", "Plate"]);
        assert!(store.inventory().iter().all(|e| e.blueprint.is_simple()));
        assert!(store.pile().is_empty());
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn test_second_load_restores() {
        let mut store = new_store();
        store.add_to_pile(weld_of("cube", "rod")).unwrap();

        let outcome = store.load().unwrap();

        assert_eq!(outcome, LoadOutcome::Restored { inventory: 3, pile: 1 });
        assert_eq!(store.backend().write_count(), 2);
    }

    #[test]
    fn test_add_move_clear_each_save() {
        let mut store = new_store();

        let first = store.add_to_pile(weld_of("cube", "rod")).unwrap();
        let second = store.add_to_pile(weld_of("rod", "plate")).unwrap();
        assert_eq!(store.backend().write_count(), 3);

        assert!(store.move_to_inventory(first).unwrap());
        assert_eq!(store.backend().write_count(), 4);
        assert_eq!(store.inventory().last().unwrap().id, first);
        assert_eq!(store.find(first).unwrap().1, Shelf::Inventory);
        assert_eq!(store.find(second).unwrap().1, Shelf::Pile);

        assert_eq!(store.clear_pile().unwrap(), 1);
        assert!(store.pile().is_empty());
        assert!(store.find(second).is_none());
        assert_eq!(store.backend().write_count(), 5);
    }

    #[test]
    fn test_move_missing_is_noop() {
        let mut store = new_store();
        store.add_to_pile(weld_of("cube", "rod")).unwrap();
        let owned = store.inventory()[0].id;
        let writes = store.backend().write_count();

        // Already in the inventory, so not in the pile
        assert!(!store.move_to_inventory(owned).unwrap());
        assert!(!store.move_to_inventory(EntryId(u64::MAX)).unwrap());

        assert_eq!(store.inventory().len(), 3);
        assert_eq!(store.pile().len(), 1);
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn test_clear_empty_pile_still_saves() {
        let mut store = new_store();
        assert_eq!(store.clear_pile().unwrap(), 0);
        assert_eq!(store.backend().write_count(), 2);
    }

    #[test]
    fn test_failed_add_leaves_pile_unchanged() {
        let mut store = new_store();
        store.backend_mut().set_fail_writes(true);

        let result = store.add_to_pile(weld_of("cube", "rod"));
        assert!(matches!(result, Err(WeldError::IoError(_))));
        assert!(store.pile().is_empty());

        store.backend_mut().set_fail_writes(false);
        store.add_to_pile(weld_of("cube", "rod")).unwrap();
        assert_eq!(store.pile().len(), 1);
    }

    #[test]
    fn test_failed_move_restores_position() {
        let mut store = new_store();
        let first = store.add_to_pile(weld_of("cube", "rod")).unwrap();
        let second = store.add_to_pile(weld_of("rod", "plate")).unwrap();
        let third = store.add_to_pile(weld_of("plate", "cube")).unwrap();
        store.backend_mut().set_fail_writes(true);

        assert!(store.move_to_inventory(second).is_err());

        let pile: Vec<EntryId> = store.pile().iter().map(|e| e.id).collect();
        assert_eq!(pile, vec![first, second, third]);
        assert_eq!(store.inventory().len(), 3);
        assert_eq!(store.find(second).unwrap().1, Shelf::Pile);
    }

    #[test]
    fn test_failed_clear_keeps_pile() {
        let mut store = new_store();
        let id = store.add_to_pile(weld_of("cube", "rod")).unwrap();
        store.backend_mut().set_fail_writes(true);

        assert!(store.clear_pile().is_err());
        assert_eq!(store.pile().len(), 1);
        assert_eq!(store.pile()[0].id, id);
    }

    #[test]
    fn test_non_finite_weld_rejected() {
        let mut store = new_store();
        let writes = store.backend().write_count();
        let mut broken = weld_of("cube", "rod");
        broken.children[1].local_position.x = f32::INFINITY;

        assert!(matches!(store.add_to_pile(broken), Err(WeldError::Validation(_))));
        assert!(store.pile().is_empty());
        assert_eq!(store.backend().write_count(), writes);

        // What was saved still loads
        store.load().unwrap();
    }

    #[test]
    fn test_corrupt_save_fails_load() {
        let mut backend = MemoryStore::new();
        backend.insert("inventory_data.json", b"{ broken".to_vec());
        let mut store = InventoryStore::new(catalog(), backend, WeldConfig::default());

        assert!(matches!(store.load(), Err(WeldError::SerdeError(_))));
        // The broken file must not be replaced by a fresh game
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_saved_json_layout() {
        let mut store = new_store();
        store.add_to_pile(weld_of("cube", "rod")).unwrap();

        let bytes = store.backend().get("inventory_data.json").unwrap();
        let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(value["inventory"][0]["itemID"], "cube");
        assert_eq!(value["pile"][0]["children"][1]["partBlueprint"]["itemID"], "rod");
    }
}
