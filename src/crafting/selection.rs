//! Selection state for crafting and claiming.

use crate::core::types::EntryId;

/// Up to two inventory entries picked for welding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySelection {
    selected: Vec<EntryId>,
}

impl InventorySelection {
    pub const MAX: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle an entry. Returns whether it is selected afterwards.
    ///
    /// Selecting a third entry is ignored.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if let Some(index) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(index);
            return false;
        }
        if self.selected.len() < Self::MAX {
            self.selected.push(id);
            return true;
        }
        false
    }

    pub fn is_selected(&self, id: EntryId) -> bool {
        self.selected.contains(&id)
    }

    pub fn can_craft(&self) -> bool {
        self.selected.len() == Self::MAX
    }

    /// Take the pair in selection order, clearing the selection
    pub fn take_pair(&mut self) -> Option<(EntryId, EntryId)> {
        if !self.can_craft() {
            return None;
        }
        let pair = (self.selected[0], self.selected[1]);
        self.selected.clear();
        Some(pair)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

/// At most one pile entry picked for claiming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PileSelection {
    selected: Option<EntryId>,
}

impl PileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, or deselect it if it was already selected
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if self.selected == Some(id) {
            self.selected = None;
            false
        } else {
            self.selected = Some(id);
            true
        }
    }

    pub fn selected(&self) -> Option<EntryId> {
        self.selected
    }

    pub fn can_claim(&self) -> bool {
        self.selected.is_some()
    }

    pub fn take(&mut self) -> Option<EntryId> {
        self.selected.take()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
