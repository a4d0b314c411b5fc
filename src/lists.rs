//! Ordered lists with an active cursor
//!
//! Export locations, export formats and suffix tokens are all edited the same
//! way: items are added at the end, the item under the cursor is removed, and
//! items can be moved up or down.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Direction for [`PresetList::move_selected`]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
}

/// An ordered list of items with the index of the active item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PresetList<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for PresetList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
        }
    }
}

impl<T> PresetList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from existing items with the cursor on the first one
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the active item
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// The active item, if the cursor points inside the list
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn selected_mut(&mut self) -> Option<&mut T> {
        self.items.get_mut(self.index)
    }

    /// Move the cursor; returns false when `index` is out of range
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Append an item built from the new list length (1-based)
    pub fn add_with(&mut self, make: impl FnOnce(usize) -> T) -> &mut T {
        let item = make(self.items.len() + 1);
        self.items.push(item);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the item under the cursor
    ///
    /// The cursor only steps back when the removed item was not the first
    /// one and the list still has items. Removing the last item of a longer
    /// list from index 0 therefore leaves the cursor where it was.
    pub fn remove_selected(&mut self) -> Option<T> {
        if self.index >= self.items.len() {
            return None;
        }
        let removed_index = self.index;
        let removed = self.items.remove(removed_index);

        if !self.items.is_empty() && removed_index != 0 {
            self.index -= 1;
        }
        Some(removed)
    }

    /// Move the active item one step, keeping the cursor on it
    pub fn move_selected(&mut self, direction: Move) -> bool {
        let target = match direction {
            Move::Up if self.index > 0 => self.index - 1,
            Move::Down if self.index + 1 < self.items.len() => self.index + 1,
            _ => return false,
        };
        self.items.swap(self.index, target);
        self.index = target;
        true
    }

    /// Clamp the cursor into the list bounds
    pub fn clamp_index(&mut self) {
        self.index = self.index.min(self.items.len().saturating_sub(1));
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index = 0;
    }

    /// Find the index of the first item matching `predicate`
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }
}

impl<'a, T> IntoIterator for &'a PresetList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
