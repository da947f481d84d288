//! Single-element selection.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// At most one selected element. There is no multi-select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    current: Option<ElementId>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Selected element, if any.
    #[must_use]
    pub const fn get(&self) -> Option<ElementId> {
        self.current
    }

    /// Whether `id` is the selected element.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.current == Some(id)
    }

    /// Replace the selection with `id`.
    pub fn set(&mut self, id: ElementId) {
        self.current = Some(id);
    }

    /// Select nothing.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Clear the selection if it points at `id`. Returns whether it did.
    pub fn forget(&mut self, id: ElementId) -> bool {
        if self.is_selected(id) {
            self.current = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_previous() {
        let (a, b) = (ElementId::new(), ElementId::new());
        let mut selection = Selection::new();
        selection.set(a);
        selection.set(b);
        assert_eq!(selection.get(), Some(b));
        assert!(!selection.is_selected(a));
    }

    #[test]
    fn test_forget_only_clears_matching_id() {
        let (a, b) = (ElementId::new(), ElementId::new());
        let mut selection = Selection::new();
        selection.set(a);

        assert!(!selection.forget(b));
        assert_eq!(selection.get(), Some(a));
        assert!(selection.forget(a));
        assert_eq!(selection.get(), None);
    }
}
