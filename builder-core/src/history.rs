//! Bounded undo/redo history.

use std::collections::VecDeque;

/// Undo and redo stacks of snapshots.
///
/// The undo stack is bounded; the oldest entry is dropped once `limit` is
/// reached. Recording a new entry clears the redo stack.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    limit: usize,
}

impl<T> History<T> {
    /// Create a history keeping at most `limit` undo steps.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Record the state before a mutation.
    pub fn record(&mut self, before: T) {
        self.redo.clear();
        self.push_undo(before);
    }

    /// Step back: returns the previous state and stores `current` for redo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward: returns the next state and stores `current` for undo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, state: T) {
        if self.limit == 0 {
            return;
        }
        if self.undo.len() >= self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(state);
    }
}
