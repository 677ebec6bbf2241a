//! Undo/Redo system for the editor
//!
//! History entries are whole-buffer snapshots. `TextBuffer` clones share
//! rope nodes, so a snapshot costs far less than a copy of the text.
//! - Undo stack bounded to `max_history`, oldest evicted first
//! - Redo stack cleared by every new edit

use crate::config::MAX_UNDO_HISTORY;
use crate::editor::buffer::TextBuffer;
use std::collections::VecDeque;

/// Manages undo and redo stacks for a document
#[derive(Debug, Clone)]
pub struct UndoManager {
    /// Snapshots taken before each edit, oldest at the front
    undo_stack: VecDeque<TextBuffer>,
    /// Snapshots replaced by an undo
    redo_stack: Vec<TextBuffer>,
    /// Maximum number of snapshots to keep
    max_history: usize,
}

impl UndoManager {
    /// Create a new undo manager with specified max history
    pub fn new(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: Vec::new(),
            max_history,
        }
    }

    /// Create with default max history (50 snapshots)
    pub fn with_default_history() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }

    /// Record the buffer as it was before a mutating operation
    pub fn push_edit(&mut self, before: &TextBuffer) {
        self.undo_stack.push_back(before.clone());
        while self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Step back one edit. `current` moves to the redo stack and the
    /// snapshot to restore is returned; `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &TextBuffer) -> Option<TextBuffer> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Re-apply the last undone edit
    pub fn redo(&mut self, current: &TextBuffer) -> Option<TextBuffer> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.clone());
        while self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
        Some(next)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get undo stack size (for display/debugging)
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack size (for display/debugging)
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::with_default_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply an edit the way the controller does: snapshot, then replace
    fn edit(manager: &mut UndoManager, buffer: &TextBuffer, text: &str) -> TextBuffer {
        manager.push_edit(buffer);
        TextBuffer::from_str(text)
    }

    #[test]
    fn test_undo_redo_basic() {
        let mut manager = UndoManager::with_default_history();
        let original = TextBuffer::from_str("a");
        let current = edit(&mut manager, &original, "ab");

        assert!(manager.can_undo());
        assert!(!manager.can_redo());

        let undone = manager.undo(&current).unwrap();
        assert_eq!(undone.to_string(), "a");
        assert!(!manager.can_undo());
        assert!(manager.can_redo());

        let redone = manager.redo(&undone).unwrap();
        assert_eq!(redone.to_string(), "ab");
        assert!(manager.can_undo());
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_underflow_is_noop() {
        let mut manager = UndoManager::with_default_history();
        let buffer = TextBuffer::from_str("x");
        assert!(manager.undo(&buffer).is_none());
        assert!(manager.redo(&buffer).is_none());
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_max_history_evicts_oldest() {
        let mut manager = UndoManager::with_default_history();
        let mut current = TextBuffer::from_str("0");
        for i in 1..=60 {
            current = edit(&mut manager, &current, &i.to_string());
        }
        assert_eq!(manager.undo_count(), 50);

        // Snapshots "0".."9" were evicted; the oldest reachable is "10"
        let mut last = current;
        while let Some(previous) = manager.undo(&last) {
            last = previous;
        }
        assert_eq!(last.to_string(), "10");
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut manager = UndoManager::with_default_history();
        let start = TextBuffer::from_str("start");
        let mut current = start.clone();
        for text in ["one", "two", "three", "four"] {
            current = edit(&mut manager, &current, text);
        }

        for _ in 0..4 {
            current = manager.undo(&current).unwrap();
        }
        assert_eq!(current.to_string(), "start");

        for _ in 0..4 {
            current = manager.redo(&current).unwrap();
        }
        assert_eq!(current.to_string(), "four");
    }

    #[test]
    fn test_redo_cleared_on_new_edit() {
        let mut manager = UndoManager::with_default_history();
        let mut current = edit(&mut manager, &TextBuffer::from_str(""), "first");
        current = manager.undo(&current).unwrap();
        assert!(manager.can_redo());

        edit(&mut manager, &current, "second");
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_custom_bound() {
        let mut manager = UndoManager::new(3);
        let mut current = TextBuffer::new();
        for i in 0..5 {
            current = edit(&mut manager, &current, &i.to_string());
        }
        assert_eq!(manager.undo_count(), 3);
        assert_eq!(UndoManager::new(0).max_history(), 1);
    }
}
