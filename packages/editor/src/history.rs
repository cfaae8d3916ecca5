//! # Undo/Redo History
//!
//! Linear history over applied commands: a bounded undo stack and a redo
//! stack that survives only until the next fresh command. Each entry stores
//! the replay/inverse command pair captured at execute time, so undo and
//! redo cost is proportional to the original delta, not the graph.

use crate::commands::AppliedCommand;

/// Default number of undo levels kept before the oldest entries are dropped.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<AppliedCommand>,
    redo_stack: Vec<AppliedCommand>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// `capacity` of 0 means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    /// Record a freshly executed command. Drops the oldest entry once the
    /// bound is hit and invalidates the redo future.
    pub fn record(&mut self, applied: AppliedCommand) {
        self.undo_stack.push(applied);
        if self.capacity > 0 && self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub(crate) fn pop_undo(&mut self) -> Option<AppliedCommand> {
        self.undo_stack.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<AppliedCommand> {
        self.redo_stack.pop()
    }

    /// Park an undone entry on the redo stack (or put back a failed redo).
    pub(crate) fn stash_redo(&mut self, applied: AppliedCommand) {
        self.redo_stack.push(applied);
    }

    /// Return a redone entry to the undo stack without touching redo.
    pub(crate) fn stash_undo(&mut self, applied: AppliedCommand) {
        self.undo_stack.push(applied);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
