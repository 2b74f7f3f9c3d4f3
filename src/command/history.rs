use std::collections::VecDeque;

use super::HistoryAction;

/// Default maximum number of undoable actions
pub const MAX_UNDO_HISTORY: usize = 50;

/// Bounded undo stack plus redo stack.
///
/// The undo stack drops its oldest entry once it is full. The redo stack is
/// unbounded but is cleared whenever a new action is recorded.
#[derive(Debug)]
pub struct CommandHistory {
    undo_stack: VecDeque<HistoryAction>,
    redo_stack: Vec<HistoryAction>,
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_UNDO_HISTORY)
    }

    /// A history keeping at most `max_depth` undoable actions (at least one)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a freshly performed action, invalidating redo
    pub fn record(&mut self, action: HistoryAction) {
        self.redo_stack.clear();
        self.push_undo(action);
    }

    fn push_undo(&mut self, action: HistoryAction) {
        self.undo_stack.push_back(action);
        while self.undo_stack.len() > self.max_depth {
            if let Some(dropped) = self.undo_stack.pop_front() {
                log::trace!("Undo history full, dropping {}", dropped.name());
            }
        }
    }

    /// Pop the most recent undoable action
    pub fn pop_undo(&mut self) -> Option<HistoryAction> {
        self.undo_stack.pop_back()
    }

    /// Pop the most recently undone action
    pub fn pop_redo(&mut self) -> Option<HistoryAction> {
        self.redo_stack.pop()
    }

    /// Park an undone action so it can be redone
    pub fn push_redo(&mut self, action: HistoryAction) {
        self.redo_stack.push(action);
    }

    /// Return a redone action to the undo stack without touching redo
    pub fn push_redone(&mut self, action: HistoryAction) {
        self.push_undo(action);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
