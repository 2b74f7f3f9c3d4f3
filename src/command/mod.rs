mod commands;
mod history;

pub use commands::HistoryAction;
pub use history::{CommandHistory, MAX_UNDO_HISTORY};

/// Derived state published after every mutating controller call.
///
/// Consumers use it to enable or disable the undo, redo and clear controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_clear: bool,
}
