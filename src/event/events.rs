use crate::command::HistoryState;
use crate::path::PathId;
use crate::tool::ToolKind;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// Derived undo/redo/clear availability, republished after every mutation
    HistoryChanged(HistoryState),
    ToolChanged {
        old: ToolKind,
        new: ToolKind,
    },
    PathStarted {
        id: PathId,
    },
    PathCommitted {
        id: PathId,
    },
    /// An in-progress path was dropped because nothing was drawn
    PathDiscarded {
        id: PathId,
    },
    PathStraightened {
        id: PathId,
    },
    PathErased {
        id: PathId,
    },
    PathsCleared {
        count: usize,
    },
    Undone {
        action: &'static str,
    },
    Redone {
        action: &'static str,
    },
}
