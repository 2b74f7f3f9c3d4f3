use crate::document::PathCollection;
use crate::path::{PathId, PathRef};

/// A reversible user action.
///
/// Each variant holds the exact path instances it affected, so undoing and
/// redoing moves the same paths in and out of the collection.
#[derive(Clone)]
pub enum HistoryAction {
    /// A stroke was committed
    AddPath(PathRef),
    /// A stroke was removed by the eraser
    ErasePath(PathRef),
    /// Every visible stroke was cleared, in z-order
    ClearPaths(Vec<PathRef>),
}

impl std::fmt::Debug for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryAction::AddPath(path) => f.debug_tuple("AddPath").field(&path.id()).finish(),
            HistoryAction::ErasePath(path) => f.debug_tuple("ErasePath").field(&path.id()).finish(),
            HistoryAction::ClearPaths(paths) => f
                .debug_struct("ClearPaths")
                .field("count", &paths.len())
                .finish(),
        }
    }
}

impl HistoryAction {
    pub fn name(&self) -> &'static str {
        match self {
            HistoryAction::AddPath(_) => "AddPath",
            HistoryAction::ErasePath(_) => "ErasePath",
            HistoryAction::ClearPaths(_) => "ClearPaths",
        }
    }

    /// Ids of the paths this action touches
    pub fn path_ids(&self) -> Vec<PathId> {
        match self {
            HistoryAction::AddPath(path) | HistoryAction::ErasePath(path) => vec![path.id()],
            HistoryAction::ClearPaths(paths) => paths.iter().map(|p| p.id()).collect(),
        }
    }

    /// Reverse this action on the collection
    pub fn undo(&self, paths: &mut PathCollection) {
        match self {
            HistoryAction::AddPath(path) => {
                paths.remove(path);
            }
            HistoryAction::ErasePath(path) => {
                // Restored paths become the most recent again
                paths.push(path.clone());
            }
            HistoryAction::ClearPaths(cleared) => {
                paths.extend(cleared.iter().cloned());
            }
        }
    }

    /// Apply this action again after it was undone
    pub fn redo(&self, paths: &mut PathCollection) {
        match self {
            HistoryAction::AddPath(path) => {
                paths.push(path.clone());
            }
            HistoryAction::ErasePath(path) => {
                paths.remove(path);
                path.discard_cache();
            }
            HistoryAction::ClearPaths(cleared) => {
                for path in cleared {
                    paths.remove(path);
                }
            }
        }
    }
}
