use std::sync::Arc;

use crate::path::PathRef;

/// The ordered set of visible paths. Insertion order is z-order.
#[derive(Debug, Default, Clone)]
pub struct PathCollection {
    paths: Vec<PathRef>,
}

impl PathCollection {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn push(&mut self, path: PathRef) {
        self.paths.push(path);
    }

    pub fn extend(&mut self, paths: impl IntoIterator<Item = PathRef>) {
        self.paths.extend(paths);
    }

    pub fn paths(&self) -> &[PathRef] {
        &self.paths
    }

    pub fn last(&self) -> Option<&PathRef> {
        self.paths.last()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Remove this exact instance. Returns false if it was not present.
    pub fn remove(&mut self, path: &PathRef) -> bool {
        match self.paths.iter().position(|p| Arc::ptr_eq(p, path)) {
            Some(index) => {
                self.paths.remove(index);
                true
            }
            None => false,
        }
    }

    /// Pop the topmost path
    pub fn remove_last(&mut self) -> Option<PathRef> {
        self.paths.pop()
    }

    /// Empty the collection, handing back the paths in z-order
    pub fn take_all(&mut self) -> Vec<PathRef> {
        std::mem::take(&mut self.paths)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PathRef> {
        self.paths.iter()
    }
}
