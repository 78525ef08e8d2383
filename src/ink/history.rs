use std::collections::VecDeque;

/// Snapshots kept for undo before the oldest is dropped.
pub const UNDO_LIMIT: usize = 20;

/// Bounded stack of whole-surface snapshots, one per stroke.
#[derive(Debug)]
pub struct UndoHistory<T> {
    snapshots: VecDeque<T>,
    limit: usize,
}

impl<T> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::with_limit(UNDO_LIMIT)
    }
}

impl<T> UndoHistory<T> {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit.min(UNDO_LIMIT)),
            limit: limit.max(1),
        }
    }

    /// Push a snapshot, dropping the oldest once the limit is exceeded.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
