//! Changed-cell tracking with destructive drain.

use crate::geometry::{Position, Size};
use indexmap::IndexSet;
use parking_lot::Mutex;

/// Records the set of coordinates mutated since the last drain.
///
/// Marking is idempotent; draining atomically empties the set and returns its
/// prior contents. A mark that races with a drain serializes on the internal
/// lock: it lands either in the drained snapshot or in the next one, never
/// nowhere. Insertion order is preserved so flush loops visit cells roughly
/// in write order.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty: Mutex<IndexSet<Position>>,
}

impl DirtyTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a coordinate as dirty. Re-marking is a no-op.
    pub fn mark(&self, position: Position) {
        self.dirty.lock().insert(position);
    }

    /// Record every coordinate in a bound as dirty, in row-major order.
    pub fn mark_all(&self, bound: Size) {
        let mut dirty = self.dirty.lock();
        dirty.extend(bound.positions());
    }

    /// Atomically take and clear the accumulated set.
    #[must_use]
    pub fn drain(&self) -> IndexSet<Position> {
        std::mem::take(&mut *self.dirty.lock())
    }

    /// Discard all accumulated coordinates.
    pub fn clear(&self) {
        self.dirty.lock().clear();
    }

    /// Number of coordinates currently marked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirty.lock().len()
    }

    /// Whether nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.lock().is_empty()
    }
}
