//! Undo/Redo snapshot history.
//!
//! Every completed gesture (and every clear) pushes a full copy of the
//! surface. The stack is linear: a cursor marks the snapshot currently on
//! the surface, undo/redo move the cursor, and a push discards everything
//! after the cursor before appending.

use doodle_core::Surface;

/// Linear snapshot history with a cursor.
///
/// Invariant: once initialized the stack is never empty and
/// `cursor < len`.
pub struct HistoryStack {
    snapshots: Vec<Surface>,
    cursor: usize,
    /// Maximum number of snapshots kept. 0 = unbounded.
    max_depth: usize,
}

impl HistoryStack {
    /// Start a history whose first entry is `initial`.
    pub fn new(initial: Surface, max_depth: usize) -> Self {
        let mut snapshots = Vec::with_capacity(max_depth.clamp(1, 16));
        snapshots.push(initial);
        Self {
            snapshots,
            cursor: 0,
            max_depth,
        }
    }

    /// Record a new snapshot after the cursor, dropping the redo branch.
    /// When the depth limit is exceeded the oldest snapshot is evicted.
    pub fn push(&mut self, snapshot: Surface) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        if self.max_depth > 0 && self.snapshots.len() > self.max_depth {
            let excess = self.snapshots.len() - self.max_depth;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns the snapshot to restore, or `None`
    /// at the oldest entry.
    pub fn undo(&mut self) -> Option<&Surface> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward one snapshot. Returns the snapshot to restore, or
    /// `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Surface> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn current(&self) -> &Surface {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
