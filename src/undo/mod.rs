use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of snapshots kept in history
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// An immutable snapshot of the buffer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    content: String,
}

impl HistoryEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Linear, branch-free undo/redo log over buffer snapshots
///
/// `cursor` always indexes the displayed entry, so
/// `0 <= cursor < entries.len()` holds for the lifetime of the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    /// Maximum number of snapshots to keep
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new("", DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create a history seeded with the initial buffer value
    pub fn new(initial: &str, capacity: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(HistoryEntry::new(initial));
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new snapshot
    ///
    /// Any redo branch beyond the cursor is discarded first. A snapshot equal
    /// to the displayed entry is not recorded again.
    pub fn save(&mut self, content: &str) {
        if self.current() == content {
            return;
        }

        // Truncate any redo history when new snapshot is added
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry::new(content));

        // Enforce max size
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one snapshot; a no-op at the start of history
    pub fn undo(&mut self) -> &str {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    /// Step forward one snapshot; a no-op at the end of history
    pub fn redo(&mut self) -> &str {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Content of the displayed entry
    pub fn current(&self) -> &str {
        self.entries
            .get(self.cursor)
            .map(HistoryEntry::content)
            .unwrap_or("")
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot contents, oldest first
    pub fn entries(&self) -> Vec<&str> {
        self.entries.iter().map(HistoryEntry::content).collect()
    }

    /// Drop all history and start over from `content`
    pub fn reset(&mut self, content: &str) {
        self.entries.clear();
        self.entries.push_back(HistoryEntry::new(content));
        self.cursor = 0;
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    /// Get the number of available redo steps
    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }
}
