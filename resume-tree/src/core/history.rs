//! Linear undo/redo over immutable document snapshots.
//!
//! The log always holds at least one entry (the initial document). The cursor
//! points at the entry currently shown; undo and redo only move the cursor,
//! and pushing after an undo discards everything past it.

use tracing::debug;

use crate::core::numbering::{Numbering, annotate_addresses, compute_numbering};
use crate::node::Node;

/// Default number of retained entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One stored snapshot with the numbering computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Monotonic across the lifetime of the log, unaffected by truncation
    /// or eviction.
    pub sequence: u64,
    pub description: String,
    pub tree: Vec<Node>,
    pub numbering: Numbering,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    /// Maximum retained entries (0 = unlimited).
    limit: usize,
    next_sequence: u64,
}

impl History {
    /// Start a log whose first entry is `tree`.
    pub fn new(tree: Vec<Node>, description: impl Into<String>) -> Self {
        Self::with_limit(tree, description, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(tree: Vec<Node>, description: impl Into<String>, limit: usize) -> Self {
        let mut history = Self {
            entries: Vec::new(),
            cursor: 0,
            limit,
            next_sequence: 0,
        };
        let entry = history.make_entry(tree, description.into());
        history.entries.push(entry);
        history
    }

    /// Record `tree` as the newest snapshot and make it current.
    pub fn push(&mut self, tree: Vec<Node>, description: impl Into<String>) -> &HistoryEntry {
        let dropped = self.entries.len() - (self.cursor + 1);
        if dropped > 0 {
            debug!(dropped, "discarding redo entries");
            self.entries.truncate(self.cursor + 1);
        }

        let entry = self.make_entry(tree, description.into());
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;

        if self.limit > 0 && self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.cursor -= excess;
            debug!(evicted = excess, "history limit reached");
        }
        &self.entries[self.cursor]
    }

    /// Step back one entry. `None` at the start of the log.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry. `None` at the end of the log.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// Description of the edit `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.entries[self.cursor].description.as_str())
    }

    /// Description of the edit `redo` would reapply.
    pub fn redo_description(&self) -> Option<&str> {
        self.can_redo()
            .then(|| self.entries[self.cursor + 1].description.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the initial snapshot is never evicted below one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn make_entry(&mut self, mut tree: Vec<Node>, description: String) -> HistoryEntry {
        annotate_addresses(&mut tree);
        let numbering = compute_numbering(&tree);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        HistoryEntry {
            sequence,
            description,
            tree,
            numbering,
        }
    }
}
