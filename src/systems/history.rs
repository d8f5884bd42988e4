//! Undo/redo history over full-state snapshots
//!
//! Every entry is an opaque byte buffer produced by the engine's
//! `save_snapshot`. The cursor points at the entry that matches the current
//! world; undo/redo move it and hand out a copy of the entry they land on.
//!
//! Budgets are enforced after every capture by evicting the oldest entries.
//! The saved slot is separate: it is never evicted and never affected by
//! undo/redo.

use std::collections::VecDeque;

use tracing::debug;

pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 50;
pub const DEFAULT_HISTORY_MAX_BYTES: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub max_entries: usize,
    pub max_bytes: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_MAX_ENTRIES,
            max_bytes: DEFAULT_HISTORY_MAX_BYTES,
        }
    }
}

#[derive(Debug, Default)]
pub struct SnapshotHistory {
    limits: HistoryLimits,
    entries: VecDeque<Vec<u8>>,
    /// `None` only while `entries` is empty
    cursor: Option<usize>,
    total_bytes: usize,
    saved: Option<Vec<u8>>,
}

impl SnapshotHistory {
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Record a new state. Anything ahead of the cursor (the redo tail) is
    /// discarded first, then the oldest entries are evicted until both
    /// budgets hold again.
    pub fn capture_undo(&mut self, buffer: Vec<u8>) {
        if let Some(cursor) = self.cursor {
            while self.entries.len() > cursor + 1 {
                if let Some(dropped) = self.entries.pop_back() {
                    self.total_bytes -= dropped.len();
                }
            }
        }

        self.total_bytes += buffer.len();
        self.entries.push_back(buffer);
        self.cursor = Some(self.entries.len() - 1);

        let mut evicted = 0usize;
        while self.entries.len() > self.limits.max_entries || self.total_bytes > self.limits.max_bytes {
            let Some(oldest) = self.entries.pop_front() else {
                break;
            };
            self.total_bytes -= oldest.len();
            self.cursor = self.cursor.and_then(|c| c.checked_sub(1));
            evicted += 1;
        }
        if self.entries.is_empty() {
            self.cursor = None;
        } else if self.cursor.is_none() {
            self.cursor = Some(0);
        }

        if evicted > 0 {
            debug!(
                evicted,
                entries = self.entries.len(),
                total_bytes = self.total_bytes,
                "history over budget, evicted oldest entries"
            );
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// Step back one entry and return a copy of it
    pub fn undo(&mut self) -> Option<Vec<u8>> {
        if !self.can_undo() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    /// Step forward one entry and return a copy of it
    pub fn redo(&mut self) -> Option<Vec<u8>> {
        if !self.can_redo() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    pub fn set_saved(&mut self, buffer: Vec<u8>) {
        self.saved = Some(buffer);
    }

    pub fn has_saved(&self) -> bool {
        self.saved.is_some()
    }

    /// Fresh copy of the saved slot; the slot itself stays untouched
    pub fn saved_copy(&self) -> Option<Vec<u8>> {
        self.saved.clone()
    }

    /// Forget everything, including the saved slot
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.total_bytes = 0;
        self.saved = None;
    }
}
