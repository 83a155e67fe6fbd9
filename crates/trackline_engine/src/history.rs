// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history of full item-set snapshots.
//!
//! Entries live in an index-addressed stack. Mutations record the item set
//! as it was *before* the change. Undoing from the tip first stores the live
//! set so redo can return to it; recording from any other index discards
//! the redo branch.

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Default undo history depth
pub const DEFAULT_HISTORY_CAP: usize = 100;

/// Label of the entry holding the live set when undoing from the tip
const LIVE_LABEL: &str = "Current state";

/// History errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Immutable snapshot of the whole item collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Items at the time of the snapshot
    pub items: Vec<Item>,
    /// Human-readable action label
    pub label: String,
    /// Milliseconds since the UNIX epoch
    pub timestamp: u64,
}

impl HistoryEntry {
    /// Create a snapshot entry
    pub fn new(items: Vec<Item>, label: impl Into<String>) -> Self {
        Self {
            items,
            label: label.into(),
            timestamp: now_ms(),
        }
    }
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Entries in the stack
    pub entries: usize,
    /// Current index
    pub index: usize,
    /// Maximum depth
    pub cap: usize,
}

/// Undo/redo history manager
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshot stack
    entries: VecDeque<HistoryEntry>,
    /// Position in the stack; `entries.len()` means "at the live tip"
    index: usize,
    /// Maximum number of entries
    cap: usize,
    /// Set while a historical snapshot is being applied
    restoring: bool,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_HISTORY_CAP)
    }

    /// Create with a custom cap
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: 0,
            cap: cap.max(1),
            restoring: false,
        }
    }

    /// Record the pre-mutation item set.
    ///
    /// Ignored while a snapshot is being restored.
    pub fn record(&mut self, items: &[Item], label: impl Into<String>) {
        if self.restoring {
            tracing::debug!("history record skipped while restoring");
            return;
        }

        self.entries.truncate(self.index);
        self.entries.push_back(HistoryEntry::new(items.to_vec(), label));

        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
        self.index = self.entries.len();
    }

    /// Step back. `current` is the live item set, kept so redo can return to it.
    pub fn undo(&mut self, current: &[Item]) -> Result<&HistoryEntry> {
        if self.index == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        if self.index == self.entries.len() {
            self.entries.push_back(HistoryEntry::new(current.to_vec(), LIVE_LABEL));
            // Keep the entry about to be restored even at a cap of one
            while self.entries.len() > self.cap && self.index > 1 {
                self.entries.pop_front();
                self.index -= 1;
            }
        }
        self.index -= 1;
        Ok(&self.entries[self.index])
    }

    /// Step forward
    pub fn redo(&mut self) -> Result<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return Err(HistoryError::NothingToRedo);
        }
        self.index += 1;
        Ok(&self.entries[self.index])
    }

    /// Mark the start or end of applying a snapshot
    pub fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }

    /// Whether a snapshot is being applied
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Label of the action the next undo reverts
    pub fn undo_description(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.label.as_str())
    }

    /// Label of the action the next redo re-applies
    pub fn redo_description(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.index).map(|e| e.label.as_str())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            entries: self.entries.len(),
            index: self.index,
            cap: self.cap,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
