// SPDX-License-Identifier: MIT OR Apache-2.0
//! Item clipboard.
//!
//! Holds copies of items. Pasting shifts every copy by the same offset so
//! the earliest one starts at the target time, and gives each a fresh ID.

use crate::item::Item;
use crate::selection::ItemSet;
use crate::track::TrackList;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clipboard errors
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Clipboard content could not be encoded or decoded
    #[error("Clipboard JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Copied items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    items: Vec<Item>,
}

impl Clipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content with the selected items, in list order.
    ///
    /// Returns how many items were copied.
    pub fn copy(&mut self, items: &[Item], selection: &ItemSet) -> usize {
        self.items = items
            .iter()
            .filter(|item| selection.contains(&item.id))
            .cloned()
            .collect();
        self.items.len()
    }

    /// Copied items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether nothing is copied
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fresh copies shifted so the earliest start lands on `target_ms`.
    ///
    /// Copies whose track no longer exists are dropped.
    pub fn paste_at(&self, target_ms: f64, tracks: &TrackList) -> Vec<Item> {
        let earliest = self
            .items
            .iter()
            .map(|item| item.start_ms)
            .filter(|t| t.is_finite())
            .fold(f64::INFINITY, f64::min);
        if !earliest.is_finite() || !target_ms.is_finite() {
            return Vec::new();
        }
        let offset = target_ms - earliest;

        self.items
            .iter()
            .filter(|item| {
                let known = tracks.contains(item.track_id);
                if !known {
                    tracing::warn!(item = ?item.id, track = ?item.track_id, "paste: track no longer exists, skipping");
                }
                known
            })
            .map(|item| item.shifted_copy(offset))
            .collect()
    }

    /// Encode the content as JSON
    pub fn to_json(&self) -> Result<String, ClipboardError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Replace the content from JSON produced by [`Self::to_json`]
    pub fn load_json(&mut self, json: &str) -> Result<usize, ClipboardError> {
        self.items = serde_json::from_str(json)?;
        Ok(self.items.len())
    }
}
