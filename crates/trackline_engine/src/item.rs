// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-bounded items placed on tracks.

use crate::track::TrackId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Create a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Start/end pair of an item, in ms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Inclusive start
    pub start_ms: f64,
    /// Exclusive end
    pub end_ms: f64,
}

impl Bounds {
    /// Create bounds
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Length in ms
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    /// Whether both values are finite and `start < end`
    pub fn is_valid(&self) -> bool {
        self.start_ms.is_finite() && self.end_ms.is_finite() && self.start_ms < self.end_ms
    }
}

/// A time-bounded unit placed on a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item ID
    pub id: ItemId,
    /// Owning track
    pub track_id: TrackId,
    /// Lane within the track; `None` until lanes are assigned
    #[serde(default)]
    pub sub_track: Option<usize>,
    /// Start time in ms
    pub start_ms: f64,
    /// End time in ms
    pub end_ms: f64,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Color override
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl Item {
    /// Create an item with a fresh ID and no lane
    pub fn new(track_id: TrackId, start_ms: f64, end_ms: f64) -> Self {
        Self {
            id: ItemId::new(),
            track_id,
            sub_track: None,
            start_ms,
            end_ms,
            label: None,
            color: None,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Current bounds
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.start_ms, self.end_ms)
    }

    /// Overwrite both bounds
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.start_ms = bounds.start_ms;
        self.end_ms = bounds.end_ms;
    }

    /// Length in ms
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    /// Whether `time_ms` falls strictly inside the item
    pub fn contains_time(&self, time_ms: f64) -> bool {
        self.start_ms < time_ms && time_ms < self.end_ms
    }

    /// Whether the bounds are finite
    pub fn has_finite_bounds(&self) -> bool {
        self.start_ms.is_finite() && self.end_ms.is_finite()
    }

    /// Copy shifted by `delta_ms` with a fresh ID and no lane
    pub fn shifted_copy(&self, delta_ms: f64) -> Self {
        Self {
            id: ItemId::new(),
            sub_track: None,
            start_ms: self.start_ms + delta_ms,
            end_ms: self.end_ms + delta_ms,
            ..self.clone()
        }
    }
}

/// Look up an item by ID
pub fn find_item(items: &[Item], id: ItemId) -> Option<&Item> {
    items.iter().find(|item| item.id == id)
}
