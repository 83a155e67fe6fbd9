// SPDX-License-Identifier: MIT OR Apache-2.0
//! Point-in-time markers, independent of tracks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub Uuid);

impl MarkerId {
    /// Create a new random marker ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerId {
    fn default() -> Self {
        Self::new()
    }
}

/// A labeled point-in-time annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique marker ID
    pub id: MarkerId,
    /// Time position in ms
    pub time_ms: f64,
    /// Marker label
    #[serde(default)]
    pub label: Option<String>,
    /// Free-form comment
    #[serde(default)]
    pub comment: Option<String>,
    /// Marker color
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl Marker {
    /// Create a marker at a time
    pub fn new(time_ms: f64) -> Self {
        Self {
            id: MarkerId::new(),
            time_ms,
            label: None,
            comment: None,
            color: None,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Result of toggling a marker
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerToggle {
    /// A new marker was added
    Added(MarkerId),
    /// An existing marker was removed
    Removed(MarkerId),
}

/// Remove the marker within `tolerance_ms` of `time_ms`, or add one there.
pub fn toggle_marker_at(markers: &mut Vec<Marker>, time_ms: f64, tolerance_ms: f64) -> MarkerToggle {
    let existing = markers
        .iter()
        .position(|m| (m.time_ms - time_ms).abs() <= tolerance_ms);

    match existing {
        Some(idx) => MarkerToggle::Removed(markers.remove(idx).id),
        None => {
            let marker = Marker::new(time_ms);
            let id = marker.id;
            markers.push(marker);
            markers.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
            MarkerToggle::Added(id)
        }
    }
}
