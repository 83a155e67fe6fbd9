// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions and the ordered track list.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// A horizontal lane group holding items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Display label
    pub label: String,
    /// Optional group this track belongs to
    #[serde(default)]
    pub group_id: Option<String>,
    /// Track color override
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl Track {
    /// Create a new track
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            label: label.into(),
            group_id: None,
            color: None,
        }
    }

    /// Set the group
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }
}

/// Tracks in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Track>", into = "Vec<Track>")]
pub struct TrackList {
    tracks: IndexMap<TrackId, Track>,
}

impl TrackList {
    /// Create an empty track list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track at the bottom
    pub fn add(&mut self, track: Track) -> TrackId {
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    /// Remove a track, keeping the order of the rest
    pub fn remove(&mut self, track_id: TrackId) -> Option<Track> {
        self.tracks.shift_remove(&track_id)
    }

    /// Get a track
    pub fn get(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    /// Whether a track exists
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.tracks.contains_key(&track_id)
    }

    /// Display position of a track
    pub fn position(&self, track_id: TrackId) -> Option<usize> {
        self.tracks.get_index_of(&track_id)
    }

    /// Move the track at `from` to position `to`.
    ///
    /// Returns false when either index is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.tracks.len();
        if from >= len || to >= len {
            return false;
        }
        self.tracks.move_index(from, to);
        true
    }

    /// Iterate tracks in display order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Track IDs in display order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.keys().copied().collect()
    }

    /// Track count
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there are no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Snapshot as an ordered vector
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.values().cloned().collect()
    }
}

impl FromIterator<Track> for TrackList {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut list = Self::new();
        for track in iter {
            list.add(track);
        }
        list
    }
}

impl From<Vec<Track>> for TrackList {
    fn from(tracks: Vec<Track>) -> Self {
        tracks.into_iter().collect()
    }
}

impl From<TrackList> for Vec<Track> {
    fn from(list: TrackList) -> Self {
        list.tracks.into_values().collect()
    }
}
