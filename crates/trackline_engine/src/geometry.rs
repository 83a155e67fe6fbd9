// SPDX-License-Identifier: MIT OR Apache-2.0
//! On-screen item boxes.
//!
//! Coordinates are relative to the content area (chrome excluded). Tracks
//! stack top to bottom in list order; each track is as tall as its lane
//! count times the lane height.

use crate::item::{Item, ItemId};
use crate::lanes::max_sub_tracks;
use crate::track::{TrackId, TrackList};
use crate::transform::VisibleRange;
use std::collections::HashMap;

/// Axis-aligned rectangle in content px
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl Rect {
    /// Rectangle spanning two corner points in any order
    pub fn from_points(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    /// Whether the point lies inside (edges included)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Whether two rectangles share any area or edge
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }
}

/// Screen box of one item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    /// Item this box belongs to
    pub item_id: ItemId,
    /// Owning track
    pub track_id: TrackId,
    /// Box bounds
    pub rect: Rect,
}

/// Vertical offset (before scrolling) of every track, plus total height
pub fn track_offsets(tracks: &TrackList, items: &[Item], lane_height_px: f64) -> (HashMap<TrackId, f64>, f64) {
    let mut offsets = HashMap::with_capacity(tracks.len());
    let mut y = 0.0;
    for track in tracks.iter() {
        offsets.insert(track.id, y);
        y += max_sub_tracks(track.id, items) as f64 * lane_height_px;
    }
    (offsets, y)
}

/// Total stacked height of all tracks
pub fn total_content_height(tracks: &TrackList, items: &[Item], lane_height_px: f64) -> f64 {
    track_offsets(tracks, items, lane_height_px).1
}

/// Total lane count across all tracks
pub fn total_lanes(tracks: &TrackList, items: &[Item]) -> usize {
    tracks.iter().map(|track| max_sub_tracks(track.id, items)).sum()
}

/// Boxes for every item on a known track.
///
/// `scroll_y_px` is subtracted from every y so the boxes match what is on
/// screen. Items on unknown tracks get no box.
pub fn item_boxes(
    tracks: &TrackList,
    items: &[Item],
    visible: &VisibleRange,
    px_per_ms: f64,
    lane_height_px: f64,
    scroll_y_px: f64,
) -> Vec<ItemBox> {
    let (offsets, _) = track_offsets(tracks, items, lane_height_px);
    items
        .iter()
        .filter_map(|item| {
            let track_y = offsets.get(&item.track_id)?;
            let lane = item.sub_track.unwrap_or(0) as f64;
            let y0 = track_y + lane * lane_height_px - scroll_y_px;
            Some(ItemBox {
                item_id: item.id,
                track_id: item.track_id,
                rect: Rect {
                    x0: visible.x_at_time(item.start_ms, px_per_ms),
                    x1: visible.x_at_time(item.end_ms, px_per_ms),
                    y0,
                    y1: y0 + lane_height_px,
                },
            })
        })
        .collect()
}

/// Topmost box under a point (later boxes win)
pub fn hit_test(boxes: &[ItemBox], x: f64, y: f64) -> Option<&ItemBox> {
    boxes.iter().rev().find(|b| b.rect.contains(x, y))
}

/// Track under a content-relative y (after scrolling)
pub fn track_at_y(tracks: &TrackList, items: &[Item], lane_height_px: f64, y: f64, scroll_y_px: f64) -> Option<TrackId> {
    let y = y + scroll_y_px;
    if !(y.is_finite() && y >= 0.0) {
        return None;
    }
    let mut top = 0.0;
    for track in tracks.iter() {
        let bottom = top + max_sub_tracks(track.id, items) as f64 * lane_height_px;
        if y < bottom {
            return Some(track.id);
        }
        top = bottom;
    }
    None
}
