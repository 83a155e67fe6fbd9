// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag and resize of one or more items.
//!
//! A [`DragSession`] is captured on pointer down and never mutated by later
//! frames except for the last pointer position. Every move derives a fresh
//! candidate item set from the session and the current base set, so an
//! out-of-band change to the items between frames cannot corrupt the
//! gesture.

use crate::item::{Bounds, Item, ItemId};
use crate::lanes::reassign_tracks;
use crate::snap::Snapper;
use crate::track::TrackId;
use crate::transform::{clamp, frame_duration_ms, snap_to_frame};
use std::collections::BTreeSet;

/// What the pointer is doing to the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Shift both bounds
    Move,
    /// Drag the start edge
    ResizeStart,
    /// Drag the end edge
    ResizeEnd,
}

impl DragMode {
    /// History label for this kind of drag
    pub fn label(&self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::ResizeStart => "Trim start",
            Self::ResizeEnd => "Trim end",
        }
    }
}

/// Time limits a drag must respect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragLimits {
    /// Timeline duration; non-positive means unbounded
    pub duration_ms: f64,
    /// Minimum item duration after a resize
    pub min_duration_ms: f64,
}

impl DragLimits {
    fn max_time(&self) -> f64 {
        if self.duration_ms.is_finite() && self.duration_ms > 0.0 {
            self.duration_ms
        } else {
            f64::INFINITY
        }
    }
}

/// Shift a span into `[0, duration]` without changing its length
pub fn clamp_span(bounds: Bounds, limits: &DragLimits) -> Bounds {
    let len = bounds.duration_ms();
    let latest_start = (limits.max_time() - len).max(0.0);
    let start = clamp(bounds.start_ms, 0.0, latest_start);
    Bounds::new(start, start + len)
}

/// Move: shift by `delta`, snap start or else end, clamp into the timeline
pub fn move_bounds(original: Bounds, delta_ms: f64, limits: &DragLimits, snapper: &Snapper) -> Bounds {
    let start = original.start_ms + delta_ms;
    let end = original.end_ms + delta_ms;

    let correction = snapper
        .snap(start)
        .map(|snapped| snapped - start)
        .or_else(|| snapper.snap(end).map(|snapped| snapped - end))
        .unwrap_or(0.0);

    clamp_span(Bounds::new(start + correction, end + correction), limits)
}

/// Resize the start edge, keeping at least the minimum duration
pub fn resize_start_bounds(original: Bounds, delta_ms: f64, limits: &DragLimits, snapper: &Snapper) -> Bounds {
    let latest = original.end_ms - limits.min_duration_ms;
    let mut start = clamp(original.start_ms + delta_ms, 0.0, latest);
    if let Some(snapped) = snapper.snap(start) {
        start = clamp(snapped, 0.0, latest);
    }
    Bounds::new(start, original.end_ms)
}

/// Resize the end edge, keeping at least the minimum duration
pub fn resize_end_bounds(original: Bounds, delta_ms: f64, limits: &DragLimits, snapper: &Snapper) -> Bounds {
    let earliest = original.start_ms + limits.min_duration_ms;
    let max_time = limits.max_time();
    let mut end = clamp(original.end_ms + delta_ms, earliest, max_time);
    if let Some(snapped) = snapper.snap(end) {
        end = clamp(snapped, earliest, max_time);
    }
    Bounds::new(original.start_ms, end)
}

/// Apply a drag mode to one item's original bounds
pub fn apply_drag(mode: DragMode, original: Bounds, delta_ms: f64, limits: &DragLimits, snapper: &Snapper) -> Bounds {
    match mode {
        DragMode::Move => move_bounds(original, delta_ms, limits, snapper),
        DragMode::ResizeStart => resize_start_bounds(original, delta_ms, limits, snapper),
        DragMode::ResizeEnd => resize_end_bounds(original, delta_ms, limits, snapper),
    }
}

fn min_duration_in_frames(min_duration_ms: f64, frame_rate: f64) -> f64 {
    match frame_duration_ms(frame_rate) {
        Some(frame) => ((min_duration_ms / frame) - 1e-9).ceil().max(1.0) * frame,
        None => min_duration_ms,
    }
}

/// Last frame boundary at or before the timeline end
fn last_frame_before(duration_ms: f64, frame_rate: f64) -> f64 {
    match frame_duration_ms(frame_rate) {
        Some(frame) => {
            let snapped = ((duration_ms / frame) + 1e-9).floor() * frame;
            if snapped > 0.0 {
                snapped
            } else {
                duration_ms
            }
        }
        None => duration_ms,
    }
}

/// Frame-snap final bounds on release.
///
/// Resizes keep at least the minimum duration rounded up to whole frames;
/// moves keep at least one frame. An end snapped past the timeline is
/// pulled back to the last whole frame, shifting the start on a move.
pub fn finalize_bounds(mode: DragMode, bounds: Bounds, frame_rate: f64, limits: &DragLimits) -> Bounds {
    let start = snap_to_frame(bounds.start_ms, frame_rate).max(0.0);
    let end = snap_to_frame(bounds.end_ms, frame_rate);
    let min = min_duration_in_frames(limits.min_duration_ms, frame_rate);

    let snapped = match mode {
        DragMode::Move => {
            let floor = frame_duration_ms(frame_rate).unwrap_or(limits.min_duration_ms);
            if end > start {
                Bounds::new(start, end)
            } else {
                Bounds::new(start, start + floor)
            }
        }
        DragMode::ResizeStart => {
            if end - start >= min - 1e-6 {
                Bounds::new(start, end)
            } else {
                let start = (end - min).max(0.0);
                Bounds::new(start, end.max(start + min))
            }
        }
        DragMode::ResizeEnd => {
            if end - start >= min - 1e-6 {
                Bounds::new(start, end)
            } else {
                Bounds::new(start, start + min)
            }
        }
    };

    let max_time = limits.max_time();
    if snapped.end_ms <= max_time + 1e-9 {
        return snapped;
    }
    let last = last_frame_before(max_time, frame_rate);
    match mode {
        DragMode::Move => {
            let start = (last - snapped.duration_ms()).max(0.0);
            Bounds::new(start, last)
        }
        DragMode::ResizeStart | DragMode::ResizeEnd => {
            let start = if last - snapped.start_ms >= min - 1e-6 {
                snapped.start_ms
            } else {
                (last - min).max(0.0)
            };
            Bounds::new(start, last)
        }
    }
}

/// State captured when a drag starts
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Item under the pointer
    pub item_id: ItemId,
    /// Drag mode
    pub mode: DragMode,
    /// Pointer x on press (content px)
    pub origin_x: f64,
    /// Last pointer x seen
    pub last_x: f64,
    /// Bounds of the initiating item on press
    pub original: Bounds,
    /// Other selected items and their bounds on press
    pub followers: Vec<(ItemId, Bounds)>,
    /// Full item set on press, recorded to history on commit
    pub snapshot: Vec<Item>,
}

/// One frame of a drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragFrame {
    /// Candidate item set
    pub items: Vec<Item>,
    /// New bounds of the initiating item, if it still exists
    pub primary: Option<Bounds>,
}

impl DragSession {
    /// Capture a drag on `item_id`. Returns `None` if the item is unknown.
    pub fn begin(
        items: &[Item],
        item_id: ItemId,
        mode: DragMode,
        pointer_x: f64,
        selection: &BTreeSet<ItemId>,
    ) -> Option<Self> {
        let original = items.iter().find(|item| item.id == item_id)?.bounds();
        let followers = if selection.contains(&item_id) {
            items
                .iter()
                .filter(|item| item.id != item_id && selection.contains(&item.id))
                .map(|item| (item.id, item.bounds()))
                .collect()
        } else {
            Vec::new()
        };

        Some(Self {
            item_id,
            mode,
            origin_x: pointer_x,
            last_x: pointer_x,
            original,
            followers,
            snapshot: items.to_vec(),
        })
    }

    /// Every item moved by this drag
    pub fn dragged_ids(&self) -> BTreeSet<ItemId> {
        std::iter::once(self.item_id)
            .chain(self.followers.iter().map(|(id, _)| *id))
            .collect()
    }

    /// Pointer delta in px since the press
    pub fn delta_px(&self) -> f64 {
        self.last_x - self.origin_x
    }

    /// Candidate set for a time delta.
    ///
    /// The initiating item is snapped; followers get the raw delta.
    pub fn frame(&self, base: &[Item], delta_ms: f64, limits: &DragLimits, snapper: &Snapper) -> DragFrame {
        let delta_ms = if delta_ms.is_finite() { delta_ms } else { 0.0 };
        let unsnapped = Snapper::disabled();
        let mut primary = None;

        let items = base
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if item.id == self.item_id {
                    let bounds = apply_drag(self.mode, self.original, delta_ms, limits, snapper);
                    primary = Some(bounds);
                    item.set_bounds(bounds);
                } else if let Some((_, original)) = self.followers.iter().find(|(id, _)| *id == item.id) {
                    item.set_bounds(apply_drag(self.mode, *original, delta_ms, limits, &unsnapped));
                }
                item
            })
            .collect();

        DragFrame { items, primary }
    }

    /// Final item set: frame-snapped bounds and compacted lanes on every
    /// touched track. Returns the set and the touched tracks.
    pub fn commit(
        &self,
        base: &[Item],
        delta_ms: f64,
        limits: &DragLimits,
        snapper: &Snapper,
        frame_rate: f64,
        max_lanes: usize,
    ) -> (Vec<Item>, BTreeSet<TrackId>) {
        let dragged = self.dragged_ids();
        let mut items = self.frame(base, delta_ms, limits, snapper).items;
        let mut touched = BTreeSet::new();

        for item in items.iter_mut().filter(|item| dragged.contains(&item.id)) {
            item.set_bounds(finalize_bounds(self.mode, item.bounds(), frame_rate, limits));
            touched.insert(item.track_id);
        }

        reassign_tracks(touched.iter().copied(), &mut items, max_lanes);
        (items, touched)
    }
}
