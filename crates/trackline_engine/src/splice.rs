// SPDX-License-Identifier: MIT OR Apache-2.0
//! Splice (cut) of items at a single time point.
//!
//! A splice gesture sweeps a vertical cut line across lanes. Every item box
//! the line crosses joins a sticky affected set for the rest of the
//! gesture. On release the affected items are split at the frame-snapped
//! pointer time.

use crate::geometry::{hit_test, ItemBox};
use crate::item::{Item, ItemId};
use crate::lanes::reassign_tracks;
use crate::track::TrackId;
use std::collections::BTreeSet;

/// In-flight splice gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpliceSession {
    /// Press point (content px)
    pub origin: (f64, f64),
    /// Current pointer point
    pub current: (f64, f64),
    /// Items the cut line has crossed so far
    pub affected: BTreeSet<ItemId>,
}

impl SpliceSession {
    /// Start a sweep at the press point
    pub fn new(origin: (f64, f64), boxes: &[ItemBox]) -> Self {
        let mut session = Self {
            origin,
            current: origin,
            affected: BTreeSet::new(),
        };
        session.sweep(origin, boxes);
        session
    }

    /// Move the cut line and add every newly crossed item
    pub fn sweep(&mut self, point: (f64, f64), boxes: &[ItemBox]) {
        self.current = point;
        let (x, y0, y1) = self.cut_line();
        self.affected
            .extend(boxes.iter().filter(|b| line_crosses(b, x, y0, y1)).map(|b| b.item_id));
    }

    /// Cut line as `(x, top, bottom)`
    pub fn cut_line(&self) -> (f64, f64, f64) {
        let (top, bottom) = if self.origin.1 <= self.current.1 {
            (self.origin.1, self.current.1)
        } else {
            (self.current.1, self.origin.1)
        };
        (self.current.0, top, bottom)
    }
}

/// Whether a vertical line at `x` spanning `y0..=y1` crosses a box
pub fn line_crosses(item_box: &ItemBox, x: f64, y0: f64, y1: f64) -> bool {
    let rect = &item_box.rect;
    rect.x0 <= x && x <= rect.x1 && rect.y0 <= y1 && y0 <= rect.y1
}

/// Items to cut and whether the selection chose them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpliceTargets {
    /// Item IDs to split
    pub items: BTreeSet<ItemId>,
    /// The selection supplied the targets
    pub from_selection: bool,
}

/// Resolve what a release splices.
///
/// Crossed items win. With nothing crossed, a non-empty selection is cut;
/// otherwise the item under the release point, if any.
pub fn resolve_targets(
    crossed: &BTreeSet<ItemId>,
    selection: &BTreeSet<ItemId>,
    boxes: &[ItemBox],
    release: (f64, f64),
) -> SpliceTargets {
    if !crossed.is_empty() {
        return SpliceTargets {
            items: crossed.clone(),
            from_selection: false,
        };
    }
    if !selection.is_empty() {
        return SpliceTargets {
            items: selection.clone(),
            from_selection: true,
        };
    }
    SpliceTargets {
        items: hit_test(boxes, release.0, release.1).map(|b| b.item_id).into_iter().collect(),
        from_selection: false,
    }
}

/// Split one item at `cut_ms`.
///
/// Both children get fresh IDs and inherit track, label and color. Returns
/// `None` unless `start < cut < end`.
pub fn split_item(item: &Item, cut_ms: f64) -> Option<(Item, Item)> {
    if !(cut_ms.is_finite() && item.contains_time(cut_ms)) {
        return None;
    }
    let mut left = item.shifted_copy(0.0);
    left.end_ms = cut_ms;
    let mut right = item.shifted_copy(0.0);
    right.start_ms = cut_ms;
    Some((left, right))
}

/// Result of a splice
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpliceOutcome {
    /// New item set (unchanged when nothing split)
    pub items: Vec<Item>,
    /// Original items that were split
    pub split: Vec<ItemId>,
    /// Tracks whose lanes were recomputed
    pub touched: BTreeSet<TrackId>,
}

impl SpliceOutcome {
    /// Whether anything was cut
    pub fn is_empty(&self) -> bool {
        self.split.is_empty()
    }
}

/// Split every target containing `cut_ms`, keeping list order, and compact
/// lanes on the affected tracks.
pub fn splice_items(items: &[Item], targets: &BTreeSet<ItemId>, cut_ms: f64, max_lanes: usize) -> SpliceOutcome {
    let mut out = Vec::with_capacity(items.len() + targets.len());
    let mut split = Vec::new();
    let mut touched = BTreeSet::new();

    for item in items {
        let pieces = targets
            .contains(&item.id)
            .then(|| split_item(item, cut_ms))
            .flatten();
        match pieces {
            Some((left, right)) => {
                split.push(item.id);
                touched.insert(item.track_id);
                out.push(left);
                out.push(right);
            }
            None => out.push(item.clone()),
        }
    }

    if split.is_empty() {
        return SpliceOutcome {
            items: items.to_vec(),
            ..SpliceOutcome::default()
        };
    }

    reassign_tracks(touched.iter().copied(), &mut out, max_lanes);
    SpliceOutcome {
        items: out,
        split,
        touched,
    }
}
