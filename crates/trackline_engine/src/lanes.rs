// SPDX-License-Identifier: MIT OR Apache-2.0
//! Collision resolution and lane (sub-track) assignment.
//!
//! Items on the same track that overlap in time are pushed into separate
//! lanes. The search is bounded by a lane cap: past it the item lands in
//! lane 0 and a diagnostic is logged, trading a perfect layout for
//! guaranteed termination. These functions run on every pointer frame and
//! never panic on malformed input.

use crate::item::Item;
use crate::track::TrackId;
use std::collections::{BTreeSet, HashMap};

/// Half-open interval overlap test
pub fn items_overlap(a: &Item, b: &Item) -> bool {
    !(a.end_ms <= b.start_ms || a.start_ms >= b.end_ms)
}

/// Lowest lane in `0..max_lanes` whose occupants do not overlap `item`
fn lowest_free_lane<'a>(
    item: &Item,
    placed: impl Iterator<Item = (&'a Item, usize)> + Clone,
    max_lanes: usize,
) -> Option<usize> {
    (0..max_lanes.max(1)).find(|&lane| {
        !placed
            .clone()
            .any(|(other, other_lane)| other_lane == lane && items_overlap(item, other))
    })
}

fn fallback_lane(item: &Item, max_lanes: usize) -> usize {
    tracing::warn!(
        item = ?item.id,
        track = ?item.track_id,
        max_lanes,
        "lane search exhausted, forcing lane 0"
    );
    0
}

/// Assign lanes to every item in a single pass, in input order.
///
/// Each item takes the lowest lane on its track not occupied by an
/// overlapping item placed earlier in the pass.
pub fn assign_sub_tracks(items: &[Item], max_lanes: usize) -> Vec<Item> {
    let mut placed: HashMap<TrackId, Vec<(usize, usize)>> = HashMap::new();
    let mut out: Vec<Item> = Vec::with_capacity(items.len());

    for item in items {
        let mut item = item.clone();
        let lane = if item.has_finite_bounds() {
            let on_track = placed.entry(item.track_id).or_default();
            let occupants = on_track.iter().map(|&(idx, lane)| (&out[idx], lane));
            let lane = lowest_free_lane(&item, occupants, max_lanes)
                .unwrap_or_else(|| fallback_lane(&item, max_lanes));
            on_track.push((out.len(), lane));
            lane
        } else {
            tracing::warn!(item = ?item.id, "non-finite item bounds, forcing lane 0");
            0
        };
        item.sub_track = Some(lane);
        out.push(item);
    }

    out
}

/// Lowest free lane for `item` on `track_id`, ignoring the item itself and
/// items whose lane is still unset.
pub fn find_available_sub_track(item: &Item, track_id: TrackId, all_items: &[Item], max_lanes: usize) -> usize {
    if !item.has_finite_bounds() {
        tracing::warn!(item = ?item.id, "non-finite item bounds, using lane 0");
        return 0;
    }
    let occupants = all_items.iter().filter_map(|other| {
        let lane = other.sub_track?;
        (other.id != item.id && other.track_id == track_id && other.has_finite_bounds()).then_some((other, lane))
    });
    lowest_free_lane(item, occupants, max_lanes).unwrap_or_else(|| fallback_lane(item, max_lanes))
}

/// Recompute lanes for one track from scratch (compaction).
///
/// The track's items are visited by ascending start (ties keep input
/// order); each takes the lowest free lane. Items on other tracks and the
/// order of `items` are left untouched.
pub fn reassign_track_sub_tracks(track_id: TrackId, items: &mut [Item], max_lanes: usize) {
    let mut order: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.track_id == track_id)
        .map(|(idx, _)| idx)
        .collect();

    for &idx in &order {
        items[idx].sub_track = None;
    }

    order.sort_by(|&a, &b| items[a].start_ms.total_cmp(&items[b].start_ms));

    let mut placed: Vec<(usize, usize)> = Vec::with_capacity(order.len());
    for idx in order {
        let lane = if items[idx].has_finite_bounds() {
            let occupants = placed.iter().map(|&(i, lane)| (&items[i], lane));
            lowest_free_lane(&items[idx], occupants, max_lanes)
                .unwrap_or_else(|| fallback_lane(&items[idx], max_lanes))
        } else {
            tracing::warn!(item = ?items[idx].id, "non-finite item bounds, forcing lane 0");
            0
        };
        if items[idx].has_finite_bounds() {
            placed.push((idx, lane));
        }
        items[idx].sub_track = Some(lane);
    }
}

/// Compact every listed track
pub fn reassign_tracks(track_ids: impl IntoIterator<Item = TrackId>, items: &mut [Item], max_lanes: usize) {
    let unique: BTreeSet<TrackId> = track_ids.into_iter().collect();
    for track_id in unique {
        reassign_track_sub_tracks(track_id, items, max_lanes);
    }
}

/// Lane count of a track: one more than its highest lane, at least 1
pub fn max_sub_tracks(track_id: TrackId, items: &[Item]) -> usize {
    items
        .iter()
        .filter(|item| item.track_id == track_id)
        .filter_map(|item| item.sub_track)
        .max()
        .map_or(1, |lane| lane + 1)
}
