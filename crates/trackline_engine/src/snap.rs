// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snap engine.
//!
//! Guide points are the playhead, every marker and the edges of every item
//! not currently being dragged. The tolerance is a constant on-screen
//! radius converted to ms, floored so deep zoom never disables snapping.

use crate::binding::Binding;
use crate::item::{Item, ItemId};
use crate::marker::Marker;
use std::collections::BTreeSet;

/// Kind of guide point, in descending tie-break priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GuideKind {
    /// Current playhead
    Playhead,
    /// A marker
    Marker,
    /// Start or end of another item
    ItemEdge,
}

/// A time a dragged value may snap to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidePoint {
    /// Guide time in ms
    pub time_ms: f64,
    /// Source of the guide
    pub kind: GuideKind,
}

/// Collect guide points, skipping edges of `excluded` items
pub fn collect_guide_points(
    playhead_ms: f64,
    markers: &[Marker],
    items: &[Item],
    excluded: &BTreeSet<ItemId>,
) -> Vec<GuidePoint> {
    let mut points = Vec::with_capacity(1 + markers.len() + items.len() * 2);

    if playhead_ms.is_finite() {
        points.push(GuidePoint { time_ms: playhead_ms, kind: GuideKind::Playhead });
    }

    points.extend(
        markers
            .iter()
            .filter(|m| m.time_ms.is_finite())
            .map(|m| GuidePoint { time_ms: m.time_ms, kind: GuideKind::Marker }),
    );

    for item in items.iter().filter(|item| !excluded.contains(&item.id) && item.has_finite_bounds()) {
        points.push(GuidePoint { time_ms: item.start_ms, kind: GuideKind::ItemEdge });
        points.push(GuidePoint { time_ms: item.end_ms, kind: GuideKind::ItemEdge });
    }

    points
}

/// Snap tolerance in ms for the current zoom
pub fn snap_threshold_ms(snap_radius_px: f64, px_per_ms: f64, min_threshold_ms: f64) -> f64 {
    if !(px_per_ms.is_finite() && px_per_ms > 0.0) {
        return min_threshold_ms;
    }
    (snap_radius_px / px_per_ms).max(min_threshold_ms)
}

/// Closest guide point within `threshold_ms` of `time_ms`.
///
/// Equal distances resolve playhead first, then markers, then item edges,
/// then collection order.
pub fn find_snap_point(time_ms: f64, guides: &[GuidePoint], threshold_ms: f64) -> Option<GuidePoint> {
    if !time_ms.is_finite() {
        return None;
    }

    let mut best: Option<(f64, GuidePoint)> = None;
    for guide in guides {
        let distance = (guide.time_ms - time_ms).abs();
        if distance > threshold_ms {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_distance, best_guide)) => {
                distance < best_distance || (distance == best_distance && guide.kind < best_guide.kind)
            }
        };
        if better {
            best = Some((distance, *guide));
        }
    }
    best.map(|(_, guide)| guide)
}

/// Persistent snap toggle plus a per-gesture override
#[derive(Debug, Clone, PartialEq)]
pub struct SnapSettings {
    /// Persistent toggle
    pub enabled: Binding<bool>,
    /// Temporary override for the current gesture
    pub temporary_override: Option<bool>,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: Binding::uncontrolled(true),
            temporary_override: None,
        }
    }
}

impl SnapSettings {
    /// Create settings around a binding
    pub fn new(enabled: Binding<bool>) -> Self {
        Self { enabled, temporary_override: None }
    }

    /// Override if present, else the persistent toggle
    pub fn is_effective(&self) -> bool {
        self.temporary_override.unwrap_or(*self.enabled.get())
    }
}

/// Snaps candidate times against a fixed set of guides
#[derive(Debug, Clone)]
pub struct Snapper {
    guides: Vec<GuidePoint>,
    threshold_ms: f64,
    enabled: bool,
}

impl Snapper {
    /// Build a snapper for one pointer frame
    pub fn new(guides: Vec<GuidePoint>, threshold_ms: f64, enabled: bool) -> Self {
        Self { guides, threshold_ms, enabled }
    }

    /// A snapper that never snaps
    pub fn disabled() -> Self {
        Self::new(Vec::new(), 0.0, false)
    }

    /// Snapped time for `time_ms`, if a guide is in range
    pub fn snap(&self, time_ms: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        find_snap_point(time_ms, &self.guides, self.threshold_ms).map(|g| g.time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackId;

    #[test]
    fn test_threshold_is_floored() {
        assert_eq!(snap_threshold_ms(10.0, 0.1, 50.0), 100.0);
        assert_eq!(snap_threshold_ms(10.0, 10.0, 50.0), 50.0);
        assert_eq!(snap_threshold_ms(10.0, 0.0, 50.0), 50.0);
    }

    #[test]
    fn test_guides_exclude_dragged_items() {
        let track = TrackId::new();
        let dragged = Item::new(track, 0.0, 1000.0);
        let other = Item::new(track, 2000.0, 3000.0);
        let excluded: BTreeSet<_> = [dragged.id].into_iter().collect();

        let guides = collect_guide_points(500.0, &[Marker::new(1500.0)], &[dragged, other], &excluded);
        let times: Vec<_> = guides.iter().map(|g| g.time_ms).collect();
        assert_eq!(times, vec![500.0, 1500.0, 2000.0, 3000.0]);
    }

    #[test]
    fn test_closest_within_threshold() {
        let guides = [
            GuidePoint { time_ms: 1000.0, kind: GuideKind::ItemEdge },
            GuidePoint { time_ms: 1030.0, kind: GuideKind::Marker },
        ];
        assert_eq!(find_snap_point(1020.0, &guides, 50.0).unwrap().time_ms, 1030.0);
        assert!(find_snap_point(1200.0, &guides, 50.0).is_none());
    }

    #[test]
    fn test_tie_prefers_playhead() {
        let guides = [
            GuidePoint { time_ms: 990.0, kind: GuideKind::ItemEdge },
            GuidePoint { time_ms: 1010.0, kind: GuideKind::Marker },
            GuidePoint { time_ms: 990.0, kind: GuideKind::Playhead },
        ];
        let hit = find_snap_point(1000.0, &guides, 50.0).unwrap();
        assert_eq!(hit.kind, GuideKind::Playhead);
    }

    #[test]
    fn test_override_wins() {
        let mut settings = SnapSettings::default();
        assert!(settings.is_effective());
        settings.temporary_override = Some(false);
        assert!(!settings.is_effective());
    }

    #[test]
    fn test_disabled_snapper() {
        let guides = vec![GuidePoint { time_ms: 100.0, kind: GuideKind::Playhead }];
        assert_eq!(Snapper::new(guides.clone(), 50.0, true).snap(120.0), Some(100.0));
        assert_eq!(Snapper::new(guides, 50.0, false).snap(120.0), None);
        assert_eq!(Snapper::disabled().snap(120.0), None);
    }
}
