// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport controller.
//!
//! Two independent normalized windows over `[0, 1]`: one over the timeline
//! duration, one over the stacked lane space. Vertical zoom additionally
//! scales the per-lane pixel height.

use serde::{Deserialize, Serialize};

/// Half-open normalized interval, `0 <= start < end <= 1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    /// Window start
    pub start: f64,
    /// Window end
    pub end: f64,
}

impl Default for ViewWindow {
    fn default() -> Self {
        Self::FULL
    }
}

impl ViewWindow {
    /// The whole range
    pub const FULL: Self = Self { start: 0.0, end: 1.0 };

    /// Create a window, falling back to the full range when invalid
    pub fn new(start: f64, end: f64) -> Self {
        if !(start.is_finite() && end.is_finite()) || start >= end {
            tracing::warn!(start, end, "ViewWindow: invalid window, using [0, 1]");
            return Self::FULL;
        }
        let start = start.max(0.0);
        let end = end.min(1.0);
        if start >= end {
            return Self::FULL;
        }
        Self { start, end }
    }

    /// Window size
    pub fn size(&self) -> f64 {
        self.end - self.start
    }

    /// Window center
    pub fn center(&self) -> f64 {
        (self.start + self.end) * 0.5
    }

    /// Window of `size` centred on `center`, shifted to stay inside `[0, 1]`
    pub fn centered(center: f64, size: f64) -> Self {
        let size = size.clamp(f64::MIN_POSITIVE, 1.0);
        if size >= 1.0 {
            return Self::FULL;
        }
        let start = (center - size * 0.5).clamp(0.0, 1.0 - size);
        Self { start, end: start + size }
    }

    /// Scale the window by `factor` around `pivot` (normalized position).
    ///
    /// `factor < 1` zooms in. The result never drops below `min_size`.
    pub fn zoom(&self, factor: f64, pivot: f64, min_size: f64) -> Self {
        if !(factor.is_finite() && factor > 0.0) || !pivot.is_finite() {
            tracing::warn!(factor, pivot, "ViewWindow::zoom: invalid input ignored");
            return *self;
        }
        let size = self.size();
        let new_size = (size * factor).clamp(min_size.min(1.0), 1.0);
        if new_size >= 1.0 {
            return Self::FULL;
        }
        let pivot = pivot.clamp(self.start, self.end);
        let ratio = (pivot - self.start) / size;
        let start = (pivot - ratio * new_size).clamp(0.0, 1.0 - new_size);
        Self { start, end: start + new_size }
    }

    /// Shift by `delta`, clamped to stay inside `[0, 1]`
    pub fn pan(&self, delta: f64) -> Self {
        if !delta.is_finite() {
            tracing::warn!(delta, "ViewWindow::pan: non-finite delta ignored");
            return *self;
        }
        let size = self.size();
        let start = (self.start + delta).clamp(0.0, 1.0 - size);
        Self { start, end: start + size }
    }
}

/// Horizontal and vertical view state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Window over the timeline duration
    pub horizontal: ViewWindow,
    /// Window over the stacked lane space
    pub vertical: ViewWindow,
    /// Per-lane height in px
    pub lane_height_px: f64,
    /// Lane height floor
    pub min_lane_height_px: f64,
    /// Lane height ceiling
    pub max_lane_height_px: f64,
    /// Smallest window size
    pub min_window_size: f64,
}

impl Viewport {
    /// Create a viewport showing everything.
    ///
    /// Swapped lane height bounds are put back in order.
    pub fn new(lane_height_px: f64, min_lane_height_px: f64, max_lane_height_px: f64, min_window_size: f64) -> Self {
        let mut viewport = Self {
            horizontal: ViewWindow::FULL,
            vertical: ViewWindow::FULL,
            lane_height_px,
            min_lane_height_px: min_lane_height_px.min(max_lane_height_px),
            max_lane_height_px: max_lane_height_px.max(min_lane_height_px),
            min_window_size,
        };
        viewport.lane_height_px = viewport.clamp_lane_height(lane_height_px);
        viewport
    }

    /// Clamp a lane height into the configured range without panicking on
    /// swapped or NaN bounds
    fn clamp_lane_height(&self, height: f64) -> f64 {
        let lo = self.min_lane_height_px.min(self.max_lane_height_px);
        let hi = self.max_lane_height_px.max(self.min_lane_height_px);
        if lo <= hi {
            height.max(lo).min(hi)
        } else {
            height
        }
    }

    /// Zoom the time axis around a normalized pivot
    pub fn zoom_horizontal(&mut self, factor: f64, pivot: f64) {
        self.horizontal = self.horizontal.zoom(factor, pivot, self.min_window_size);
    }

    /// Zoom the time axis around the window center (wheel zoom)
    pub fn zoom_horizontal_centered(&mut self, factor: f64) {
        let center = self.horizontal.center();
        self.zoom_horizontal(factor, center);
    }

    /// Pan the time axis by a normalized delta
    pub fn pan_horizontal(&mut self, delta: f64) {
        self.horizontal = self.horizontal.pan(delta);
    }

    /// Pan the lane axis by a normalized delta
    pub fn pan_vertical(&mut self, delta: f64) {
        self.vertical = self.vertical.pan(delta);
    }

    /// Largest vertical window size for the given content
    pub fn max_vertical_size(content_height_px: f64, viewport_height_px: f64) -> f64 {
        if !(content_height_px.is_finite() && viewport_height_px.is_finite())
            || content_height_px <= viewport_height_px
            || content_height_px <= 0.0
        {
            return 1.0;
        }
        (viewport_height_px / content_height_px).clamp(0.0, 1.0)
    }

    /// Resize the vertical window to match content vs viewport height,
    /// keeping its center stable.
    pub fn fit_vertical(&mut self, content_height_px: f64, viewport_height_px: f64) {
        let size = Self::max_vertical_size(content_height_px, viewport_height_px);
        self.vertical = if size >= 1.0 {
            ViewWindow::FULL
        } else {
            ViewWindow::centered(self.vertical.center(), size.max(self.min_window_size))
        };
    }

    /// Scale lane height by `factor`, then refit the vertical window.
    ///
    /// `total_lanes` is the lane count across all tracks.
    pub fn zoom_vertical(&mut self, factor: f64, total_lanes: usize, viewport_height_px: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            tracing::warn!(factor, "zoom_vertical: invalid factor ignored");
            return;
        }
        self.lane_height_px = self.clamp_lane_height(self.lane_height_px * factor);
        let content = total_lanes as f64 * self.lane_height_px;
        self.fit_vertical(content, viewport_height_px);
    }

    /// Vertical scroll offset in px for the given content height
    pub fn scroll_y_px(&self, content_height_px: f64) -> f64 {
        self.vertical.start * content_height_px.max(0.0)
    }
}
