// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time/pixel transforms.
//!
//! Everything here is pure and runs inside per-frame pointer handlers, so
//! bad input never panics: it is replaced by a safe default and logged.

use crate::viewport::ViewWindow;
use serde::{Deserialize, Serialize};

/// Convert a time in ms to pixels
pub fn ms_to_px(ms: f64, px_per_ms: f64) -> f64 {
    if !ms.is_finite() || !px_per_ms.is_finite() || px_per_ms <= 0.0 {
        tracing::warn!(ms, px_per_ms, "ms_to_px: invalid input, using 0");
        return 0.0;
    }
    ms * px_per_ms
}

/// Convert pixels to a time in ms
pub fn px_to_ms(px: f64, px_per_ms: f64) -> f64 {
    if !px.is_finite() || !px_per_ms.is_finite() || px_per_ms <= 0.0 {
        tracing::warn!(px, px_per_ms, "px_to_ms: invalid input, using 0");
        return 0.0;
    }
    px / px_per_ms
}

/// Clamp `value` into `[min, max]`.
///
/// A non-finite value yields `min`; when `min > max`, `min` wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        tracing::warn!(value, "clamp: non-finite value, using {min}");
        return min;
    }
    value.min(max).max(min)
}

/// Length of one frame in ms, or `None` when frame snapping is disabled
pub fn frame_duration_ms(frame_rate: f64) -> Option<f64> {
    (frame_rate.is_finite() && frame_rate > 0.0).then(|| 1000.0 / frame_rate)
}

/// Round a time to the nearest frame boundary.
///
/// A non-positive frame rate disables snapping.
pub fn snap_to_frame(time_ms: f64, frame_rate: f64) -> f64 {
    if !time_ms.is_finite() {
        tracing::warn!(time_ms, "snap_to_frame: non-finite time, using 0");
        return 0.0;
    }
    match frame_duration_ms(frame_rate) {
        Some(frame) => (time_ms / frame).round() * frame,
        None => time_ms,
    }
}

/// Host viewport size and the fixed chrome around the content area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineLayout {
    /// Full widget width
    pub width_px: f64,
    /// Full widget height
    pub height_px: f64,
    /// Track label column on the left
    pub label_column_px: f64,
    /// Time ruler on top
    pub ruler_px: f64,
    /// Horizontal scrollbar at the bottom
    pub scrollbar_px: f64,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self {
            width_px: 1200.0,
            height_px: 400.0,
            label_column_px: 200.0,
            ruler_px: 32.0,
            scrollbar_px: 12.0,
        }
    }
}

impl TimelineLayout {
    /// Width available to items
    pub fn content_width_px(&self) -> f64 {
        (self.width_px - self.label_column_px).max(0.0)
    }

    /// Height available to lanes
    pub fn content_height_px(&self) -> f64 {
        (self.height_px - self.ruler_px - self.scrollbar_px).max(0.0)
    }
}

/// Visible time span derived from the horizontal window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    /// First visible ms
    pub start_ms: f64,
    /// Last visible ms
    pub end_ms: f64,
}

impl VisibleRange {
    /// Project a normalized window onto the full duration
    pub fn from_window(window: ViewWindow, duration_ms: f64) -> Self {
        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            tracing::warn!(duration_ms, "VisibleRange: invalid duration, using 0");
            0.0
        };
        Self {
            start_ms: window.start * duration_ms,
            end_ms: window.end * duration_ms,
        }
    }

    /// Visible span in ms
    pub fn span_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    /// Horizontal scale for a content width
    pub fn px_per_ms(&self, content_width_px: f64) -> f64 {
        let span = self.span_ms();
        if !(span.is_finite() && span > 0.0) || !content_width_px.is_finite() {
            tracing::warn!(span, content_width_px, "px_per_ms: empty visible range, using 0");
            return 0.0;
        }
        content_width_px / span
    }

    /// Content-relative x of a time
    pub fn x_at_time(&self, time_ms: f64, px_per_ms: f64) -> f64 {
        ms_to_px(time_ms - self.start_ms, px_per_ms)
    }

    /// Time under a content-relative x
    pub fn time_at_x(&self, x: f64, px_per_ms: f64) -> f64 {
        self.start_ms + px_to_ms(x, px_per_ms)
    }
}
