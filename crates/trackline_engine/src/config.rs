// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration.
//!
//! Every tuning constant the engine uses lives here. The configuration is
//! built by the caller and handed to [`crate::TimelineEngine::new`]; nothing
//! is read from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of its allowed range
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Tuning constants for the timeline engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shortest duration a resize may produce (ms)
    pub min_item_duration_ms: f64,
    /// Upper bound on lanes per track before falling back to lane 0
    pub max_sub_tracks: usize,
    /// On-screen snap radius in pixels
    pub snap_radius_px: f64,
    /// Snap threshold floor in ms, so deep zoom never disables snapping
    pub min_snap_threshold_ms: f64,
    /// Maximum number of history entries kept
    pub history_cap: usize,
    /// Width of the resize handle at each item edge (px)
    pub resize_handle_px: f64,
    /// Initial per-lane height (px)
    pub lane_height_px: f64,
    /// Smallest per-lane height vertical zoom may reach (px)
    pub min_lane_height_px: f64,
    /// Largest per-lane height vertical zoom may reach (px)
    pub max_lane_height_px: f64,
    /// Smallest normalized view window size
    pub min_window_size: f64,
    /// Zoom factor applied per wheel notch
    pub wheel_zoom_step: f64,
    /// Distance within which an existing marker counts as "at the playhead" (ms)
    pub marker_tolerance_ms: f64,
    /// Emit gesture-level debug traces
    pub diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_item_duration_ms: 100.0,
            max_sub_tracks: 20,
            snap_radius_px: 10.0,
            min_snap_threshold_ms: 50.0,
            history_cap: 100,
            resize_handle_px: 6.0,
            lane_height_px: 32.0,
            min_lane_height_px: 16.0,
            max_lane_height_px: 128.0,
            min_window_size: 0.001,
            wheel_zoom_step: 1.2,
            marker_tolerance_ms: 1.0,
            diagnostics: false,
        }
    }
}

impl EngineConfig {
    /// Parse a config from RON text and validate it
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .depth_limit(2)
            .separate_tuple_members(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Save to a config file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive finite number, got {v}"),
                })
            }
        }

        positive("min_item_duration_ms", self.min_item_duration_ms)?;
        positive("snap_radius_px", self.snap_radius_px)?;
        positive("min_snap_threshold_ms", self.min_snap_threshold_ms)?;
        positive("resize_handle_px", self.resize_handle_px)?;
        positive("lane_height_px", self.lane_height_px)?;
        positive("min_lane_height_px", self.min_lane_height_px)?;
        positive("max_lane_height_px", self.max_lane_height_px)?;
        positive("marker_tolerance_ms", self.marker_tolerance_ms)?;

        if self.max_sub_tracks == 0 {
            return Err(ConfigError::Invalid {
                field: "max_sub_tracks",
                reason: "must allow at least one lane".to_string(),
            });
        }
        if self.history_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "history_cap",
                reason: "must keep at least one entry".to_string(),
            });
        }
        if self.min_lane_height_px > self.max_lane_height_px {
            return Err(ConfigError::Invalid {
                field: "min_lane_height_px",
                reason: "exceeds max_lane_height_px".to_string(),
            });
        }
        if !(self.min_window_size > 0.0 && self.min_window_size <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "min_window_size",
                reason: format!("expected (0, 1], got {}", self.min_window_size),
            });
        }
        if !(self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0) {
            return Err(ConfigError::Invalid {
                field: "wheel_zoom_step",
                reason: format!("expected a finite factor above 1, got {}", self.wheel_zoom_step),
            });
        }
        Ok(())
    }
}
