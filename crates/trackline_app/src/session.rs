// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted editing sessions.
//!
//! A session file (RON) describes the starting timeline and a list of input
//! steps. Tracks and items are written without IDs: items point at tracks
//! by index, so sessions stay hand-editable.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use trackline_engine::{
    ConfigError, EngineConfig, HistoryStats, Item, KeyCommand, Marker, Modifiers, PointerEvent,
    TimelineEngine, TimelineLayout, Tool, Track, TrackList,
};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to read the session file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Failed to parse session: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Embedded engine config is invalid
    #[error("Invalid engine config: {0}")]
    Config(#[from] ConfigError),

    /// Report could not be encoded
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    /// An item names a track index that does not exist
    #[error("Item {item} references unknown track index {track}")]
    UnknownTrack {
        /// Item position in the session
        item: usize,
        /// Track index it asked for
        track: usize,
    },
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Track as written in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTrack {
    /// Display label
    pub label: String,
    /// Optional group
    #[serde(default)]
    pub group: Option<String>,
}

/// Item as written in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionItem {
    /// Index into the session's track list
    pub track: usize,
    /// Start in ms
    pub start_ms: f64,
    /// End in ms
    pub end_ms: f64,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Pointer pressed
    PointerDown(PointerEvent),
    /// Pointer moved
    PointerMove(PointerEvent),
    /// Pointer released
    PointerUp(PointerEvent),
    /// Wheel scrolled
    Wheel {
        /// Horizontal delta
        dx: f64,
        /// Vertical delta
        dy: f64,
        /// Held modifiers
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Keyboard command
    Key(KeyCommand),
    /// Move the playhead
    Seek(f64),
    /// Select a tool
    Tool(Tool),
    /// Set or clear the temporary tool
    TemporaryTool(Option<Tool>),
    /// Set or clear the per-gesture snap override
    SnapOverride(Option<bool>),
    /// Zoom the time axis
    Zoom {
        /// Window scale, below 1 zooms in
        factor: f64,
        /// Normalized pivot
        pivot: f64,
    },
    /// Scale lane height
    ZoomLanes(f64),
    /// Move a track
    ReorderTrack {
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },
    /// Abandon the current gesture
    Cancel,
}

/// A scripted editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Engine tuning
    pub config: EngineConfig,
    /// Widget layout
    pub layout: TimelineLayout,
    /// Timeline duration
    pub duration_ms: f64,
    /// Frame rate for frame snapping
    pub frame_rate: f64,
    /// Initial playhead
    pub playhead_ms: f64,
    /// Tracks, top to bottom
    pub tracks: Vec<SessionTrack>,
    /// Initial items
    pub items: Vec<SessionItem>,
    /// Marker times
    pub markers: Vec<f64>,
    /// Inputs to replay
    pub steps: Vec<Step>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            layout: TimelineLayout::default(),
            duration_ms: 60_000.0,
            frame_rate: 30.0,
            playhead_ms: 0.0,
            tracks: Vec::new(),
            items: Vec::new(),
            markers: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Final state after a replay
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Tracks in final order
    pub tracks: Vec<Track>,
    /// Final items
    pub items: Vec<Item>,
    /// Final markers
    pub markers: Vec<Marker>,
    /// Number of selected items
    pub selected: usize,
    /// Final playhead
    pub playhead_ms: f64,
    /// History position
    pub history: HistoryStats,
    /// Name of every signal emitted, in order
    pub signals: Vec<String>,
}

impl Session {
    /// Parse a session from RON text
    pub fn from_ron_str(s: &str) -> Result<Self> {
        let session: Session = ron::from_str(s)?;
        session.config.validate()?;
        Ok(session)
    }

    /// Load a session file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Build an engine in the session's starting state
    pub fn build_engine(&self) -> Result<TimelineEngine> {
        let tracks: Vec<Track> = self
            .tracks
            .iter()
            .map(|t| match &t.group {
                Some(group) => Track::new(t.label.clone()).with_group(group.clone()),
                None => Track::new(t.label.clone()),
            })
            .collect();

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let track = tracks.get(item.track).ok_or(SessionError::UnknownTrack {
                    item: idx,
                    track: item.track,
                })?;
                let mut built = Item::new(track.id, item.start_ms, item.end_ms);
                built.label = item.label.clone();
                Ok(built)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut engine = TimelineEngine::new(self.config.clone());
        engine.set_duration(self.duration_ms);
        engine.set_frame_rate(self.frame_rate);
        engine.set_layout(self.layout);
        engine.set_tracks(tracks.into_iter().collect::<TrackList>());
        engine.set_items(items);
        engine.set_markers(self.markers.iter().map(|&t| Marker::new(t)).collect());
        engine.set_playhead(self.playhead_ms);
        Ok(engine)
    }

    /// Replay every step and report the outcome
    pub fn run(&self) -> Result<Report> {
        let mut engine = self.build_engine()?;
        let mut signals = Vec::new();

        for (idx, step) in self.steps.iter().enumerate() {
            tracing::debug!(step = idx, ?step, "replay");
            apply_step(&mut engine, step);
            signals.extend(engine.take_events().iter().map(|e| e.name().to_string()));
        }

        tracing::info!(steps = self.steps.len(), signals = signals.len(), "session replayed");
        Ok(Report {
            tracks: engine.tracks().to_vec(),
            items: engine.items().to_vec(),
            markers: engine.markers().to_vec(),
            selected: engine.selection().len(),
            playhead_ms: engine.playhead_ms(),
            history: engine.history().stats(),
            signals,
        })
    }
}

fn apply_step(engine: &mut TimelineEngine, step: &Step) {
    match step {
        Step::PointerDown(event) => engine.pointer_down(*event),
        Step::PointerMove(event) => engine.pointer_move(*event),
        Step::PointerUp(event) => engine.pointer_up(*event),
        Step::Wheel { dx, dy, modifiers } => engine.wheel(*dx, *dy, *modifiers),
        Step::Key(command) => engine.key_command(*command),
        Step::Seek(time_ms) => engine.seek(*time_ms),
        Step::Tool(tool) => engine.set_tool(*tool),
        Step::TemporaryTool(tool) => engine.set_temporary_tool(*tool),
        Step::SnapOverride(value) => engine.set_temporary_snap_override(*value),
        Step::Zoom { factor, pivot } => engine.zoom_horizontal(*factor, *pivot),
        Step::ZoomLanes(factor) => engine.zoom_vertical(*factor),
        Step::ReorderTrack { from, to } => engine.reorder_track(*from, *to),
        Step::Cancel => engine.cancel_gesture(),
    }
}
