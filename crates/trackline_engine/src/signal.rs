// SPDX-License-Identifier: MIT OR Apache-2.0
//! Signals emitted by the engine.
//!
//! Events queue up inside the engine and are drained by the host with
//! [`crate::TimelineEngine::take_events`]. They are the only way state
//! leaves the engine.

use crate::input::Tool;
use crate::item::Item;
use crate::marker::Marker;
use crate::selection::ItemSet;
use crate::track::Track;
use serde::{Deserialize, Serialize};

/// Whether an item set is a live preview or a committed edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangePhase {
    /// In-flight gesture frame
    Preview,
    /// Final state after a gesture or command
    Commit,
}

/// Signal from the engine to its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Full replacement item set
    ItemsChanged {
        /// Every item
        items: Vec<Item>,
        /// Preview or commit
        phase: ChangePhase,
    },
    /// Track order or contents changed
    TracksChanged(Vec<Track>),
    /// Markers changed
    MarkersChanged(Vec<Marker>),
    /// Selection change request (or applied change when uncontrolled)
    SelectionChanged(ItemSet),
    /// Playhead moved
    TimeChanged(f64),
    /// Time shown while dragging an edge, cleared with `None`
    PreviewTimeChanged(Option<f64>),
    /// Persistent snap toggle changed
    SnapToggleChanged(bool),
    /// Per-gesture snap override changed
    TemporarySnapOverrideChanged(Option<bool>),
    /// Temporary tool changed
    TemporaryToolChanged(Option<Tool>),
}

impl EngineEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemsChanged { phase: ChangePhase::Preview, .. } => "items_preview",
            Self::ItemsChanged { phase: ChangePhase::Commit, .. } => "items_commit",
            Self::TracksChanged(_) => "tracks",
            Self::MarkersChanged(_) => "markers",
            Self::SelectionChanged(_) => "selection",
            Self::TimeChanged(_) => "time",
            Self::PreviewTimeChanged(_) => "preview_time",
            Self::SnapToggleChanged(_) => "snap_toggle",
            Self::TemporarySnapOverrideChanged(_) => "snap_override",
            Self::TemporaryToolChanged(_) => "temporary_tool",
        }
    }
}
