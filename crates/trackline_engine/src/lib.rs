// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless non-linear timeline editing engine.
//!
//! Items sit on parallel tracks and are edited by direct manipulation:
//! - Drag, resize and multi-item moves with snapping
//! - Splice (cut) along a swept line
//! - Copy, cut, paste and delete
//! - Box and additive selection
//! - Snapshot undo/redo
//!
//! ## Architecture
//!
//! The engine is built on:
//! - Pure time/pixel transforms and item geometry
//! - Lane assignment that keeps overlapping items apart
//! - A gesture state machine driven by logical pointer input
//! - An event queue as the only outbound channel
//!
//! Rendering, media and persistence belong to the host.

pub mod binding;
pub mod clipboard;
pub mod config;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod item;
pub mod lanes;
pub mod marker;
pub mod selection;
pub mod signal;
pub mod snap;
pub mod splice;
pub mod track;
pub mod transform;
pub mod viewport;

pub use binding::Binding;
pub use clipboard::{Clipboard, ClipboardError};
pub use config::{ConfigError, EngineConfig};
pub use drag::{DragLimits, DragMode, DragSession};
pub use engine::TimelineEngine;
pub use geometry::{ItemBox, Rect};
pub use gesture::{Gesture, PanSession};
pub use history::{History, HistoryEntry, HistoryError, HistoryStats};
pub use input::{KeyCommand, Modifiers, PointerButton, PointerEvent, Tool};
pub use item::{Bounds, Item, ItemId};
pub use lanes::{assign_sub_tracks, find_available_sub_track, reassign_track_sub_tracks};
pub use marker::{Marker, MarkerId};
pub use selection::{BoxSelection, ItemSet, SelectionModel};
pub use signal::{ChangePhase, EngineEvent};
pub use snap::{GuideKind, GuidePoint, SnapSettings, Snapper};
pub use splice::{split_item, SpliceSession};
pub use track::{Track, TrackId, TrackList};
pub use transform::{TimelineLayout, VisibleRange};
pub use viewport::{ViewWindow, Viewport};
