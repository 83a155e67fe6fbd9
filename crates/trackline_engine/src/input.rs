// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logical input: pointer events, keyboard commands and tools.
//!
//! Hosts translate their own events into these types. Pointer coordinates
//! are relative to the content area, with the track label column and the
//! ruler already subtracted.

use serde::{Deserialize, Serialize};

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerButton {
    /// Primary (left) button
    #[default]
    Primary,
    /// Middle button, always pans
    Middle,
    /// Secondary (right) button
    Secondary,
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub command: bool,
    /// Alt / Option
    pub alt: bool,
}

impl Modifiers {
    /// Additive selection modifier
    pub fn additive(&self) -> bool {
        self.shift || self.command
    }
}

/// A pointer event in content-area coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Content-relative x in px
    pub x: f64,
    /// Content-relative y in px
    pub y: f64,
    /// Button involved
    #[serde(default)]
    pub button: PointerButton,
    /// Held modifiers
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary-button event without modifiers
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, ..Self::default() }
    }

    /// Same event with modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Same event with another button
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Position as a tuple
    pub fn pos(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Pointer tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Select, move and trim items
    #[default]
    Select,
    /// Cut items
    Splice,
    /// Scroll the view
    Pan,
}

/// Keyboard command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCommand {
    /// Undo the last edit
    Undo,
    /// Redo the last undone edit
    Redo,
    /// Copy selected items
    Copy,
    /// Copy then delete selected items
    Cut,
    /// Paste at the playhead
    Paste,
    /// Delete selected items
    Delete,
    /// Add or remove a marker at the playhead
    ToggleMarkerAtPlayhead,
    /// Flip the persistent snap toggle
    ToggleSnap,
    /// Select every item
    SelectAll,
    /// Splice the selection at the playhead
    SplitAtPlayhead,
}
