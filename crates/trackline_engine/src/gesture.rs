// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer gesture state machine.

use crate::drag::DragSession;
use crate::selection::BoxSelection;
use crate::splice::SpliceSession;
use crate::viewport::ViewWindow;

/// In-flight pan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSession {
    /// Press point
    pub origin: (f64, f64),
    /// Horizontal window on press
    pub horizontal: ViewWindow,
    /// Vertical window on press
    pub vertical: ViewWindow,
}

/// Current pointer gesture
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture
    #[default]
    Idle,
    /// Moving or trimming items
    Dragging(DragSession),
    /// Sweeping a cut line
    Splicing(SpliceSession),
    /// Rubber-band selection
    BoxSelecting(BoxSelection),
    /// Scrolling the view
    Panning(PanSession),
}

impl Gesture {
    /// Name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(_) => "dragging",
            Self::Splicing(_) => "splicing",
            Self::BoxSelecting(_) => "box_selecting",
            Self::Panning(_) => "panning",
        }
    }

    /// Whether no gesture is active
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
