// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline engine facade.
//!
//! [`TimelineEngine`] owns the item set, the gesture state machine, the
//! history and the viewport. Hosts feed it logical pointer and keyboard
//! input and drain the resulting [`EngineEvent`]s with
//! [`TimelineEngine::take_events`].
//!
//! The item set only changes at commit points: drag or splice release,
//! undo/redo, delete, cut and paste. Drag frames emit preview candidates
//! without touching the stored items.

use crate::binding::Binding;
use crate::clipboard::Clipboard;
use crate::config::EngineConfig;
use crate::drag::{DragLimits, DragMode, DragSession};
use crate::geometry::{hit_test, item_boxes, total_content_height, total_lanes, track_at_y, ItemBox};
use crate::gesture::{Gesture, PanSession};
use crate::history::History;
use crate::input::{KeyCommand, Modifiers, PointerButton, PointerEvent, Tool};
use crate::item::{Item, ItemId};
use crate::lanes::{find_available_sub_track, reassign_tracks};
use crate::marker::{toggle_marker_at, Marker, MarkerToggle};
use crate::selection::{BoxSelection, ItemSet, SelectionModel};
use crate::signal::{ChangePhase, EngineEvent};
use crate::snap::{collect_guide_points, snap_threshold_ms, SnapSettings, Snapper};
use crate::splice::{resolve_targets, splice_items, SpliceSession};
use crate::track::{TrackId, TrackList};
use crate::transform::{clamp, px_to_ms, snap_to_frame, TimelineLayout, VisibleRange};
use crate::viewport::Viewport;
use std::collections::BTreeSet;

/// Default timeline duration until the host sets one
const DEFAULT_DURATION_MS: f64 = 60_000.0;

/// Default frame rate
const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Debug trace gated by `EngineConfig::diagnostics`
macro_rules! diag {
    ($engine:expr, $($arg:tt)+) => {
        if $engine.config.diagnostics {
            tracing::debug!($($arg)+);
        }
    };
}

fn count_label(n: usize) -> String {
    if n == 1 {
        "1 item".to_string()
    } else {
        format!("{n} items")
    }
}

/// Headless timeline editing engine
pub struct TimelineEngine {
    config: EngineConfig,
    tracks: TrackList,
    items: Vec<Item>,
    markers: Vec<Marker>,
    duration_ms: f64,
    frame_rate: f64,
    playhead_ms: f64,
    layout: TimelineLayout,
    viewport: Viewport,
    selection: SelectionModel,
    snap: SnapSettings,
    tool: Tool,
    temporary_tool: Option<Tool>,
    gesture: Gesture,
    history: History,
    clipboard: Clipboard,
    pending_events: Vec<EngineEvent>,
}

impl TimelineEngine {
    /// Create an empty engine.
    ///
    /// An invalid config is logged and replaced by the defaults.
    pub fn new(config: EngineConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(%err, "invalid engine config, using defaults");
                EngineConfig::default()
            }
        };
        let viewport = Viewport::new(
            config.lane_height_px,
            config.min_lane_height_px,
            config.max_lane_height_px,
            config.min_window_size,
        );
        Self {
            history: History::with_cap(config.history_cap),
            config,
            tracks: TrackList::new(),
            items: Vec::new(),
            markers: Vec::new(),
            duration_ms: DEFAULT_DURATION_MS,
            frame_rate: DEFAULT_FRAME_RATE,
            playhead_ms: 0.0,
            layout: TimelineLayout::default(),
            viewport,
            selection: SelectionModel::default(),
            snap: SnapSettings::default(),
            tool: Tool::Select,
            temporary_tool: None,
            gesture: Gesture::Idle,
            clipboard: Clipboard::new(),
            pending_events: Vec::new(),
        }
    }

    /// Use a caller-chosen selection binding
    pub fn with_selection(mut self, binding: Binding<ItemSet>) -> Self {
        self.selection = SelectionModel::new(binding);
        self
    }

    /// Use a caller-chosen snap toggle binding
    pub fn with_snap(mut self, binding: Binding<bool>) -> Self {
        self.snap = SnapSettings::new(binding);
        self
    }

    // --- Host inputs -------------------------------------------------------

    /// Replace the track list
    pub fn set_tracks(&mut self, tracks: TrackList) {
        self.tracks = tracks;
        self.refit_vertical();
    }

    /// Replace the item set.
    ///
    /// Items without a lane are placed in the lowest free lane of their
    /// track. An in-flight drag keeps working against the new set.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        for idx in 0..self.items.len() {
            if self.items[idx].sub_track.is_none() {
                let item = &self.items[idx];
                let lane = find_available_sub_track(item, item.track_id, &self.items, self.config.max_sub_tracks);
                self.items[idx].sub_track = Some(lane);
            }
        }
        let change = self.selection.revalidate(&self.items);
        self.emit_selection(change);
        self.refit_vertical();
    }

    /// Replace the markers
    pub fn set_markers(&mut self, mut markers: Vec<Marker>) {
        markers.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        self.markers = markers;
    }

    /// Set the timeline duration
    pub fn set_duration(&mut self, duration_ms: f64) {
        if duration_ms.is_finite() && duration_ms > 0.0 {
            self.duration_ms = duration_ms;
        } else {
            tracing::warn!(duration_ms, "set_duration: invalid duration ignored");
        }
    }

    /// Set the frame rate; zero or less disables frame snapping
    pub fn set_frame_rate(&mut self, frame_rate: f64) {
        self.frame_rate = frame_rate;
    }

    /// Accept the host's playhead without emitting a signal
    pub fn set_playhead(&mut self, time_ms: f64) {
        self.playhead_ms = clamp(time_ms, 0.0, self.duration_ms);
    }

    /// Set the widget layout
    pub fn set_layout(&mut self, layout: TimelineLayout) {
        self.layout = layout;
        self.refit_vertical();
    }

    /// Accept the caller's selection (controlled mode)
    pub fn sync_selection(&mut self, selection: ItemSet) {
        self.selection.sync(selection);
    }

    /// Accept the caller's snap toggle (controlled mode)
    pub fn sync_snap_enabled(&mut self, enabled: bool) {
        self.snap.enabled.sync(enabled);
    }

    // --- Accessors ---------------------------------------------------------

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current item set
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Ordered tracks
    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    /// Markers, sorted by time
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Selection filtered to existing items
    pub fn selection(&self) -> ItemSet {
        self.selection.revalidated(&self.items)
    }

    /// Committed playhead
    pub fn playhead_ms(&self) -> f64 {
        self.playhead_ms
    }

    /// Timeline duration
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// View windows and lane height
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current gesture
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Clipboard
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Mutable clipboard, for JSON import
    pub fn clipboard_mut(&mut self) -> &mut Clipboard {
        &mut self.clipboard
    }

    /// Tool in effect: the temporary override, else the selected tool
    pub fn active_tool(&self) -> Tool {
        self.temporary_tool.unwrap_or(self.tool)
    }

    /// Whether snapping applies to the current gesture
    pub fn snap_enabled(&self) -> bool {
        self.snap.is_effective()
    }

    /// Drain pending signals
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // --- Geometry ----------------------------------------------------------

    /// Visible time span
    pub fn visible_range(&self) -> VisibleRange {
        VisibleRange::from_window(self.viewport.horizontal, self.duration_ms)
    }

    /// Current horizontal scale
    pub fn px_per_ms(&self) -> f64 {
        self.visible_range().px_per_ms(self.layout.content_width_px())
    }

    /// Height of all stacked lanes
    pub fn content_height_px(&self) -> f64 {
        total_content_height(&self.tracks, &self.items, self.viewport.lane_height_px)
    }

    /// Vertical scroll offset
    pub fn scroll_y_px(&self) -> f64 {
        self.viewport.scroll_y_px(self.content_height_px())
    }

    /// On-screen boxes of every item
    pub fn item_boxes(&self) -> Vec<ItemBox> {
        self.boxes_for(&self.items)
    }

    fn boxes_for(&self, items: &[Item]) -> Vec<ItemBox> {
        let visible = self.visible_range();
        item_boxes(
            &self.tracks,
            items,
            &visible,
            visible.px_per_ms(self.layout.content_width_px()),
            self.viewport.lane_height_px,
            self.scroll_y_px(),
        )
    }

    /// Time under a content-relative x
    pub fn time_at_x(&self, x: f64) -> f64 {
        self.visible_range().time_at_x(x, self.px_per_ms())
    }

    /// Content-relative x of a time
    pub fn x_at_time(&self, time_ms: f64) -> f64 {
        self.visible_range().x_at_time(time_ms, self.px_per_ms())
    }

    /// Track under a content-relative y
    pub fn track_at_y(&self, y: f64) -> Option<TrackId> {
        track_at_y(&self.tracks, &self.items, self.viewport.lane_height_px, y, self.scroll_y_px())
    }

    fn refit_vertical(&mut self) {
        let content = self.content_height_px();
        self.viewport.fit_vertical(content, self.layout.content_height_px());
    }

    fn limits(&self) -> DragLimits {
        DragLimits {
            duration_ms: self.duration_ms,
            min_duration_ms: self.config.min_item_duration_ms,
        }
    }

    fn snapper(&self, excluded: &BTreeSet<ItemId>) -> Snapper {
        if !self.snap.is_effective() {
            return Snapper::disabled();
        }
        let guides = collect_guide_points(self.playhead_ms, &self.markers, &self.items, excluded);
        let threshold = snap_threshold_ms(self.config.snap_radius_px, self.px_per_ms(), self.config.min_snap_threshold_ms);
        Snapper::new(guides, threshold, true)
    }

    // --- Signals -----------------------------------------------------------

    fn emit(&mut self, event: EngineEvent) {
        diag!(self, event = event.name(), "emit");
        self.pending_events.push(event);
    }

    fn emit_selection(&mut self, change: Option<ItemSet>) {
        if let Some(selection) = change {
            self.emit(EngineEvent::SelectionChanged(selection));
        }
    }

    /// Store a new item set and publish it.
    ///
    /// With a label, the previous set is recorded to history first.
    fn commit_items(&mut self, items: Vec<Item>, label: Option<String>) {
        if let Some(label) = label {
            self.history.record(&self.items, label);
        }
        self.items = items;
        let change = self.selection.revalidate(&self.items);
        self.emit_selection(change);
        self.emit(EngineEvent::ItemsChanged {
            items: self.items.clone(),
            phase: ChangePhase::Commit,
        });
        self.refit_vertical();
    }

    // --- Tools and toggles -------------------------------------------------

    /// Select the persistent tool
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Set or clear the transient tool override
    pub fn set_temporary_tool(&mut self, tool: Option<Tool>) {
        if self.temporary_tool != tool {
            self.temporary_tool = tool;
            self.emit(EngineEvent::TemporaryToolChanged(tool));
        }
    }

    /// Set or clear the per-gesture snap override
    pub fn set_temporary_snap_override(&mut self, value: Option<bool>) {
        if self.snap.temporary_override != value {
            self.snap.temporary_override = value;
            self.emit(EngineEvent::TemporarySnapOverrideChanged(value));
        }
    }

    /// Move the committed playhead
    pub fn seek(&mut self, time_ms: f64) {
        let time_ms = clamp(time_ms, 0.0, self.duration_ms);
        self.playhead_ms = time_ms;
        self.emit(EngineEvent::TimeChanged(time_ms));
    }

    /// Move a track to another position
    pub fn reorder_track(&mut self, from: usize, to: usize) {
        if self.tracks.reorder(from, to) {
            self.emit(EngineEvent::TracksChanged(self.tracks.to_vec()));
        } else {
            tracing::warn!(from, to, "reorder_track: index out of range");
        }
    }

    // --- Pointer input -----------------------------------------------------

    /// Pointer pressed
    pub fn pointer_down(&mut self, event: PointerEvent) {
        if !self.gesture.is_idle() {
            diag!(self, gesture = self.gesture.name(), "press during active gesture, resolving it first");
            self.cancel_gesture();
        }

        let tool = self.active_tool();
        if event.button == PointerButton::Middle || tool == Tool::Pan {
            self.gesture = Gesture::Panning(PanSession {
                origin: event.pos(),
                horizontal: self.viewport.horizontal,
                vertical: self.viewport.vertical,
            });
        } else if tool == Tool::Splice {
            let boxes = self.item_boxes();
            self.gesture = Gesture::Splicing(SpliceSession::new(event.pos(), &boxes));
        } else {
            self.press_select_tool(event);
        }

        diag!(self, gesture = self.gesture.name(), x = event.x, y = event.y, "pointer down");
    }

    fn press_select_tool(&mut self, event: PointerEvent) {
        let boxes = self.item_boxes();
        let additive = event.modifiers.additive();

        let Some(hit) = hit_test(&boxes, event.x, event.y).copied() else {
            let prior = self.selection.revalidated(&self.items);
            self.gesture = Gesture::BoxSelecting(BoxSelection::new(event.pos(), additive, prior));
            return;
        };

        let handle = self.config.resize_handle_px;
        let mode = if event.x - hit.rect.x0 <= handle {
            DragMode::ResizeStart
        } else if hit.rect.x1 - event.x <= handle {
            DragMode::ResizeEnd
        } else {
            DragMode::Move
        };

        if !self.selection.contains(hit.item_id) {
            let change = self.selection.select_item(hit.item_id, additive);
            self.emit_selection(change);
        }
        self.begin_drag(hit.item_id, mode, event);
    }

    /// Start a drag on a known item, for hosts that hit-test handles
    /// themselves. Returns `false` if the item does not exist.
    pub fn begin_drag(&mut self, item_id: ItemId, mode: DragMode, pointer: PointerEvent) -> bool {
        let selection = self.selection.revalidated(&self.items);
        match DragSession::begin(&self.items, item_id, mode, pointer.x, &selection) {
            Some(session) => {
                diag!(self, item = ?item_id, ?mode, followers = session.followers.len(), "drag start");
                self.gesture = Gesture::Dragging(session);
                true
            }
            None => {
                tracing::warn!(item = ?item_id, "begin_drag: unknown item");
                false
            }
        }
    }

    /// Pointer moved
    pub fn pointer_move(&mut self, event: PointerEvent) {
        let gesture = std::mem::take(&mut self.gesture);
        self.gesture = match gesture {
            Gesture::Idle => Gesture::Idle,
            Gesture::Dragging(mut session) => {
                session.last_x = event.x;
                self.preview_drag(&session);
                Gesture::Dragging(session)
            }
            Gesture::Splicing(mut session) => {
                let boxes = self.item_boxes();
                session.sweep(event.pos(), &boxes);
                Gesture::Splicing(session)
            }
            Gesture::BoxSelecting(mut selection) => {
                selection.current = event.pos();
                self.apply_box_selection(&selection);
                Gesture::BoxSelecting(selection)
            }
            Gesture::Panning(session) => {
                self.apply_pan(&session, event.pos());
                Gesture::Panning(session)
            }
        };
    }

    /// Pointer released
    pub fn pointer_up(&mut self, event: PointerEvent) {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => {
                diag!(self, "release without a gesture ignored");
            }
            Gesture::Dragging(mut session) => {
                session.last_x = event.x;
                self.finish_drag(session);
            }
            Gesture::Splicing(mut session) => {
                let boxes = self.item_boxes();
                session.sweep(event.pos(), &boxes);
                self.finish_splice(session);
            }
            Gesture::BoxSelecting(mut selection) => {
                selection.current = event.pos();
                self.apply_box_selection(&selection);
            }
            Gesture::Panning(session) => {
                self.apply_pan(&session, event.pos());
            }
        }
    }

    /// Resolve an abandoned gesture with the last known pointer position
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging(session) => self.finish_drag(session),
            Gesture::Splicing(session) => self.finish_splice(session),
            Gesture::Idle | Gesture::BoxSelecting(_) | Gesture::Panning(_) => {}
        }
    }

    /// Wheel input: zoom with the command modifier, otherwise scroll.
    ///
    /// Positive `delta_y` scrolls up and zooms in.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, modifiers: Modifiers) {
        if !(delta_x.is_finite() && delta_y.is_finite()) {
            tracing::warn!(delta_x, delta_y, "wheel: non-finite delta ignored");
            return;
        }
        let step = self.config.wheel_zoom_step;

        if modifiers.command && modifiers.alt {
            if delta_y != 0.0 {
                let factor = if delta_y > 0.0 { step } else { 1.0 / step };
                let lanes = total_lanes(&self.tracks, &self.items);
                self.viewport
                    .zoom_vertical(factor, lanes, self.layout.content_height_px());
            }
        } else if modifiers.command {
            if delta_y != 0.0 {
                let factor = if delta_y > 0.0 { 1.0 / step } else { step };
                self.viewport.zoom_horizontal_centered(factor);
            }
        } else if modifiers.shift {
            self.pan_by_px(-delta_y, 0.0);
        } else {
            self.pan_by_px(-delta_x, -delta_y);
        }
    }

    /// Scroll the view by pixels
    pub fn pan_by_px(&mut self, dx: f64, dy: f64) {
        let width = self.layout.content_width_px();
        if width > 0.0 && dx != 0.0 {
            let delta = dx / width * self.viewport.horizontal.size();
            self.viewport.pan_horizontal(delta);
        }
        let content = self.content_height_px();
        if content > 0.0 && dy != 0.0 {
            self.viewport.pan_vertical(dy / content);
        }
    }

    /// Zoom the time axis around a normalized pivot; `factor < 1` zooms in
    pub fn zoom_horizontal(&mut self, factor: f64, pivot: f64) {
        self.viewport.zoom_horizontal(factor, pivot);
    }

    /// Scale lane height and refit the vertical window
    pub fn zoom_vertical(&mut self, factor: f64) {
        let lanes = total_lanes(&self.tracks, &self.items);
        self.viewport
            .zoom_vertical(factor, lanes, self.layout.content_height_px());
    }

    fn apply_pan(&mut self, session: &PanSession, pos: (f64, f64)) {
        let dx = pos.0 - session.origin.0;
        let dy = pos.1 - session.origin.1;
        let width = self.layout.content_width_px();
        if width > 0.0 {
            self.viewport.horizontal = session.horizontal.pan(-dx / width * session.horizontal.size());
        }
        let content = self.content_height_px();
        if content > 0.0 {
            self.viewport.vertical = session.vertical.pan(-dy / content);
        }
    }

    fn apply_box_selection(&mut self, selection: &BoxSelection) {
        let boxes = self.item_boxes();
        let next = selection.compute(&boxes);
        let change = self.selection.request(next);
        self.emit_selection(change);
    }

    // --- Drag --------------------------------------------------------------

    fn drag_delta_ms(&self, session: &DragSession) -> f64 {
        px_to_ms(session.delta_px(), self.px_per_ms())
    }

    fn preview_drag(&mut self, session: &DragSession) {
        let delta_ms = self.drag_delta_ms(session);
        let snapper = self.snapper(&session.dragged_ids());
        let frame = session.frame(&self.items, delta_ms, &self.limits(), &snapper);

        self.emit(EngineEvent::ItemsChanged {
            items: frame.items,
            phase: ChangePhase::Preview,
        });
        let preview = match (session.mode, frame.primary) {
            (DragMode::ResizeStart, Some(bounds)) => Some(bounds.start_ms),
            (DragMode::ResizeEnd, Some(bounds)) => Some(bounds.end_ms),
            _ => None,
        };
        if preview.is_some() {
            self.emit(EngineEvent::PreviewTimeChanged(preview));
        }
    }

    fn finish_drag(&mut self, session: DragSession) {
        if session.delta_px() != 0.0 {
            let delta_ms = self.drag_delta_ms(&session);
            let snapper = self.snapper(&session.dragged_ids());
            let (items, touched) = session.commit(
                &self.items,
                delta_ms,
                &self.limits(),
                &snapper,
                self.frame_rate,
                self.config.max_sub_tracks,
            );

            if items != self.items {
                let label = format!("{} {}", session.mode.label(), count_label(session.dragged_ids().len()));
                diag!(self, %label, tracks = touched.len(), "drag commit");
                self.history.record(&session.snapshot, label);
                self.commit_items(items, None);
            }
        }

        self.set_temporary_snap_override(None);
        self.emit(EngineEvent::PreviewTimeChanged(None));
    }

    // --- Splice ------------------------------------------------------------

    fn finish_splice(&mut self, session: SpliceSession) {
        let boxes = self.item_boxes();
        let selection = self.selection.revalidated(&self.items);
        let targets = resolve_targets(&session.affected, &selection, &boxes, session.current);
        let cut_ms = snap_to_frame(self.time_at_x(session.current.0), self.frame_rate);
        self.splice(&targets.items, cut_ms, targets.from_selection);
    }

    fn splice(&mut self, targets: &BTreeSet<ItemId>, cut_ms: f64, from_selection: bool) {
        let outcome = splice_items(&self.items, targets, cut_ms, self.config.max_sub_tracks);
        if outcome.is_empty() {
            diag!(self, cut_ms, targets = targets.len(), "splice: nothing to cut");
            return;
        }

        let label = format!("Splice {}", count_label(outcome.split.len()));
        self.commit_items(outcome.items, Some(label));
        if from_selection {
            let change = self.selection.clear();
            self.emit_selection(change);
        }
    }

    // --- Keyboard ----------------------------------------------------------

    /// Apply a keyboard command
    pub fn key_command(&mut self, command: KeyCommand) {
        diag!(self, ?command, "key command");
        match command {
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::Copy => self.copy(),
            KeyCommand::Cut => self.cut(),
            KeyCommand::Paste => self.paste(),
            KeyCommand::Delete => self.delete_selection("Delete"),
            KeyCommand::ToggleMarkerAtPlayhead => self.toggle_marker_at_playhead(),
            KeyCommand::ToggleSnap => self.toggle_snap(),
            KeyCommand::SelectAll => {
                let change = self.selection.select_all(&self.items);
                self.emit_selection(change);
            }
            KeyCommand::SplitAtPlayhead => self.split_at_playhead(),
        }
    }

    /// Step back in history
    pub fn undo(&mut self) {
        if !self.gesture.is_idle() {
            diag!(self, gesture = self.gesture.name(), "undo ignored during gesture");
            return;
        }
        let restored = match self.history.undo(&self.items) {
            Ok(entry) => entry.items.clone(),
            Err(err) => {
                diag!(self, %err, "undo");
                return;
            }
        };
        self.restore(restored);
    }

    /// Step forward in history
    pub fn redo(&mut self) {
        if !self.gesture.is_idle() {
            diag!(self, gesture = self.gesture.name(), "redo ignored during gesture");
            return;
        }
        let restored = match self.history.redo() {
            Ok(entry) => entry.items.clone(),
            Err(err) => {
                diag!(self, %err, "redo");
                return;
            }
        };
        self.restore(restored);
    }

    fn restore(&mut self, items: Vec<Item>) {
        self.history.set_restoring(true);
        self.commit_items(items, None);
        self.history.set_restoring(false);
    }

    /// Copy the selection to the clipboard
    pub fn copy(&mut self) {
        let selection = self.selection.revalidated(&self.items);
        let copied = self.clipboard.copy(&self.items, &selection);
        diag!(self, copied, "copy");
    }

    /// Copy then delete the selection
    pub fn cut(&mut self) {
        self.copy();
        self.delete_selection("Cut");
    }

    /// Paste so the earliest copied start lands on the playhead
    pub fn paste(&mut self) {
        let pasted = self.clipboard.paste_at(self.playhead_ms, &self.tracks);
        if pasted.is_empty() {
            diag!(self, "paste: clipboard empty");
            return;
        }

        let selected: ItemSet = pasted.iter().map(|item| item.id).collect();
        let mut items = self.items.clone();
        for mut item in pasted {
            item.sub_track = Some(find_available_sub_track(&item, item.track_id, &items, self.config.max_sub_tracks));
            items.push(item);
        }

        let label = format!("Paste {}", count_label(selected.len()));
        self.commit_items(items, Some(label));
        let change = self.selection.request(selected);
        self.emit_selection(change);
    }

    fn delete_selection(&mut self, verb: &str) {
        let selection = self.selection.revalidated(&self.items);
        if selection.is_empty() {
            return;
        }

        let mut touched = BTreeSet::new();
        let mut items: Vec<Item> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if selection.contains(&item.id) {
                touched.insert(item.track_id);
            } else {
                items.push(item.clone());
            }
        }
        reassign_tracks(touched, &mut items, self.config.max_sub_tracks);

        let label = format!("{verb} {}", count_label(selection.len()));
        self.commit_items(items, Some(label));
        let change = self.selection.clear();
        self.emit_selection(change);
    }

    fn toggle_marker_at_playhead(&mut self) {
        let toggled = toggle_marker_at(&mut self.markers, self.playhead_ms, self.config.marker_tolerance_ms);
        match toggled {
            MarkerToggle::Added(id) => diag!(self, marker = ?id, "marker added"),
            MarkerToggle::Removed(id) => diag!(self, marker = ?id, "marker removed"),
        }
        self.emit(EngineEvent::MarkersChanged(self.markers.clone()));
    }

    fn toggle_snap(&mut self) {
        let next = !*self.snap.enabled.get();
        if let Some(value) = self.snap.enabled.request(next) {
            self.emit(EngineEvent::SnapToggleChanged(value));
        }
    }

    fn split_at_playhead(&mut self) {
        let selection = self.selection.revalidated(&self.items);
        if selection.is_empty() {
            diag!(self, "split at playhead: nothing selected");
            return;
        }
        let cut_ms = snap_to_frame(self.playhead_ms, self.frame_rate);
        self.splice(&selection, cut_ms, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Bounds;
    use crate::track::Track;
    use crate::viewport::ViewWindow;

    /// 1250 px of content over 2500 ms: 0.5 px/ms, 32 px lanes
    fn engine() -> (TimelineEngine, TrackId, TrackId) {
        let mut engine = TimelineEngine::new(EngineConfig::default());
        let mut tracks = TrackList::new();
        let a = tracks.add(Track::new("A"));
        let b = tracks.add(Track::new("B"));
        engine.set_tracks(tracks);
        engine.set_duration(2500.0);
        engine.set_frame_rate(50.0);
        engine.set_layout(TimelineLayout {
            width_px: 1450.0,
            height_px: 444.0,
            label_column_px: 200.0,
            ruler_px: 32.0,
            scrollbar_px: 12.0,
        });
        (engine, a, b)
    }

    fn last_commit(events: &[EngineEvent]) -> Option<&Vec<Item>> {
        events.iter().rev().find_map(|e| match e {
            EngineEvent::ItemsChanged { items, phase: ChangePhase::Commit } => Some(items),
            _ => None,
        })
    }

    #[test]
    fn test_scale() {
        let (engine, _, _) = engine();
        assert_eq!(engine.px_per_ms(), 0.5);
        assert_eq!(engine.time_at_x(500.0), 1000.0);
        assert_eq!(engine.x_at_time(1000.0), 500.0);
    }

    #[test]
    fn test_drag_clamps_to_duration() {
        let (mut engine, a, _) = engine();
        let item = Item::new(a, 0.0, 1000.0);
        let id = item.id;
        engine.set_items(vec![item]);

        engine.pointer_down(PointerEvent::at(250.0, 10.0));
        assert!(matches!(engine.gesture(), Gesture::Dragging(_)));
        engine.pointer_move(PointerEvent::at(1250.0, 10.0));

        let events = engine.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::ItemsChanged { phase: ChangePhase::Preview, .. })));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(0.0, 1000.0), "preview leaves items alone");

        engine.pointer_up(PointerEvent::at(1250.0, 10.0));
        let events = engine.take_events();
        let committed = last_commit(&events).unwrap();
        assert_eq!(committed[0].id, id);
        assert_eq!(committed[0].bounds(), Bounds::new(1500.0, 2500.0));
        assert!(events.contains(&EngineEvent::PreviewTimeChanged(None)));
        assert_eq!(engine.history().undo_description(), Some("Move 1 item"));
    }

    #[test]
    fn test_drag_commit_stays_inside_duration_off_frame_grid() {
        let (mut engine, a, _) = engine();
        // 25 fps: 40 ms frames, so 2500 ms is not a frame boundary
        engine.set_frame_rate(25.0);
        engine.key_command(KeyCommand::ToggleSnap);
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);

        engine.pointer_down(PointerEvent::at(250.0, 10.0));
        engine.pointer_up(PointerEvent::at(1250.0, 10.0));
        let moved = engine.items()[0].bounds();
        assert_eq!(moved, Bounds::new(1480.0, 2480.0));
        assert!(moved.end_ms <= engine.duration_ms());

        // Stretch the end past the timeline
        engine.pointer_down(PointerEvent::at(1238.0, 10.0));
        engine.pointer_up(PointerEvent::at(1400.0, 10.0));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(1480.0, 2480.0));

        engine.pointer_down(PointerEvent::at(750.0, 10.0));
        match engine.gesture() {
            Gesture::Dragging(session) => assert_eq!(session.mode, DragMode::Move),
            other => panic!("unexpected gesture {}", other.name()),
        }
        engine.pointer_up(PointerEvent::at(700.0, 10.0));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(1400.0, 2400.0));
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = EngineConfig {
            min_lane_height_px: 200.0,
            max_lane_height_px: 100.0,
            ..EngineConfig::default()
        };
        let engine = TimelineEngine::new(config);
        assert_eq!(engine.config(), &EngineConfig::default());
        assert_eq!(engine.viewport().lane_height_px, 32.0);
    }

    #[test]
    fn test_diagnostics_do_not_change_behaviour() {
        let run = |diagnostics: bool| {
            let (mut engine, a, _) = engine();
            engine.config.diagnostics = diagnostics;
            engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);
            engine.pointer_up(PointerEvent::at(10.0, 10.0));
            engine.key_command(KeyCommand::SelectAll);
            engine.key_command(KeyCommand::Copy);
            engine.seek(1200.0);
            engine.key_command(KeyCommand::Paste);
            engine.set_tool(Tool::Splice);
            engine.pointer_down(PointerEvent::at(800.0, 10.0));
            engine.pointer_up(PointerEvent::at(800.0, 10.0));
            let mut bounds: Vec<_> = engine.items().iter().map(Item::bounds).collect();
            bounds.sort_by(|x, y| x.start_ms.total_cmp(&y.start_ms));
            bounds
        };
        assert_eq!(run(true), run(false));
        assert_eq!(run(false).len(), 3);
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 10.0, 1000.0)]);
        engine.pointer_down(PointerEvent::at(250.0, 10.0));
        engine.pointer_up(PointerEvent::at(250.0, 10.0));
        assert!(!engine.history().can_undo());
        assert_eq!(engine.selection().len(), 1);
    }

    #[test]
    fn test_resize_end_emits_preview_time() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);

        // Right edge of the item sits at x = 500
        engine.pointer_down(PointerEvent::at(498.0, 10.0));
        match engine.gesture() {
            Gesture::Dragging(session) => assert_eq!(session.mode, DragMode::ResizeEnd),
            other => panic!("unexpected gesture {}", other.name()),
        }
        engine.pointer_move(PointerEvent::at(598.0, 10.0));
        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::PreviewTimeChanged(Some(1200.0))));

        engine.pointer_up(PointerEvent::at(598.0, 10.0));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(0.0, 1200.0));
        assert_eq!(engine.history().undo_description(), Some("Trim end 1 item"));
    }

    #[test]
    fn test_resize_start_emits_preview_time() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);

        engine.pointer_down(PointerEvent::at(2.0, 10.0));
        match engine.gesture() {
            Gesture::Dragging(session) => assert_eq!(session.mode, DragMode::ResizeStart),
            other => panic!("unexpected gesture {}", other.name()),
        }
        engine.pointer_move(PointerEvent::at(102.0, 10.0));
        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::PreviewTimeChanged(Some(200.0))));

        engine.pointer_up(PointerEvent::at(102.0, 10.0));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(200.0, 1000.0));
        assert_eq!(engine.history().undo_description(), Some("Trim start 1 item"));
        assert!(engine.take_events().contains(&EngineEvent::PreviewTimeChanged(None)));
    }

    #[test]
    fn test_multi_drag_moves_selection() {
        let (mut engine, a, b) = engine();
        let first = Item::new(a, 0.0, 400.0);
        let second = Item::new(b, 600.0, 1000.0);
        engine.set_items(vec![first.clone(), second.clone()]);
        engine.key_command(KeyCommand::SelectAll);

        engine.set_temporary_snap_override(Some(false));
        engine.pointer_down(PointerEvent::at(100.0, 10.0));
        engine.pointer_up(PointerEvent::at(200.0, 10.0));

        let items = engine.items();
        assert_eq!(items[0].bounds(), Bounds::new(200.0, 600.0));
        assert_eq!(items[1].bounds(), Bounds::new(800.0, 1200.0));
        assert!(engine.snap_enabled(), "override cleared on release");
        assert_eq!(engine.history().undo_description(), Some("Move 2 items"));
    }

    #[test]
    fn test_drag_survives_out_of_band_update() {
        let (mut engine, a, _) = engine();
        let dragged = Item::new(a, 0.0, 400.0);
        let id = dragged.id;
        engine.set_items(vec![dragged.clone()]);
        engine.pointer_down(PointerEvent::at(100.0, 10.0));

        let extra = Item::new(a, 2000.0, 2400.0);
        engine.set_items(vec![dragged, extra.clone()]);
        engine.set_temporary_snap_override(Some(false));
        engine.pointer_up(PointerEvent::at(300.0, 10.0));

        let items = engine.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items.iter().find(|i| i.id == id).unwrap().bounds(), Bounds::new(400.0, 800.0));
        assert!(items.iter().any(|i| i.id == extra.id));
    }

    #[test]
    fn test_orphan_release_is_noop() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 400.0)]);
        engine.pointer_up(PointerEvent::at(100.0, 10.0));
        assert!(engine.take_events().is_empty());
        assert!(!engine.history().can_undo());
    }

    #[test]
    fn test_cancel_commits_last_position() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 400.0)]);
        engine.set_temporary_snap_override(Some(false));
        engine.pointer_down(PointerEvent::at(100.0, 10.0));
        engine.pointer_move(PointerEvent::at(200.0, 10.0));
        engine.cancel_gesture();

        assert!(engine.gesture().is_idle());
        assert_eq!(engine.items()[0].bounds(), Bounds::new(200.0, 600.0));
    }

    #[test]
    fn test_paste_offsets_to_playhead() {
        let (mut engine, a, _) = engine();
        engine.set_duration(20_000.0);
        let original = Item::new(a, 500.0, 900.0);
        engine.set_items(vec![original.clone(), Item::new(a, 1500.0, 1700.0)]);
        engine.key_command(KeyCommand::SelectAll);
        engine.key_command(KeyCommand::Copy);
        engine.seek(10_000.0);
        engine.take_events();

        engine.key_command(KeyCommand::Paste);
        let items = engine.items();
        assert_eq!(items.len(), 4);
        assert_eq!(items[2].bounds(), Bounds::new(10_000.0, 10_400.0));
        assert_eq!(items[3].bounds(), Bounds::new(11_000.0, 11_200.0));
        assert_ne!(items[2].id, original.id);

        let selection = engine.selection();
        assert!(selection.contains(&items[2].id) && selection.contains(&items[3].id));
        assert_eq!(selection.len(), 2);
        assert_eq!(engine.history().undo_description(), Some("Paste 2 items"));
    }

    #[test]
    fn test_n_mutations_then_n_undos() {
        let (mut engine, a, _) = engine();
        let initial = vec![Item::new(a, 0.0, 400.0), Item::new(a, 1000.0, 1400.0)];
        engine.set_items(initial.clone());
        let initial = engine.items().to_vec();

        engine.key_command(KeyCommand::SelectAll);
        engine.key_command(KeyCommand::Copy);
        engine.seek(1800.0);
        engine.key_command(KeyCommand::Paste);
        engine.key_command(KeyCommand::Delete);
        assert_eq!(engine.items().len(), 2);
        engine.key_command(KeyCommand::Undo);
        engine.key_command(KeyCommand::Undo);
        assert_eq!(engine.items(), initial.as_slice());

        engine.key_command(KeyCommand::Undo);
        assert_eq!(engine.items(), initial.as_slice(), "extra undo is ignored");

        engine.key_command(KeyCommand::Redo);
        assert_eq!(engine.items().len(), 4);
    }

    #[test]
    fn test_undo_then_mutate_clears_redo() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 400.0)]);
        engine.key_command(KeyCommand::SelectAll);
        engine.key_command(KeyCommand::Delete);
        engine.key_command(KeyCommand::Undo);
        assert!(engine.history().can_redo());

        engine.key_command(KeyCommand::SelectAll);
        engine.key_command(KeyCommand::Cut);
        assert!(!engine.history().can_redo());
        assert!(engine.items().is_empty());
        assert_eq!(engine.clipboard().items().len(), 1);
    }

    #[test]
    fn test_splice_at_400() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);
        engine.set_tool(Tool::Splice);

        engine.pointer_down(PointerEvent::at(200.0, 10.0));
        engine.pointer_up(PointerEvent::at(200.0, 10.0));

        let mut bounds: Vec<_> = engine.items().iter().map(Item::bounds).collect();
        bounds.sort_by(|x, y| x.start_ms.total_cmp(&y.start_ms));
        assert_eq!(bounds, vec![Bounds::new(0.0, 400.0), Bounds::new(400.0, 1000.0)]);
        assert_eq!(engine.history().undo_description(), Some("Splice 1 item"));
    }

    #[test]
    fn test_cancel_during_splice_cuts_at_last_position() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);
        engine.set_tool(Tool::Splice);

        engine.pointer_down(PointerEvent::at(200.0, 5.0));
        engine.pointer_move(PointerEvent::at(200.0, 20.0));
        assert!(matches!(engine.gesture(), Gesture::Splicing(_)));
        engine.cancel_gesture();

        assert!(engine.gesture().is_idle());
        let mut bounds: Vec<_> = engine.items().iter().map(Item::bounds).collect();
        bounds.sort_by(|x, y| x.start_ms.total_cmp(&y.start_ms));
        assert_eq!(bounds, vec![Bounds::new(0.0, 400.0), Bounds::new(400.0, 1000.0)]);
        assert_eq!(engine.history().undo_description(), Some("Splice 1 item"));
    }

    #[test]
    fn test_splice_outside_items_changes_nothing() {
        let (mut engine, a, _) = engine();
        let items = vec![Item::new(a, 0.0, 1000.0)];
        engine.set_items(items);
        let before = engine.items().to_vec();
        engine.set_tool(Tool::Splice);
        engine.take_events();

        engine.pointer_down(PointerEvent::at(750.0, 10.0));
        engine.pointer_up(PointerEvent::at(750.0, 10.0));

        assert_eq!(engine.items(), before.as_slice());
        assert!(!engine.history().can_undo());
        assert!(last_commit(&engine.take_events()).is_none());
    }

    #[test]
    fn test_splice_sweep_across_tracks() {
        let (mut engine, a, b) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0), Item::new(b, 0.0, 1000.0)]);
        engine.set_temporary_tool(Some(Tool::Splice));

        engine.pointer_down(PointerEvent::at(300.0, 5.0));
        engine.pointer_move(PointerEvent::at(300.0, 50.0));
        engine.pointer_up(PointerEvent::at(300.0, 50.0));

        assert_eq!(engine.items().len(), 4);
        assert!(engine.items().iter().all(|i| i.start_ms == 600.0 || i.end_ms == 600.0));
    }

    #[test]
    fn test_split_at_playhead_clears_selection() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);
        engine.key_command(KeyCommand::SelectAll);
        engine.seek(500.0);
        engine.key_command(KeyCommand::SplitAtPlayhead);

        assert_eq!(engine.items().len(), 2);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_box_selection() {
        let (mut engine, a, b) = engine();
        let first = Item::new(a, 0.0, 400.0);
        let second = Item::new(b, 0.0, 400.0);
        let third = Item::new(a, 2000.0, 2400.0);
        engine.set_items(vec![first.clone(), second.clone(), third.clone()]);

        engine.pointer_down(PointerEvent::at(300.0, 60.0));
        engine.pointer_move(PointerEvent::at(150.0, 5.0));
        engine.pointer_up(PointerEvent::at(150.0, 5.0));

        let selection = engine.selection();
        assert!(selection.contains(&first.id));
        assert!(selection.contains(&second.id));
        assert!(!selection.contains(&third.id));

        let additive = Modifiers { shift: true, ..Modifiers::default() };
        engine.pointer_down(PointerEvent::at(1230.0, 20.0).with_modifiers(additive));
        assert!(matches!(engine.gesture(), Gesture::BoxSelecting(_)));
        engine.pointer_up(PointerEvent::at(1100.0, 10.0).with_modifiers(additive));
        assert_eq!(engine.selection().len(), 3);
    }

    #[test]
    fn test_controlled_selection_only_reports() {
        let (engine, a, _) = engine();
        let mut engine = engine.with_selection(Binding::controlled(ItemSet::new()));
        let item = Item::new(a, 0.0, 400.0);
        engine.set_items(vec![item.clone()]);

        engine.key_command(KeyCommand::SelectAll);
        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::SelectionChanged([item.id].into_iter().collect())));
        assert!(engine.selection().is_empty());

        engine.sync_selection([item.id].into_iter().collect());
        assert_eq!(engine.selection().len(), 1);
    }

    #[test]
    fn test_toggle_snap_and_marker() {
        let (mut engine, _, _) = engine();
        engine.key_command(KeyCommand::ToggleSnap);
        assert!(!engine.snap_enabled());

        engine.seek(1000.0);
        engine.key_command(KeyCommand::ToggleMarkerAtPlayhead);
        assert_eq!(engine.markers().len(), 1);
        engine.key_command(KeyCommand::ToggleMarkerAtPlayhead);
        assert!(engine.markers().is_empty());

        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::SnapToggleChanged(false)));
        assert!(events.contains(&EngineEvent::TimeChanged(1000.0)));
        assert_eq!(events.iter().filter(|e| matches!(e, EngineEvent::MarkersChanged(_))).count(), 2);
    }

    #[test]
    fn test_drag_snaps_to_marker() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 400.0)]);
        engine.set_markers(vec![Marker::new(1000.0)]);

        // 0.5 px/ms: snap radius 10 px = 20 ms, floored to 50 ms
        engine.pointer_down(PointerEvent::at(100.0, 10.0));
        engine.pointer_up(PointerEvent::at(585.0, 10.0));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(1000.0, 1400.0));
    }

    #[test]
    fn test_wheel_zoom_and_pan() {
        let (mut engine, _, _) = engine();
        let command = Modifiers { command: true, ..Modifiers::default() };
        engine.wheel(0.0, 1.0, command);
        let window = engine.viewport().horizontal;
        assert!((window.size() - 1.0 / 1.2).abs() < 1e-9);
        assert!((window.center() - 0.5).abs() < 1e-9);

        let before = engine.viewport().horizontal;
        engine.wheel(0.0, -100.0, Modifiers { shift: true, ..Modifiers::default() });
        assert!(engine.viewport().horizontal.start > before.start);

        engine.zoom_horizontal(100.0, 0.5);
        assert_eq!(engine.viewport().horizontal, ViewWindow::FULL);
    }

    #[test]
    fn test_middle_button_pans_view() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);
        engine.zoom_horizontal(0.5, 0.5);
        let before = engine.viewport().horizontal;
        assert!((before.start - 0.25).abs() < 1e-9);
        engine.take_events();

        let middle = |x| PointerEvent::at(x, 10.0).with_button(PointerButton::Middle);
        engine.pointer_down(middle(300.0));
        assert!(matches!(engine.gesture(), Gesture::Panning(_)));

        // 125 px left over 1250 px showing half the timeline
        engine.pointer_move(middle(175.0));
        assert!((engine.viewport().horizontal.start - 0.3).abs() < 1e-9);
        engine.pointer_up(middle(175.0));

        assert!(engine.gesture().is_idle());
        assert!((engine.viewport().horizontal.size() - 0.5).abs() < 1e-9);
        assert_eq!(engine.items()[0].bounds(), Bounds::new(0.0, 1000.0));
        assert!(engine.take_events().is_empty());
        assert!(!engine.history().can_undo());
    }

    #[test]
    fn test_temporary_pan_tool_routes_press_to_pan() {
        let (mut engine, a, _) = engine();
        engine.set_items(vec![Item::new(a, 0.0, 1000.0)]);
        engine.take_events();

        engine.set_temporary_tool(Some(Tool::Pan));
        engine.set_temporary_tool(Some(Tool::Pan));
        assert_eq!(engine.take_events(), vec![EngineEvent::TemporaryToolChanged(Some(Tool::Pan))]);
        assert_eq!(engine.active_tool(), Tool::Pan);

        // Press lands on the item but pans instead of dragging
        engine.pointer_down(PointerEvent::at(250.0, 10.0));
        assert!(matches!(engine.gesture(), Gesture::Panning(_)));
        engine.pointer_move(PointerEvent::at(400.0, 10.0));
        engine.pointer_up(PointerEvent::at(400.0, 10.0));
        assert_eq!(engine.items()[0].bounds(), Bounds::new(0.0, 1000.0));
        assert!(engine.selection().is_empty());

        engine.set_temporary_tool(None);
        assert_eq!(engine.take_events(), vec![EngineEvent::TemporaryToolChanged(None)]);
        assert_eq!(engine.active_tool(), Tool::Select);
    }

    #[test]
    fn test_command_alt_wheel_zooms_lanes() {
        let (mut engine, a, _) = engine();
        let items: Vec<_> = (0..20).map(|i| Item::new(a, i as f64, 2000.0)).collect();
        engine.set_items(items);
        let command_alt = Modifiers { command: true, alt: true, ..Modifiers::default() };

        engine.wheel(0.0, 1.0, command_alt);
        assert!((engine.viewport().lane_height_px - 38.4).abs() < 1e-9);
        let content = engine.content_height_px();
        assert!((content - 21.0 * 38.4).abs() < 1e-6);
        assert!((engine.viewport().vertical.size() - 400.0 / content).abs() < 1e-9);
        assert_eq!(engine.viewport().horizontal, ViewWindow::FULL);

        engine.wheel(0.0, -1.0, command_alt);
        assert!((engine.viewport().lane_height_px - 32.0).abs() < 1e-9);
        assert!((engine.viewport().vertical.size() - 400.0 / 672.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_fit_tracks_content() {
        let (mut engine, a, _) = engine();
        assert_eq!(engine.viewport().vertical, ViewWindow::FULL);

        // 20 overlapping items on track A fill 20 lanes; track B keeps one
        let items: Vec<_> = (0..20).map(|i| Item::new(a, i as f64, 2000.0)).collect();
        engine.set_items(items);
        let content = engine.content_height_px();
        assert_eq!(content, 21.0 * 32.0);
        let size = engine.viewport().vertical.size();
        assert!((size - 400.0 / content).abs() < 1e-9);
    }

    #[test]
    fn test_reorder_tracks_emits() {
        let (mut engine, a, b) = engine();
        engine.reorder_track(1, 0);
        let events = engine.take_events();
        match events.as_slice() {
            [EngineEvent::TracksChanged(tracks)] => {
                assert_eq!(tracks[0].id, b);
                assert_eq!(tracks[1].id, a);
            }
            other => panic!("unexpected events {other:?}"),
        }
    }
}
