#![forbid(unsafe_code)]

//! Drag/resize interaction core.
//!
//! [`InteractionController`] turns pointer streams into layer position and
//! size updates and grid track resizes. It owns the transient
//! [`LayerState`] of every layer it has moved, keyed by layer id.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Dragging      -> Idle
//! Idle -> Resizing      -> Idle
//! Idle -> ResizingTrack -> Idle
//! ```
//!
//! The three active states are mutually exclusive and each owns exactly one
//! pointer id.
//!
//! # Invariants
//!
//! 1. Document listeners are attached on every session start and detached on
//!    every terminal transition, including `Drop`.
//! 2. Resized widths/heights are clamped before the compensating position is
//!    computed, so the anchored edge never moves.
//! 3. Callbacks fire only when a value differs from the previous frame.
//!
//! # Failure Modes
//!
//! - Pointer capture errors are logged and ignored; document listeners keep
//!   the session alive.
//! - A session whose layer or track disappeared is abandoned on the next
//!   pointer event, without callbacks.
//! - A pointer-down while a session is active is ignored.

use std::fmt;

use rustc_hash::FxHashMap;
use trellis_core::event::{KeyEvent, PointerButton, PointerEvent, PointerEventKind};
use trellis_core::geometry::{Point, Rect, Size, Vector};

use crate::grid::{GridLayout, HandleAlign, TrackAxis, TrackHandle};
use crate::layer::{LayerConstraints, LayerDefinition, LayerId, LayerState};
use crate::registry::ElementHandle;

/// Default inset (px) from a layer edge that counts as a resize grip.
pub const DEFAULT_EDGE_GRIP_INSET: f64 = 6.0;

// ---------------------------------------------------------------------------
// Host seams
// ---------------------------------------------------------------------------

/// Change notifications, each fired once per changed value.
pub trait LayerCallbacks {
    fn on_position_change(&mut self, _id: &LayerId, _position: Point) {}
    fn on_size_change(&mut self, _id: &LayerId, _size: Size) {}
    fn on_track_resize(&mut self, _axis: TrackAxis, _index: usize, _size: f64) {}
}

impl LayerCallbacks for () {}

/// Pointer capture failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The host has no capture primitive.
    Unsupported,
    /// The element is gone or not capturable.
    InvalidElement { element: ElementHandle },
    /// The pointer is no longer active.
    InactivePointer { pointer_id: u32 },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("pointer capture is not supported"),
            Self::InvalidElement { element } => {
                write!(f, "element {} cannot capture the pointer", element.0)
            }
            Self::InactivePointer { pointer_id } => {
                write!(f, "pointer {pointer_id} is not active")
            }
        }
    }
}

impl std::error::Error for CaptureError {}

/// Opportunistic pointer capture.
pub trait PointerCapture {
    fn set_capture(&mut self, element: ElementHandle, pointer_id: u32) -> Result<(), CaptureError>;
    fn release_capture(&mut self, element: ElementHandle, pointer_id: u32) -> Result<(), CaptureError>;
}

/// A host without pointer capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn set_capture(&mut self, _: ElementHandle, _: u32) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn release_capture(&mut self, _: ElementHandle, _: u32) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }
}

/// Document-level move/up listeners, active for the lifetime of a session.
pub trait DocumentListeners {
    fn attach(&mut self, pointer_id: u32);
    fn detach(&mut self, pointer_id: u32);
}

impl DocumentListeners for () {
    fn attach(&mut self, _: u32) {}
    fn detach(&mut self, _: u32) {}
}

// ---------------------------------------------------------------------------
// Resize edges
// ---------------------------------------------------------------------------

/// Grabbed edge or corner of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    /// Horizontal side being moved, if any.
    #[must_use]
    pub const fn horizontal_edge(self) -> Option<HandleAlign> {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Some(HandleAlign::Start),
            Self::Right | Self::TopRight | Self::BottomRight => Some(HandleAlign::End),
            Self::Top | Self::Bottom => None,
        }
    }

    /// Vertical side being moved, if any.
    #[must_use]
    pub const fn vertical_edge(self) -> Option<HandleAlign> {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Some(HandleAlign::Start),
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Some(HandleAlign::End),
            Self::Left | Self::Right => None,
        }
    }
}

/// Classify a point against the edges and corners of `rect`.
#[must_use]
pub fn classify_resize_edge(rect: Rect, point: Point, inset: f64) -> Option<ResizeEdge> {
    let inset = inset.max(0.5);
    if point.x < rect.x - inset
        || point.x > rect.right() + inset
        || point.y < rect.y - inset
        || point.y > rect.bottom() + inset
    {
        return None;
    }
    let near_left = (point.x - rect.x).abs() <= inset;
    let near_right = (point.x - rect.right()).abs() <= inset;
    let near_top = (point.y - rect.y).abs() <= inset;
    let near_bottom = (point.y - rect.bottom()).abs() <= inset;

    match (near_left, near_right, near_top, near_bottom) {
        (true, false, true, false) => Some(ResizeEdge::TopLeft),
        (false, true, true, false) => Some(ResizeEdge::TopRight),
        (true, false, false, true) => Some(ResizeEdge::BottomLeft),
        (false, true, false, true) => Some(ResizeEdge::BottomRight),
        (true, false, false, false) => Some(ResizeEdge::Left),
        (false, true, false, false) => Some(ResizeEdge::Right),
        (false, false, true, false) => Some(ResizeEdge::Top),
        (false, false, false, true) => Some(ResizeEdge::Bottom),
        _ => None,
    }
}

/// Apply a pointer delta to `start` by dragging `edge`.
///
/// Sizes are clamped first; a moved leading edge then shifts the origin by
/// exactly the clamped size change so the opposite edge stays put.
#[must_use]
pub fn resize_rect(start: Rect, edge: ResizeEdge, delta: Vector, constraints: &LayerConstraints) -> Rect {
    let mut rect = start;
    match edge.horizontal_edge() {
        Some(HandleAlign::Start) => {
            let width = constraints.clamp_width(start.width - delta.x);
            rect.x = start.x + (start.width - width);
            rect.width = width;
        }
        Some(HandleAlign::End) => rect.width = constraints.clamp_width(start.width + delta.x),
        None => {}
    }
    match edge.vertical_edge() {
        Some(HandleAlign::Start) => {
            let height = constraints.clamp_height(start.height - delta.y);
            rect.y = start.y + (start.height - height);
            rect.height = height;
        }
        Some(HandleAlign::End) => rect.height = constraints.clamp_height(start.height + delta.y),
        None => {}
    }
    rect
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Active layer drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub layer: LayerId,
    pub pointer_id: u32,
    pub element: Option<ElementHandle>,
    pub start_pointer: Point,
    pub start_position: Point,
    pub last_position: Point,
}

/// Active layer edge/corner resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub layer: LayerId,
    pub edge: ResizeEdge,
    pub pointer_id: u32,
    pub element: Option<ElementHandle>,
    pub start_pointer: Point,
    pub start_rect: Rect,
    pub last_rect: Rect,
}

/// Active grid track resize.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackResizeSession {
    pub handle: TrackHandle,
    pub pointer_id: u32,
    pub element: Option<ElementHandle>,
    pub start_pointer: Point,
    pub start_size: f64,
    pub last_size: f64,
}

/// Current interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
    ResizingTrack(TrackResizeSession),
}

impl InteractionState {
    #[must_use]
    pub fn pointer_id(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Dragging(s) => Some(s.pointer_id),
            Self::Resizing(s) => Some(s.pointer_id),
            Self::ResizingTrack(s) => Some(s.pointer_id),
        }
    }

    fn element(&self) -> Option<ElementHandle> {
        match self {
            Self::Idle => None,
            Self::Dragging(s) => s.element,
            Self::Resizing(s) => s.element,
            Self::ResizingTrack(s) => s.element,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(_) => "drag",
            Self::Resizing(_) => "resize",
            Self::ResizingTrack(_) => "track_resize",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Pointer released; the last values stand.
    Committed,
    /// Pointer canceled by the platform; the last values stand.
    Canceled,
    /// Escape or programmatic cancel; pre-gesture values restored.
    Reverted,
    /// The target vanished.
    Abandoned,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Single-owner drag/resize state machine.
#[derive(Debug)]
pub struct InteractionController<C: PointerCapture, D: DocumentListeners> {
    state: InteractionState,
    layers: FxHashMap<LayerId, LayerState>,
    capture: C,
    listeners: D,
}

impl<C: PointerCapture, D: DocumentListeners> InteractionController<C, D> {
    #[must_use]
    pub fn new(capture: C, listeners: D) -> Self {
        Self {
            state: InteractionState::Idle,
            layers: FxHashMap::default(),
            capture,
            listeners,
        }
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    #[must_use]
    pub fn capture(&self) -> &C {
        &self.capture
    }

    #[must_use]
    pub fn listeners(&self) -> &D {
        &self.listeners
    }

    /// Transient state of a layer, if it was ever moved or resized.
    #[must_use]
    pub fn layer_state(&self, id: &LayerId) -> Option<&LayerState> {
        self.layers.get(id)
    }

    /// Current rect of `layer`: its declared rect with overrides applied.
    #[must_use]
    pub fn layer_rect(&self, layer: &LayerDefinition) -> Rect {
        let declared = layer.declared_rect();
        self.layers
            .get(&layer.id)
            .map_or(declared, |state| state.apply(declared))
    }

    /// Drop transient state of layers no longer defined.
    pub fn retain_layers(&mut self, layers: &[LayerDefinition]) {
        self.layers
            .retain(|id, _| layers.iter().any(|layer| &layer.id == id));
    }

    /// Try to start dragging `layer`. Returns whether a session started.
    pub fn begin_drag(
        &mut self,
        layer: &LayerDefinition,
        event: &PointerEvent,
        element: Option<ElementHandle>,
    ) -> bool {
        if !self.accepts_down(event) {
            return false;
        }
        if !(layer.draggable || layer.floating.is_some()) {
            return self.reject(&layer.id, "not draggable");
        }
        if !event.target.accepts_drag() {
            return self.reject(&layer.id, "target is a control");
        }
        let rect = self.layer_rect(layer);
        if let Some(handle) = layer.floating.and_then(|f| f.drag_handle) {
            let region = Rect::new(rect.x + handle.x, rect.y + handle.y, handle.width, handle.height);
            if !region.contains(event.position) {
                return self.reject(&layer.id, "outside drag handle");
            }
        }

        self.start(event.pointer_id, element);
        tracing::debug!(
            message = "interaction.drag_start",
            layer = %layer.id,
            pointer_id = event.pointer_id,
            x = rect.x,
            y = rect.y
        );
        self.state = InteractionState::Dragging(DragSession {
            layer: layer.id.clone(),
            pointer_id: event.pointer_id,
            element,
            start_pointer: event.position,
            start_position: rect.origin(),
            last_position: rect.origin(),
        });
        true
    }

    /// Try to start resizing `layer` from `edge`.
    pub fn begin_resize(
        &mut self,
        layer: &LayerDefinition,
        edge: ResizeEdge,
        event: &PointerEvent,
        element: Option<ElementHandle>,
    ) -> bool {
        if !self.accepts_down(event) {
            return false;
        }
        if !layer.resizable {
            return self.reject(&layer.id, "not resizable");
        }
        let rect = self.layer_rect(layer);
        self.start(event.pointer_id, element);
        tracing::debug!(
            message = "interaction.resize_start",
            layer = %layer.id,
            ?edge,
            pointer_id = event.pointer_id,
            width = rect.width,
            height = rect.height
        );
        self.state = InteractionState::Resizing(ResizeSession {
            layer: layer.id.clone(),
            edge,
            pointer_id: event.pointer_id,
            element,
            start_pointer: event.position,
            start_rect: rect,
            last_rect: rect,
        });
        true
    }

    /// Try to start resizing a grid track from `handle`.
    pub fn begin_track_resize(
        &mut self,
        grid: &GridLayout,
        handle: TrackHandle,
        event: &PointerEvent,
        element: Option<ElementHandle>,
    ) -> bool {
        if !self.accepts_down(event) {
            return false;
        }
        let resizable = grid
            .tracks(handle.axis)
            .get(handle.track)
            .is_some_and(|track| track.resizable);
        let Some(start_size) = grid
            .track_pixel_size(handle.axis, handle.track)
            .filter(|_| resizable)
        else {
            tracing::debug!(
                message = "interaction.rejected",
                axis = %handle.axis,
                track = handle.track,
                reason = "track not resizable"
            );
            return false;
        };
        self.start(event.pointer_id, element);
        tracing::debug!(
            message = "interaction.track_resize_start",
            axis = %handle.axis,
            track = handle.track,
            start_size
        );
        self.state = InteractionState::ResizingTrack(TrackResizeSession {
            handle,
            pointer_id: event.pointer_id,
            element,
            start_pointer: event.position,
            start_size,
            last_size: start_size,
        });
        true
    }

    /// Feed a document-level pointer event. Returns an outcome when the
    /// session ends.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        layers: &[LayerDefinition],
        grid: &mut GridLayout,
        callbacks: &mut dyn LayerCallbacks,
    ) -> Option<InteractionOutcome> {
        if self.state.pointer_id() != Some(event.pointer_id) {
            return None;
        }
        if event.kind == PointerEventKind::Down {
            return None;
        }
        if !self.target_exists(layers, grid) {
            tracing::debug!(
                message = "interaction.abandon",
                session = self.state.label(),
                reason = "target vanished"
            );
            self.finish();
            return Some(InteractionOutcome::Abandoned);
        }

        if matches!(event.kind, PointerEventKind::Move | PointerEventKind::Up) {
            self.apply_pointer(event.position, layers, grid, callbacks);
        }
        match event.kind {
            PointerEventKind::Up => {
                tracing::debug!(message = "interaction.commit", session = self.state.label());
                self.finish();
                Some(InteractionOutcome::Committed)
            }
            PointerEventKind::Cancel => {
                tracing::debug!(message = "interaction.cancel", session = self.state.label(), reason = "pointer canceled");
                self.finish();
                Some(InteractionOutcome::Canceled)
            }
            PointerEventKind::Move | PointerEventKind::Down => None,
        }
    }

    /// `Escape` reverts the active session. Returns whether it was consumed.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        grid: &mut GridLayout,
        callbacks: &mut dyn LayerCallbacks,
    ) -> bool {
        if !key.is_escape() || !self.is_active() {
            return false;
        }
        self.cancel(grid, callbacks);
        true
    }

    /// Revert the active session to its pre-gesture values.
    pub fn cancel(&mut self, grid: &mut GridLayout, callbacks: &mut dyn LayerCallbacks) -> Option<InteractionOutcome> {
        match &self.state {
            InteractionState::Idle => return None,
            InteractionState::Dragging(session) => {
                if session.last_position != session.start_position {
                    let (id, position) = (session.layer.clone(), session.start_position);
                    self.layers.entry(id.clone()).or_default().position = Some(position);
                    callbacks.on_position_change(&id, position);
                }
            }
            InteractionState::Resizing(session) => {
                let (id, start, last) = (session.layer.clone(), session.start_rect, session.last_rect);
                let state = self.layers.entry(id.clone()).or_default();
                state.position = Some(start.origin());
                state.size = Some(start.size());
                if last.size() != start.size() {
                    callbacks.on_size_change(&id, start.size());
                }
                if last.origin() != start.origin() {
                    callbacks.on_position_change(&id, start.origin());
                }
            }
            InteractionState::ResizingTrack(session) => {
                let TrackHandle { axis, track, .. } = session.handle;
                if let Some(size) = grid.set_track_size(axis, track, session.start_size) {
                    callbacks.on_track_resize(axis, track, size);
                }
            }
        }
        tracing::debug!(message = "interaction.cancel", session = self.state.label(), reason = "reverted");
        self.finish();
        Some(InteractionOutcome::Reverted)
    }

    fn accepts_down(&self, event: &PointerEvent) -> bool {
        if event.kind != PointerEventKind::Down || event.button != PointerButton::Primary {
            return false;
        }
        if self.is_active() {
            tracing::trace!(
                message = "interaction.ignored_pointer",
                pointer_id = event.pointer_id,
                active = ?self.state.pointer_id()
            );
            return false;
        }
        true
    }

    fn reject(&self, id: &LayerId, reason: &'static str) -> bool {
        tracing::debug!(message = "interaction.rejected", layer = %id, reason);
        false
    }

    fn target_exists(&self, layers: &[LayerDefinition], grid: &GridLayout) -> bool {
        let has_layer = |id: &LayerId| layers.iter().any(|layer| &layer.id == id);
        match &self.state {
            InteractionState::Idle => true,
            InteractionState::Dragging(s) => has_layer(&s.layer),
            InteractionState::Resizing(s) => has_layer(&s.layer),
            InteractionState::ResizingTrack(s) => grid
                .tracks(s.handle.axis)
                .get(s.handle.track)
                .is_some_and(|track| track.resizable),
        }
    }

    fn apply_pointer(
        &mut self,
        pointer: Point,
        layers: &[LayerDefinition],
        grid: &mut GridLayout,
        callbacks: &mut dyn LayerCallbacks,
    ) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Dragging(session) => {
                let delta = pointer.delta_from(session.start_pointer);
                let position = session.start_position.offset(delta);
                if position == session.last_position {
                    return;
                }
                session.last_position = position;
                tracing::trace!(message = "interaction.drag_move", layer = %session.layer, x = position.x, y = position.y);
                self.layers.entry(session.layer.clone()).or_default().position = Some(position);
                callbacks.on_position_change(&session.layer, position);
            }
            InteractionState::Resizing(session) => {
                let Some(layer) = layers.iter().find(|layer| layer.id == session.layer) else {
                    return;
                };
                let delta = pointer.delta_from(session.start_pointer);
                let rect = resize_rect(session.start_rect, session.edge, delta, &layer.constraints);
                let previous = session.last_rect;
                if rect == previous {
                    return;
                }
                session.last_rect = rect;
                let state = self.layers.entry(session.layer.clone()).or_default();
                state.position = Some(rect.origin());
                state.size = Some(rect.size());
                if rect.size() != previous.size() {
                    callbacks.on_size_change(&session.layer, rect.size());
                }
                if rect.origin() != previous.origin() {
                    callbacks.on_position_change(&session.layer, rect.origin());
                }
            }
            InteractionState::ResizingTrack(session) => {
                let TrackHandle { axis, track, align } = session.handle;
                let delta = pointer.delta_from(session.start_pointer);
                let along = match axis {
                    TrackAxis::Column => delta.x,
                    TrackAxis::Row => delta.y,
                };
                if let Some(size) = grid.resize_track(axis, track, session.start_size, along, align) {
                    session.last_size = size;
                    callbacks.on_track_resize(axis, track, size);
                }
            }
        }
    }

    fn start(&mut self, pointer_id: u32, element: Option<ElementHandle>) {
        if let Some(element) = element
            && let Err(err) = self.capture.set_capture(element, pointer_id)
        {
            tracing::debug!(message = "interaction.capture_failed", pointer_id, %err);
        }
        self.listeners.attach(pointer_id);
    }

    fn finish(&mut self) {
        let Some(pointer_id) = self.state.pointer_id() else {
            return;
        };
        if let Some(element) = self.state.element()
            && let Err(err) = self.capture.release_capture(element, pointer_id)
        {
            tracing::debug!(message = "interaction.release_failed", pointer_id, %err);
        }
        self.listeners.detach(pointer_id);
        self.state = InteractionState::Idle;
    }
}

impl<C: PointerCapture, D: DocumentListeners> Drop for InteractionController<C, D> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use trellis_core::event::{KeyCode, TargetRole};

    use super::*;
    use crate::grid::{GridTrack, PanelLayoutConfig};

    #[derive(Debug, Default)]
    struct Log {
        attached: Vec<u32>,
        detached: Vec<u32>,
        captured: Vec<u32>,
        released: Vec<u32>,
    }

    #[derive(Debug, Clone, Default)]
    struct Host(Rc<RefCell<Log>>);

    impl DocumentListeners for Host {
        fn attach(&mut self, pointer_id: u32) {
            self.0.borrow_mut().attached.push(pointer_id);
        }

        fn detach(&mut self, pointer_id: u32) {
            self.0.borrow_mut().detached.push(pointer_id);
        }
    }

    impl PointerCapture for Host {
        fn set_capture(&mut self, _: ElementHandle, pointer_id: u32) -> Result<(), CaptureError> {
            self.0.borrow_mut().captured.push(pointer_id);
            Ok(())
        }

        fn release_capture(&mut self, _: ElementHandle, pointer_id: u32) -> Result<(), CaptureError> {
            self.0.borrow_mut().released.push(pointer_id);
            Err(CaptureError::InactivePointer { pointer_id })
        }
    }

    #[derive(Debug, Default)]
    struct Recorder {
        positions: Vec<(LayerId, Point)>,
        sizes: Vec<(LayerId, Size)>,
        tracks: Vec<(TrackAxis, usize, f64)>,
    }

    impl LayerCallbacks for Recorder {
        fn on_position_change(&mut self, id: &LayerId, position: Point) {
            self.positions.push((id.clone(), position));
        }

        fn on_size_change(&mut self, id: &LayerId, size: Size) {
            self.sizes.push((id.clone(), size));
        }

        fn on_track_resize(&mut self, axis: TrackAxis, index: usize, size: f64) {
            self.tracks.push((axis, index, size));
        }
    }

    fn grid() -> GridLayout {
        GridLayout::new(PanelLayoutConfig::new(
            &[["side", "main"]],
            vec![GridTrack::new("1fr")],
            vec![
                GridTrack::resizable("200px").min_size(100.0).max_size(300.0),
                GridTrack::new("1fr"),
            ],
        ))
        .expect("valid grid")
    }

    fn window() -> LayerDefinition {
        LayerDefinition::floating("win", Rect::new(100.0, 100.0, 200.0, 150.0))
            .resizable(true)
            .constraints(LayerConstraints {
                min_width: Some(120.0),
                max_width: Some(400.0),
                min_height: Some(80.0),
                max_height: None,
            })
    }

    #[test]
    fn drag_tracks_pointer_and_cleans_up() {
        let host = Host::default();
        let mut controller = InteractionController::new(host.clone(), host.clone());
        let layers = [window()];
        let mut grid = grid();
        let mut recorder = Recorder::default();

        assert!(controller.begin_drag(&layers[0], &PointerEvent::down(1, 150.0, 110.0), Some(ElementHandle(9))));
        controller.handle_pointer(&PointerEvent::moved(1, 160.0, 130.0), &layers, &mut grid, &mut recorder);
        controller.handle_pointer(&PointerEvent::moved(1, 160.0, 130.0), &layers, &mut grid, &mut recorder);
        let outcome = controller.handle_pointer(&PointerEvent::up(1, 170.0, 130.0), &layers, &mut grid, &mut recorder);

        assert_eq!(outcome, Some(InteractionOutcome::Committed));
        assert_eq!(
            recorder.positions,
            vec![
                ("win".into(), Point::new(110.0, 120.0)),
                ("win".into(), Point::new(120.0, 120.0)),
            ]
        );
        assert_eq!(controller.layer_rect(&layers[0]), Rect::new(120.0, 120.0, 200.0, 150.0));
        let log = host.0.borrow();
        assert_eq!(log.attached, vec![1]);
        assert_eq!(log.detached, vec![1]);
        assert_eq!((log.captured.len(), log.released.len()), (1, 1));
    }

    #[test]
    fn drag_handle_and_controls_gate_entry() {
        let mut controller = InteractionController::new(NoCapture, ());
        let layer = window().drag_handle(Rect::new(0.0, 0.0, 200.0, 24.0));
        assert!(!controller.begin_drag(&layer, &PointerEvent::down(1, 150.0, 200.0), None));
        assert!(!controller.begin_drag(
            &layer,
            &PointerEvent::down(1, 150.0, 110.0).with_target(TargetRole::Control),
            None
        ));
        assert!(!controller.begin_drag(&LayerDefinition::new("main"), &PointerEvent::down(1, 0.0, 0.0), None));
        assert!(controller.begin_drag(&layer, &PointerEvent::down(1, 150.0, 110.0), None));
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut controller = InteractionController::new(NoCapture, ());
        let layers = [window()];
        let mut grid = grid();
        assert!(controller.begin_drag(&layers[0], &PointerEvent::down(1, 150.0, 110.0), None));
        assert!(!controller.begin_resize(&layers[0], ResizeEdge::Right, &PointerEvent::down(2, 300.0, 150.0), None));
        assert_eq!(
            controller.handle_pointer(&PointerEvent::up(2, 0.0, 0.0), &layers, &mut grid, &mut ()),
            None
        );
        assert_eq!(controller.state().pointer_id(), Some(1));
    }

    #[test]
    fn left_edge_resize_clamps_then_compensates() {
        let mut controller = InteractionController::new(NoCapture, ());
        let layers = [window()];
        let mut grid = grid();
        let mut recorder = Recorder::default();
        assert!(controller.begin_resize(&layers[0], ResizeEdge::Left, &PointerEvent::down(1, 100.0, 150.0), None));
        controller.handle_pointer(&PointerEvent::moved(1, 400.0, 150.0), &layers, &mut grid, &mut recorder);
        controller.handle_pointer(&PointerEvent::moved(1, 500.0, 150.0), &layers, &mut grid, &mut recorder);
        let rect = controller.layer_rect(&layers[0]);
        assert_eq!(rect.width, 120.0);
        assert_eq!(rect.right(), 300.0);
        assert_eq!(recorder.sizes.len(), 1);
        assert_eq!(recorder.positions, vec![("win".into(), Point::new(180.0, 100.0))]);
    }

    #[test]
    fn corner_resize_combines_edges() {
        let rect = resize_rect(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            ResizeEdge::TopRight,
            Vector::new(20.0, 30.0),
            &LayerConstraints::default(),
        );
        assert_eq!(rect, Rect::new(0.0, 30.0, 120.0, 70.0));
    }

    #[test]
    fn escape_restores_start_values() {
        let mut controller = InteractionController::new(NoCapture, ());
        let layers = [window()];
        let mut grid = grid();
        let mut recorder = Recorder::default();
        assert!(controller.begin_drag(&layers[0], &PointerEvent::down(1, 150.0, 110.0), None));
        controller.handle_pointer(&PointerEvent::moved(1, 250.0, 110.0), &layers, &mut grid, &mut recorder);
        assert!(controller.handle_key(&KeyEvent::new(KeyCode::Escape), &mut grid, &mut recorder));
        assert!(!controller.is_active());
        assert_eq!(recorder.positions.last(), Some(&("win".into(), Point::new(100.0, 100.0))));
        assert_eq!(controller.layer_rect(&layers[0]).origin(), Point::new(100.0, 100.0));
        assert!(!controller.handle_key(&KeyEvent::new(KeyCode::Escape), &mut grid, &mut recorder));
    }

    #[test]
    fn vanished_layer_is_abandoned() {
        let host = Host::default();
        let mut controller = InteractionController::new(NoCapture, host.clone());
        let layers = [window()];
        let mut grid = grid();
        let mut recorder = Recorder::default();
        assert!(controller.begin_drag(&layers[0], &PointerEvent::down(3, 150.0, 110.0), None));
        let outcome = controller.handle_pointer(&PointerEvent::moved(3, 200.0, 200.0), &[], &mut grid, &mut recorder);
        assert_eq!(outcome, Some(InteractionOutcome::Abandoned));
        assert!(recorder.positions.is_empty());
        assert_eq!(host.0.borrow().detached, vec![3]);
    }

    #[test]
    fn track_resize_routes_through_grid() {
        let mut controller = InteractionController::new(NoCapture, ());
        let mut grid = grid();
        let mut recorder = Recorder::default();
        let handle = grid.resize_handles(TrackAxis::Column)[0];
        assert!(controller.begin_track_resize(&grid, handle, &PointerEvent::down(1, 200.0, 10.0), None));
        controller.handle_pointer(&PointerEvent::moved(1, 250.0, 10.0), &[], &mut grid, &mut recorder);
        controller.handle_pointer(&PointerEvent::moved(1, 900.0, 10.0), &[], &mut grid, &mut recorder);
        controller.handle_pointer(&PointerEvent::moved(1, 950.0, 10.0), &[], &mut grid, &mut recorder);
        controller.handle_pointer(&PointerEvent::up(1, 950.0, 10.0), &[], &mut grid, &mut recorder);
        assert_eq!(
            recorder.tracks,
            vec![(TrackAxis::Column, 0, 250.0), (TrackAxis::Column, 0, 300.0)]
        );
        assert_eq!(grid.template().columns[0], "300px");
    }

    #[test]
    fn drop_detaches_listeners() {
        let host = Host::default();
        {
            let mut controller = InteractionController::new(NoCapture, host.clone());
            assert!(controller.begin_drag(&window(), &PointerEvent::down(4, 150.0, 110.0), None));
        }
        assert_eq!(host.0.borrow().detached, vec![4]);
    }

    #[test]
    fn grip_classification() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(classify_resize_edge(rect, Point::new(1.0, 1.0), 4.0), Some(ResizeEdge::TopLeft));
        assert_eq!(classify_resize_edge(rect, Point::new(100.0, 50.0), 4.0), Some(ResizeEdge::Right));
        assert_eq!(classify_resize_edge(rect, Point::new(50.0, 50.0), 4.0), None);
        assert_eq!(classify_resize_edge(rect, Point::new(200.0, 50.0), 4.0), None);
    }
}
