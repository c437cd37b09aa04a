#![forbid(unsafe_code)]

//! Edge drawers.
//!
//! A drawer slides in from one container edge. It opens programmatically or
//! by a swipe that starts inside the edge zone, and closes by swiping it
//! back, pressing `Escape`, or tapping the backdrop. Swipes run through a
//! [`SwipeTracker`] on the edge's axis, so they lock to that axis first and
//! a fast flick commits even when it is short. The drawer's open
//! progress (`0` closed, `1` open) is a tween so every transition starts from
//! where the drawer currently is.
//!
//! # Invariants
//!
//! 1. `on_swipe_open` fires at most once per gesture and only on the
//!    release of an opening swipe that passed `open_ratio` or was flicked
//!    faster than the tracker's velocity threshold.
//! 2. A swipe moving away from the opening direction never opens the
//!    drawer.
//! 3. `on_open_change` fires once per change of the open flag.
//!
//! # Failure Modes
//!
//! - A swipe that moves across the edge's axis past the lock threshold
//!   before moving along it is rejected: the drawer does not follow it and
//!   the release settles back.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_core::animation::{Animation, DEFAULT_TRANSITION, Tween};
use trellis_core::event::{KeyEvent, PointerButton, PointerEvent, PointerEventKind};
use trellis_core::gesture::{SwipeOutcome, SwipeTracker};
use trellis_core::geometry::{Axis, Point, Rect};
use web_time::Instant;

use crate::layer::LayerDefinition;
use crate::stack::Visibility;

/// Width (px) of the strip along the edge where an opening swipe may start.
pub const DEFAULT_EDGE_ZONE: f64 = 20.0;

/// Share of the drawer that must be revealed for a release to open it.
pub const DEFAULT_OPEN_RATIO: f64 = 0.3;

/// Tap tolerance (px) for backdrop dismissal.
const BACKDROP_TAP_SLOP: f64 = 10.0;

/// Container edge a drawer is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawerEdge {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl DrawerEdge {
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// `1` when opening moves the pointer towards larger coordinates.
    #[must_use]
    pub const fn opening_sign(self) -> f64 {
        match self {
            Self::Left | Self::Top => 1.0,
            Self::Right | Self::Bottom => -1.0,
        }
    }
}

/// Edge swipe tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeSwipeConfig {
    pub edge: DrawerEdge,
    /// Width (px) of the start zone along the edge.
    pub edge_zone: f64,
    /// Revealed share that commits an opening swipe.
    pub open_ratio: f64,
}

impl Default for EdgeSwipeConfig {
    fn default() -> Self {
        Self {
            edge: DrawerEdge::Left,
            edge_zone: DEFAULT_EDGE_ZONE,
            open_ratio: DEFAULT_OPEN_RATIO,
        }
    }
}

impl EdgeSwipeConfig {
    #[must_use]
    pub fn edge(mut self, edge: DrawerEdge) -> Self {
        self.edge = edge;
        self
    }

    #[must_use]
    pub fn edge_zone(mut self, px: f64) -> Self {
        self.edge_zone = px;
        self
    }

    #[must_use]
    pub fn open_ratio(mut self, ratio: f64) -> Self {
        self.open_ratio = ratio;
        self
    }
}

/// Drawer behaviour of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawerBehavior {
    pub edge: DrawerEdge,
    /// Extent along the swipe axis; the container's extent when absent.
    pub size: Option<f64>,
    pub swipe_to_open: bool,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
}

impl Default for DrawerBehavior {
    fn default() -> Self {
        Self {
            edge: DrawerEdge::Left,
            size: None,
            swipe_to_open: true,
            close_on_backdrop: true,
            close_on_escape: true,
        }
    }
}

impl DrawerBehavior {
    #[must_use]
    pub fn new(edge: DrawerEdge) -> Self {
        Self {
            edge,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn swipe_to_open(mut self, enabled: bool) -> Self {
        self.swipe_to_open = enabled;
        self
    }
}

/// Host hooks for drawer changes.
pub trait DrawerCallbacks {
    /// A released swipe opened the drawer.
    fn on_swipe_open(&mut self) {}

    fn on_open_change(&mut self, _open: bool) {}
}

impl DrawerCallbacks for () {}

/// Render descriptor of a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerStyle {
    pub edge: DrawerEdge,
    /// Signed translation along the edge's axis.
    pub offset: f64,
    pub backdrop_opacity: f64,
    pub visibility: Visibility,
}

impl DrawerStyle {
    /// CSS transform, e.g. `translateX(-240px)`.
    #[must_use]
    pub fn transform(&self) -> String {
        let offset = if self.offset == 0.0 { 0.0 } else { self.offset };
        match self.edge.axis() {
            Axis::Horizontal => format!("translateX({offset}px)"),
            Axis::Vertical => format!("translateY({offset}px)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureKind {
    Opening,
    Closing,
    Backdrop,
}

#[derive(Debug, Clone, Copy)]
struct DrawerGesture {
    pointer_id: u32,
    kind: GestureKind,
    origin: Point,
    /// The tracker locked onto the edge's axis.
    locked: bool,
}

/// Drawer state machine.
#[derive(Debug, Clone)]
pub struct Drawer {
    behavior: DrawerBehavior,
    swipe: EdgeSwipeConfig,
    container: Rect,
    open: bool,
    progress: Tween,
    gesture: Option<DrawerGesture>,
    tracker: SwipeTracker,
}

impl Drawer {
    /// A closed drawer inside `container`.
    #[must_use]
    pub fn new(behavior: DrawerBehavior, swipe: EdgeSwipeConfig, container: Rect) -> Self {
        Self {
            behavior,
            swipe: swipe.edge(behavior.edge),
            container,
            open: false,
            progress: Tween::settled(0.0),
            gesture: None,
            tracker: SwipeTracker::along(behavior.edge.axis()),
        }
    }

    /// The drawer declared by `layer`, if any.
    #[must_use]
    pub fn for_layer(layer: &LayerDefinition, swipe: EdgeSwipeConfig, container: Rect) -> Option<Self> {
        layer.drawer.map(|behavior| Self::new(behavior, swipe, container))
    }

    #[must_use]
    pub fn behavior(&self) -> &DrawerBehavior {
        &self.behavior
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a pointer gesture is in progress.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.gesture.is_some()
    }

    /// Open progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    pub fn set_container(&mut self, container: Rect) {
        self.container = container;
    }

    /// Extent of the drawer along its axis.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.behavior
            .size
            .unwrap_or_else(|| self.container.size().along(self.behavior.edge.axis()))
    }

    /// Rectangle of the fully open drawer.
    #[must_use]
    pub fn panel_rect(&self) -> Rect {
        let c = self.container;
        let size = self.size();
        match self.behavior.edge {
            DrawerEdge::Left => Rect::new(c.x, c.y, size, c.height),
            DrawerEdge::Right => Rect::new(c.right() - size, c.y, size, c.height),
            DrawerEdge::Top => Rect::new(c.x, c.y, c.width, size),
            DrawerEdge::Bottom => Rect::new(c.x, c.bottom() - size, c.width, size),
        }
    }

    /// Open with an animation. Returns whether the state changed.
    pub fn open(&mut self) -> bool {
        self.set_open(true)
    }

    pub fn close(&mut self) -> bool {
        self.set_open(false)
    }

    pub fn toggle(&mut self) -> bool {
        self.set_open(!self.open)
    }

    pub fn tick(&mut self, dt: Duration) {
        self.progress.tick(dt);
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.progress.is_complete()
    }

    /// Feed a pointer event. Returns whether the drawer consumed it.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        now: Instant,
        callbacks: &mut dyn DrawerCallbacks,
    ) -> bool {
        match event.kind {
            PointerEventKind::Down => self.on_down(event, now),
            PointerEventKind::Move => {
                let Some(gesture) = self.owned(event) else {
                    return false;
                };
                if gesture.kind != GestureKind::Backdrop {
                    self.tracker.handle_pointer(event, now);
                    self.follow();
                }
                true
            }
            PointerEventKind::Up => {
                let Some(gesture) = self.owned(event) else {
                    return false;
                };
                let outcome = if gesture.kind == GestureKind::Backdrop {
                    None
                } else {
                    self.tracker.handle_pointer(event, now)
                };
                self.gesture = None;
                self.release(gesture, event.position, outcome, callbacks);
                self.tracker.acknowledge();
                true
            }
            PointerEventKind::Cancel => {
                if self.owned(event).is_none() {
                    return false;
                }
                tracing::debug!(message = "drawer.gesture_cancel", open = self.open);
                self.gesture = None;
                self.tracker.reset();
                self.settle();
                true
            }
        }
    }

    /// `Escape` closes an open drawer.
    pub fn handle_key(&mut self, key: &KeyEvent, callbacks: &mut dyn DrawerCallbacks) -> bool {
        if !key.is_escape() || !self.open || !self.behavior.close_on_escape {
            return false;
        }
        self.gesture = None;
        self.tracker.reset();
        self.set_open(false);
        callbacks.on_open_change(false);
        true
    }

    /// Render descriptor for the current progress.
    #[must_use]
    pub fn style(&self) -> DrawerStyle {
        let progress = self.progress();
        let edge = self.behavior.edge;
        DrawerStyle {
            edge,
            offset: -edge.opening_sign() * (1.0 - progress) * self.size(),
            backdrop_opacity: progress,
            visibility: if self.open || progress > 0.0 || self.gesture.is_some() {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
        }
    }

    fn owned(&self, event: &PointerEvent) -> Option<DrawerGesture> {
        self.gesture.filter(|g| g.pointer_id == event.pointer_id)
    }

    fn on_down(&mut self, event: &PointerEvent, now: Instant) -> bool {
        if self.gesture.is_some() || event.button != PointerButton::Primary {
            return false;
        }
        let kind = if self.open {
            if self.panel_rect().contains(event.position) {
                GestureKind::Closing
            } else if self.container.contains(event.position) {
                GestureKind::Backdrop
            } else {
                return false;
            }
        } else if self.behavior.swipe_to_open && self.in_edge_zone(event.position) {
            GestureKind::Opening
        } else {
            return false;
        };
        tracing::debug!(message = "drawer.gesture_start", kind = ?kind);
        if kind != GestureKind::Backdrop {
            self.tracker.reset();
            self.tracker.handle_pointer(event, now);
        }
        self.gesture = Some(DrawerGesture {
            pointer_id: event.pointer_id,
            kind,
            origin: event.position,
            locked: false,
        });
        true
    }

    fn in_edge_zone(&self, point: Point) -> bool {
        if !self.container.contains(point) {
            return false;
        }
        let c = self.container;
        let zone = self.swipe.edge_zone;
        match self.behavior.edge {
            DrawerEdge::Left => point.x - c.x <= zone,
            DrawerEdge::Right => c.right() - point.x <= zone,
            DrawerEdge::Top => point.y - c.y <= zone,
            DrawerEdge::Bottom => c.bottom() - point.y <= zone,
        }
    }

    /// Progress implied by an axis displacement, for swipe gestures.
    fn dragged_progress(&self, kind: GestureKind, displacement: f64) -> Option<f64> {
        let size = self.size();
        if size <= 0.0 {
            return None;
        }
        let travel = displacement * self.behavior.edge.opening_sign();
        match kind {
            GestureKind::Opening => Some((travel / size).clamp(0.0, 1.0)),
            GestureKind::Closing => Some((1.0 + travel / size).clamp(0.0, 1.0)),
            GestureKind::Backdrop => None,
        }
    }

    /// Track the finger once the tracker has locked onto the edge's axis.
    fn follow(&mut self) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let state = *self.tracker.state();
        if !state.is_operating() {
            return;
        }
        gesture.locked = true;
        let kind = gesture.kind;
        let displacement = state.displacement.along(self.behavior.edge.axis());
        if let Some(progress) = self.dragged_progress(kind, displacement) {
            tracing::trace!(message = "drawer.drag", progress);
            self.progress.jump_to(progress);
        }
    }

    fn release(
        &mut self,
        gesture: DrawerGesture,
        position: Point,
        outcome: Option<SwipeOutcome>,
        callbacks: &mut dyn DrawerCallbacks,
    ) {
        let ratio = self.swipe.open_ratio;
        let sign = self.behavior.edge.opening_sign();
        // A committed swipe counts only towards the gesture's own direction.
        let committed_towards = |towards: f64| match outcome {
            Some(SwipeOutcome::Commit {
                displacement, velocity, ..
            }) => displacement * towards > 0.0 && velocity * towards >= 0.0,
            _ => false,
        };
        let locked = gesture.locked || matches!(outcome, Some(SwipeOutcome::Commit { .. }));
        let displacement = self.tracker.state().displacement.along(self.behavior.edge.axis());
        match gesture.kind {
            GestureKind::Opening => {
                let progress = if locked {
                    self.dragged_progress(gesture.kind, displacement).unwrap_or(0.0)
                } else {
                    0.0
                };
                self.progress.jump_to(progress);
                let opens = committed_towards(sign) || (locked && progress >= ratio);
                if opens && self.set_open(true) {
                    callbacks.on_swipe_open();
                    callbacks.on_open_change(true);
                } else {
                    self.settle();
                }
            }
            GestureKind::Closing => {
                let progress = if locked {
                    self.dragged_progress(gesture.kind, displacement).unwrap_or(1.0)
                } else {
                    1.0
                };
                self.progress.jump_to(progress);
                let closes = committed_towards(-sign) || (locked && progress <= 1.0 - ratio);
                if closes && self.set_open(false) {
                    callbacks.on_open_change(false);
                } else {
                    self.settle();
                }
            }
            GestureKind::Backdrop => {
                let tap = position.delta_from(gesture.origin).length() <= BACKDROP_TAP_SLOP;
                if tap
                    && self.behavior.close_on_backdrop
                    && !self.panel_rect().contains(position)
                    && self.set_open(false)
                {
                    callbacks.on_open_change(false);
                }
            }
        }
    }

    fn set_open(&mut self, open: bool) -> bool {
        if self.open == open {
            return false;
        }
        self.open = open;
        if open {
            tracing::debug!(message = "drawer.open", progress = self.progress());
        } else {
            tracing::debug!(message = "drawer.close", progress = self.progress());
        }
        self.settle();
        true
    }

    /// Animate towards the resting progress of the current open flag.
    fn settle(&mut self) {
        let target = if self.open { 1.0 } else { 0.0 };
        if self.progress.value() != target || self.progress.target() != target {
            self.progress.retarget_with(target, DEFAULT_TRANSITION);
        }
    }
}
