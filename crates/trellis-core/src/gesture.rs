#![forbid(unsafe_code)]

//! Swipe recognition: turns one pointer stream into a continuous,
//! phase-tagged displacement/velocity signal.
//!
//! [`SwipeTracker`] is a stateful processor fed with [`PointerEvent`]s. It
//! publishes an [`InputState`] after every event, which pivots, stacks, and
//! drawers read to translate their content in lockstep with the finger, and
//! returns a [`SwipeOutcome`] when the pointer is released.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Tracking -> Operating -> Ended -> Idle
//!            \--------------------> Ended (release before axis lock)
//! ```
//!
//! - **Tracking**: pointer down, movement below the lock threshold, axis not
//!   yet decided.
//! - **Operating**: movement along the configured axis exceeded
//!   `lock_threshold`. The axis is fixed for the rest of the gesture and
//!   cross-axis motion no longer contributes to displacement.
//! - **Ended**: terminal; carries the final values until the consumer calls
//!   [`SwipeTracker::acknowledge`] (or a new pointer-down arrives).
//!
//! # Invariants
//!
//! 1. Displacement and velocity are zero in `Idle`.
//! 2. Only one pointer is tracked; events from other pointers are ignored.
//! 3. Once locked, the displacement is always a projection onto the axis.
//! 4. A gesture whose cross axis exceeds the lock threshold first is rejected:
//!    it never enters `Operating` and its release cancels.
//!
//! # Failure Modes
//!
//! - Events with a zero time delta leave velocity unchanged.
//! - A sample at the previous position (pointer-up repeating the last move)
//!   keeps the velocity, unless the pointer rested longer than
//!   `VELOCITY_REST_MS`, which zeroes it.
//! - A pointer-up for an unknown pointer is ignored.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::event::{PointerButton, PointerEvent, PointerEventKind};
use crate::geometry::{Axis, Point, Vector};

/// Movement along the axis (px) that locks a gesture to it.
pub const DEFAULT_LOCK_THRESHOLD: f64 = 10.0;

/// Release displacement (px) beyond which a swipe commits.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 150.0;

/// Release velocity (px/ms) beyond which a swipe commits.
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.6;

/// Weight of the newest velocity sample in the exponential smoothing.
const VELOCITY_SAMPLE_WEIGHT: f64 = 0.8;

/// A pointer motionless for longer than this (ms) has no release velocity.
const VELOCITY_REST_MS: f64 = 100.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for swipe recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwipeConfig {
    /// The axis the swipe operates on.
    pub axis: Axis,
    /// Movement (px) along `axis` before the gesture locks (default: 10).
    pub lock_threshold: f64,
    /// Release displacement (px) that commits (default: 150).
    pub distance_threshold: f64,
    /// Release velocity (px/ms) that commits (default: 0.6).
    pub velocity_threshold: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            lock_threshold: DEFAULT_LOCK_THRESHOLD,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
        }
    }
}

impl SwipeConfig {
    /// Horizontal swipe with default thresholds.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::default()
    }

    /// Vertical swipe with default thresholds.
    #[must_use]
    pub fn vertical() -> Self {
        Self {
            axis: Axis::Vertical,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn lock_threshold(mut self, px: f64) -> Self {
        self.lock_threshold = px;
        self
    }

    #[must_use]
    pub fn distance_threshold(mut self, px: f64) -> Self {
        self.distance_threshold = px;
        self
    }

    #[must_use]
    pub fn velocity_threshold(mut self, px_per_ms: f64) -> Self {
        self.velocity_threshold = px_per_ms;
        self
    }

    /// Reject non-finite or non-positive thresholds.
    pub fn validate(&self) -> Result<(), GestureConfigError> {
        for (name, value) in [
            ("lock_threshold", self.lock_threshold),
            ("distance_threshold", self.distance_threshold),
            ("velocity_threshold", self.velocity_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GestureConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }

    /// Commit-or-cancel decision for a release with the given axis values.
    ///
    /// Commits when the distance OR the velocity threshold is exceeded, so a
    /// fast short flick and a slow long drag both commit.
    #[must_use]
    pub fn decide(&self, displacement: f64, velocity: f64) -> SwipeDecision {
        if displacement.abs() > self.distance_threshold || velocity.abs() > self.velocity_threshold {
            SwipeDecision::Commit
        } else {
            SwipeDecision::Cancel
        }
    }
}

/// Invalid swipe configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureConfigError {
    InvalidThreshold { name: &'static str, value: f64 },
}

impl fmt::Display for GestureConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} must be finite and > 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for GestureConfigError {}

// ---------------------------------------------------------------------------
// Published state
// ---------------------------------------------------------------------------

/// Phase of a continuous pointer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationPhase {
    #[default]
    Idle,
    Tracking,
    /// Axis locked; consumers call this "swiping".
    Operating,
    Ended,
}

/// Direction of a locked swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwipeDirection {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    fn from_axis_delta(axis: Axis, delta: f64) -> Self {
        match axis {
            Axis::Horizontal if delta < 0.0 => Self::Left,
            Axis::Horizontal if delta > 0.0 => Self::Right,
            Axis::Vertical if delta < 0.0 => Self::Up,
            Axis::Vertical if delta > 0.0 => Self::Down,
            _ => Self::None,
        }
    }

    /// `-1` for left/up, `1` for right/down, `0` for none.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left | Self::Up => -1,
            Self::Right | Self::Down => 1,
            Self::None => 0,
        }
    }
}

/// Continuous operation state published after every pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub phase: OperationPhase,
    /// Movement since pointer-down (axis projection once locked).
    pub displacement: Vector,
    /// Smoothed velocity in px/ms.
    pub velocity: Vector,
    pub direction: SwipeDirection,
}

impl InputState {
    /// The idle state: zero displacement and velocity.
    pub const IDLE: Self = Self {
        phase: OperationPhase::Idle,
        displacement: Vector::ZERO,
        velocity: Vector::ZERO,
        direction: SwipeDirection::None,
    };

    #[inline]
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, OperationPhase::Idle)
    }

    /// Whether the gesture is locked and driving content.
    #[inline]
    #[must_use]
    pub const fn is_operating(&self) -> bool {
        matches!(self.phase, OperationPhase::Operating)
    }
}

/// Proportionally rescale displacement and velocity by `target / source`.
///
/// Used to drive a narrow tab strip in lockstep with a wide content pane.
/// Returns the input untouched (borrowed) when either width is not positive
/// or the gesture is idle.
#[must_use]
pub fn scale_input_state(state: &InputState, source_width: f64, target_width: f64) -> Cow<'_, InputState> {
    if source_width <= 0.0 || target_width <= 0.0 || state.is_idle() {
        return Cow::Borrowed(state);
    }
    let factor = target_width / source_width;
    Cow::Owned(InputState {
        phase: state.phase,
        displacement: state.displacement.scale(factor),
        velocity: state.velocity.scale(factor),
        direction: state.direction,
    })
}

/// Release decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDecision {
    Commit,
    Cancel,
}

/// Result of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeOutcome {
    /// The swipe passed a threshold; the consumer should navigate.
    Commit {
        direction: SwipeDirection,
        displacement: f64,
        velocity: f64,
    },
    /// The consumer should animate back to the pre-gesture position.
    Cancel,
}

// ---------------------------------------------------------------------------
// SwipeTracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisLock {
    Pending,
    Locked,
    Rejected,
}

#[derive(Debug, Clone, Copy)]
struct ActivePointer {
    id: u32,
    origin: Point,
    last: Point,
    last_time: Instant,
    lock: AxisLock,
}

/// Single-pointer swipe recognizer.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    config: SwipeConfig,
    state: InputState,
    pointer: Option<ActivePointer>,
}

impl SwipeTracker {
    /// Create a tracker; fails on invalid thresholds.
    pub fn new(config: SwipeConfig) -> Result<Self, GestureConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: InputState::IDLE,
            pointer: None,
        })
    }

    /// A tracker along `axis` with the default thresholds.
    #[must_use]
    pub fn along(axis: Axis) -> Self {
        Self {
            config: SwipeConfig {
                axis,
                ..SwipeConfig::default()
            },
            state: InputState::IDLE,
            pointer: None,
        }
    }

    /// Current published state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> OperationPhase {
        self.state.phase
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Pointer id owning the gesture, if any.
    #[must_use]
    pub fn active_pointer(&self) -> Option<u32> {
        self.pointer.map(|p| p.id)
    }

    /// Pointer-down position of the active gesture.
    #[must_use]
    pub fn origin(&self) -> Option<Point> {
        self.pointer.map(|p| p.origin)
    }

    /// Feed one pointer event. Returns an outcome when the gesture ends.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<SwipeOutcome> {
        match event.kind {
            PointerEventKind::Down => {
                self.on_down(event, now);
                None
            }
            PointerEventKind::Move => {
                if self.owns(event) {
                    self.on_move(event.position, now);
                }
                None
            }
            PointerEventKind::Up => {
                if !self.owns(event) {
                    return None;
                }
                self.on_move(event.position, now);
                Some(self.finish(false))
            }
            PointerEventKind::Cancel => {
                if !self.owns(event) {
                    return None;
                }
                Some(self.finish(true))
            }
        }
    }

    /// Consume the `Ended` state, returning to `Idle`.
    pub fn acknowledge(&mut self) {
        if self.state.phase == OperationPhase::Ended {
            self.state = InputState::IDLE;
        }
    }

    /// Drop any gesture in progress without producing an outcome.
    pub fn reset(&mut self) {
        self.pointer = None;
        self.state = InputState::IDLE;
    }

    fn owns(&self, event: &PointerEvent) -> bool {
        self.pointer.is_some_and(|p| p.id == event.pointer_id)
    }

    fn on_down(&mut self, event: &PointerEvent, now: Instant) {
        if self.pointer.is_some() || event.button != PointerButton::Primary {
            return;
        }
        self.pointer = Some(ActivePointer {
            id: event.pointer_id,
            origin: event.position,
            last: event.position,
            last_time: now,
            lock: AxisLock::Pending,
        });
        self.state = InputState {
            phase: OperationPhase::Tracking,
            ..InputState::IDLE
        };
    }

    fn on_move(&mut self, position: Point, now: Instant) {
        let axis = self.config.axis;
        let lock_threshold = self.config.lock_threshold;
        let Some(pointer) = self.pointer.as_mut() else {
            return;
        };

        let total = position.delta_from(pointer.origin);
        if pointer.lock == AxisLock::Pending {
            let main = total.along(axis).abs();
            let cross = total.along(axis.cross()).abs();
            if main > lock_threshold && main >= cross {
                pointer.lock = AxisLock::Locked;
                tracing::trace!(message = "swipe.lock", axis = ?axis, main, cross);
            } else if cross > lock_threshold {
                pointer.lock = AxisLock::Rejected;
                tracing::trace!(message = "swipe.reject", axis = ?axis, main, cross);
            }
        }

        let elapsed_ms = now.duration_since(pointer.last_time).as_secs_f64() * 1000.0;
        let mut velocity = self.state.velocity;
        if elapsed_ms > 0.0 && position == pointer.last {
            if elapsed_ms > VELOCITY_REST_MS {
                velocity = Vector::ZERO;
                pointer.last_time = now;
            }
        } else if elapsed_ms > 0.0 {
            let step = position.delta_from(pointer.last).scale(1.0 / elapsed_ms);
            velocity = Vector::new(
                velocity.x + (step.x - velocity.x) * VELOCITY_SAMPLE_WEIGHT,
                velocity.y + (step.y - velocity.y) * VELOCITY_SAMPLE_WEIGHT,
            );
            pointer.last_time = now;
        }
        pointer.last = position;

        self.state = if pointer.lock == AxisLock::Locked {
            let displacement = total.project(axis);
            InputState {
                phase: OperationPhase::Operating,
                displacement,
                velocity: velocity.project(axis),
                direction: SwipeDirection::from_axis_delta(axis, displacement.along(axis)),
            }
        } else {
            InputState {
                phase: OperationPhase::Tracking,
                displacement: total,
                velocity,
                direction: SwipeDirection::None,
            }
        };
    }

    fn finish(&mut self, canceled: bool) -> SwipeOutcome {
        let axis = self.config.axis;
        let locked = self
            .pointer
            .take()
            .is_some_and(|p| p.lock == AxisLock::Locked);
        let displacement = self.state.displacement.along(axis);
        let velocity = self.state.velocity.along(axis);
        self.state.phase = OperationPhase::Ended;

        let outcome = if !canceled
            && locked
            && self.config.decide(displacement, velocity) == SwipeDecision::Commit
        {
            SwipeOutcome::Commit {
                direction: self.state.direction,
                displacement,
                velocity,
            }
        } else {
            SwipeOutcome::Cancel
        };
        tracing::debug!(message = "swipe.end", ?outcome, canceled, locked);
        outcome
    }
}
