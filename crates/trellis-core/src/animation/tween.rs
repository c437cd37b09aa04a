#![forbid(unsafe_code)]

//! Retargetable from/to tween.
//!
//! # Invariants
//!
//! 1. `value()` is `from` at elapsed 0 and exactly `to` once complete.
//! 2. `retarget(to)` sets `from` to the value sampled at the moment of the
//!    call, resets elapsed time, and bumps the generation.
//! 3. Ticks carrying a ticket from an older generation never advance the
//!    tween.
//!
//! # Failure Modes
//!
//! - Zero duration completes on the first tick (no division by zero).

use std::time::Duration;

use super::{Animation, Easing, lerp};

/// Token identifying one run of a [`Tween`].
///
/// A host schedules its frame callback with the ticket current at scheduling
/// time; once the tween is retargeted or stopped, the old ticket is stale and
/// [`Tween::tick_ticket`] ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket(u64);

/// Eased interpolation from `from` to `to` over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    generation: u64,
}

impl Tween {
    /// Create a tween with the default easing.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
            generation: 0,
        }
    }

    /// A completed tween resting at `value`.
    #[must_use]
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, Duration::ZERO)
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value the current run started from.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> f64 {
        self.from
    }

    /// Target value.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Normalized time in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// The ticket of the current run.
    #[inline]
    #[must_use]
    pub fn ticket(&self) -> AnimationTicket {
        AnimationTicket(self.generation)
    }

    /// Whether `ticket` belongs to the current run.
    #[inline]
    #[must_use]
    pub fn is_current(&self, ticket: AnimationTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Start a new run towards `to` from the current interpolated value.
    pub fn retarget(&mut self, to: f64) -> AnimationTicket {
        self.retarget_with(to, self.duration)
    }

    /// Like [`retarget`](Self::retarget) with a new duration.
    pub fn retarget_with(&mut self, to: f64, duration: Duration) -> AnimationTicket {
        let current = self.value();
        tracing::trace!(message = "tween.retarget", from = current, to, stale_target = self.to);
        self.from = current;
        self.to = to;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.generation = self.generation.wrapping_add(1);
        self.ticket()
    }

    /// Jump to `value` and stop, invalidating outstanding tickets.
    pub fn jump_to(&mut self, value: f64) {
        self.from = value;
        self.to = value;
        self.elapsed = self.duration;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Advance only if `ticket` is current. Returns whether it advanced.
    pub fn tick_ticket(&mut self, ticket: AnimationTicket, dt: Duration) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.tick(dt);
        true
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        lerp(self.from, self.to, self.easing.apply(self.progress()))
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
