#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Hosts drive animations by calling [`Animation::tick`] from their
//! animation-frame callback with the elapsed time since the previous frame.
//! Values are plain `f64`s (pixels, progress fractions).
//!
//! The one rule that matters for navigation transitions: a retargeted
//! animation starts from its *current interpolated value*, never from its old
//! start or its stale target. [`Tween::retarget`] implements that, and hands
//! out a fresh [`AnimationTicket`] so frame callbacks scheduled for the
//! superseded run become no-ops.

mod easing;
mod tween;

use std::time::Duration;

pub use easing::Easing;
pub use tween::{AnimationTicket, Tween};

/// Default duration of navigation transitions.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// A value that evolves over time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation reached its end.
    fn is_complete(&self) -> bool;

    /// Current value.
    fn value(&self) -> f64;

    /// Rewind to the beginning.
    fn reset(&mut self);
}

/// Linear interpolation between `from` and `to`.
#[inline]
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::lerp;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    }
}
