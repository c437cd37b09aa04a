#![forbid(unsafe_code)]

//! Easing curves.

use serde::{Deserialize, Serialize};

/// Iterations of Newton's method when inverting a bezier's x(t).
const BEZIER_NEWTON_ITERATIONS: usize = 8;

/// Easing functions mapping normalized time to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    /// Quadratic ease in (slow start).
    EaseIn,
    /// Quadratic ease out (slow end).
    EaseOut,
    EaseInOut,
    /// Cubic ease out; the default for navigation transitions.
    #[default]
    CubicOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    Bezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// CSS `ease`.
    pub const CSS_EASE: Self = Self::Bezier {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };

    /// Apply the curve to `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::Bezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_x(t, x1, x2);
                bezier_component(s, y1, y2)
            }
        }
    }
}

fn bezier_component(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_derivative(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Parameter `s` where the curve's x equals `x`; falls back to bisection
/// when the derivative flattens out.
fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..BEZIER_NEWTON_ITERATIONS {
        let err = bezier_component(s, x1, x2) - x;
        if err.abs() < 1e-7 {
            return s;
        }
        let slope = bezier_derivative(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    while hi - lo > 1e-7 {
        if bezier_component(s, x1, x2) < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
