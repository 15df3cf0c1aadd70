//! Easing curves for animation steps.
//!
//! A curve is an identifier. The drivers carry it on an `Animate` step and
//! hand it to the [`Animator`](crate::runtime::Animator) as is; mapping it to
//! the backend's own easing is the animator's business.
//!
//! ```ignore
//! Step::animate(0.3, move || panel.set_opacity(1.0))
//!     .timing(TimingFunction::EaseOut)
//! ```

use std::fmt;
use std::sync::Arc;

/// Easing curve attached to an animation step
#[derive(Clone, Default)]
pub enum TimingFunction {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    /// Cubic bezier control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Curve computed by the caller, mapping progress in [0, 1] to output
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl TimingFunction {
    /// Curve backed by `f`
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }
}

impl PartialEq for TimingFunction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TimingFunction::Linear, TimingFunction::Linear)
            | (TimingFunction::EaseIn, TimingFunction::EaseIn)
            | (TimingFunction::EaseOut, TimingFunction::EaseOut)
            | (TimingFunction::EaseInOut, TimingFunction::EaseInOut) => true,
            (TimingFunction::CubicBezier(a, b, c, d), TimingFunction::CubicBezier(e, f, g, h)) => {
                (a, b, c, d) == (e, f, g, h)
            }
            // closures compare by identity
            (TimingFunction::Custom(a), TimingFunction::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingFunction::Linear => f.write_str("Linear"),
            TimingFunction::EaseIn => f.write_str("EaseIn"),
            TimingFunction::EaseOut => f.write_str("EaseOut"),
            TimingFunction::EaseInOut => f.write_str("EaseInOut"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => f
                .debug_tuple("CubicBezier")
                .field(x1)
                .field(y1)
                .field(x2)
                .field(y2)
                .finish(),
            TimingFunction::Custom(_) => f.write_str("Custom"),
        }
    }
}
