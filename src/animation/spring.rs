/// Spring parameters for a damped animation step
///
/// Mirrors the shape most platform animators accept: a damping ratio
/// (1.0 = critically damped, lower values overshoot) and the initial velocity
/// expressed relative to the total distance travelled per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    /// Damping ratio, clamped to (0.0, 1.0]
    pub damping_ratio: f32,
    /// Initial velocity (1.0 = the full distance in one second)
    pub initial_velocity: f32,
}

impl SpringParams {
    /// Critically damped, no overshoot
    pub const CRITICAL: Self = Self {
        damping_ratio: 1.0,
        initial_velocity: 0.0,
    };

    /// Default spring with pleasant overshoot
    pub const DEFAULT: Self = Self {
        damping_ratio: 0.7,
        initial_velocity: 0.0,
    };

    /// Bouncy spring with more overshoot
    pub const BOUNCY: Self = Self {
        damping_ratio: 0.45,
        initial_velocity: 0.0,
    };

    /// Create spring parameters, clamping the damping ratio into (0, 1]
    pub fn new(damping_ratio: f32, initial_velocity: f32) -> Self {
        let damping_ratio = if damping_ratio.is_finite() {
            damping_ratio.clamp(f32::EPSILON, 1.0)
        } else {
            1.0
        };
        let initial_velocity = if initial_velocity.is_finite() {
            initial_velocity
        } else {
            0.0
        };
        Self {
            damping_ratio,
            initial_velocity,
        }
    }

    /// Returns true if this spring will overshoot its target
    pub fn overshoots(&self) -> bool {
        self.damping_ratio < 1.0
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damping_is_clamped() {
        assert_eq!(SpringParams::new(3.0, 0.0).damping_ratio, 1.0);
        assert!(SpringParams::new(-1.0, 0.0).damping_ratio > 0.0);
        assert_eq!(SpringParams::new(f32::NAN, f32::NAN), SpringParams::CRITICAL);
    }

    #[test]
    fn test_overshoot() {
        assert!(SpringParams::BOUNCY.overshoots());
        assert!(!SpringParams::CRITICAL.overshoots());
    }
}
