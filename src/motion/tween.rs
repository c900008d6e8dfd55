//! Time-based easing

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// `t(2 - t)`
    OutQuad,
    QuadInOut,
    CubicInOut,
}

impl Easing {
    /// Map linear progress `t ∈ [0, 1]` to eased progress
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::OutQuad => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Progress of one eased transition, advanced by elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Tween {
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Advance by `dt`; true once the tween has reached its end
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Jump to the end
    pub fn settle(&mut self) {
        self.elapsed = self.duration;
    }

    /// Eased progress in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.apply(t)
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easings_hit_endpoints_and_midpoint() {
        for easing in [
            Easing::Linear,
            Easing::OutQuad,
            Easing::QuadInOut,
            Easing::CubicInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((Easing::OutQuad.apply(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_tween_completes_after_duration() {
        let mut tween = Tween::new(Duration::from_millis(100), Easing::Linear);
        assert!(!tween.advance(Duration::from_millis(40)));
        assert!((tween.progress() - 0.4).abs() < 1e-9);
        assert!(tween.advance(Duration::from_millis(80)));
        assert_eq!(tween.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_done() {
        let tween = Tween::new(Duration::ZERO, Easing::OutQuad);
        assert!(tween.is_done());
        assert_eq!(tween.progress(), 1.0);
    }
}
