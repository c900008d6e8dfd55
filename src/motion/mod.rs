//! Camera, layout, and entity-position easing
//!
//! Everything here is presentation. The [`Animator`] turns a
//! [`Motion`](crate::replay::Motion) requested by an applied event into a
//! time-based tween over viewport-independent quantities (fractional slot
//! indices, sweep x in world units), so the renderer can map them through
//! whatever layout the current viewport implies.

pub mod camera;
pub mod layout;
pub mod tween;

use std::time::Duration;

use crate::config::Speed;
use crate::replay::Motion;
use crate::trace::BarId;

pub use camera::{Camera, CameraRig, Viewport};
pub use layout::{bucket_center, BarLayout, Bounds, NodeBox, TreeLayout};
pub use tween::{lerp, Easing, Tween};

/// Below this distance the sweep line jumps instead of gliding
pub const SWEEP_SNAP: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
enum Animation {
    /// Fractional slot per bar id, before and after
    Reslot { from: Vec<f64>, to: Vec<f64> },
    Mote { bar: BarId, digit: u8 },
    Sweep { from: f64, to: f64 },
}

/// Entity positions plus at most one in-flight tween
#[derive(Debug, Clone, Default)]
pub struct Animator {
    /// Settled slot per bar id
    bar_slots: Vec<f64>,
    sweep_x: Option<f64>,
    active: Option<(Animation, Tween)>,
}

impl Animator {
    /// Bars start in their input order
    pub fn with_bars(count: usize) -> Self {
        Animator {
            bar_slots: (0..count).map(|i| i as f64).collect(),
            sweep_x: None,
            active: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Begin the tween for `motion`; returns whether one was armed.
    ///
    /// `slots` is the view's slot-to-bar map after the event was applied.
    pub fn start(&mut self, motion: Motion, slots: Option<&[BarId]>, speed: Speed) -> bool {
        self.settle();
        let armed = match motion {
            Motion::Reslot => {
                let Some(slots) = slots else {
                    return false;
                };
                let mut to = self.bar_slots.clone();
                for (slot, &bar) in slots.iter().enumerate() {
                    if let Some(t) = to.get_mut(bar) {
                        *t = slot as f64;
                    }
                }
                let from = self.bar_slots.clone();
                Some((
                    Animation::Reslot { from, to },
                    Tween::new(speed.reslot_duration(), Easing::CubicInOut),
                ))
            }
            Motion::Mote { bar, digit } => Some((
                Animation::Mote { bar, digit },
                Tween::new(speed.mote_duration(), Easing::QuadInOut),
            )),
            Motion::Sweep { x } => {
                let from = self.sweep_x.unwrap_or(x);
                let dist = (x - from).abs();
                if dist < SWEEP_SNAP {
                    self.sweep_x = Some(x);
                    None
                } else {
                    Some((
                        Animation::Sweep { from, to: x },
                        Tween::new(speed.sweep_duration(dist), Easing::OutQuad),
                    ))
                }
            }
        };
        tracing::trace!(?motion, armed = armed.is_some(), "motion");
        self.active = armed;
        self.active.is_some()
    }

    /// Advance the in-flight tween; true when it finishes on this tick
    pub fn advance(&mut self, dt: Duration) -> bool {
        let done = match &mut self.active {
            Some((_, tween)) => tween.advance(dt),
            None => return false,
        };
        if done {
            self.settle();
        }
        done
    }

    /// Jump any in-flight tween to its end state
    pub fn settle(&mut self) {
        match self.active.take() {
            Some((Animation::Reslot { to, .. }, _)) => self.bar_slots = to,
            Some((Animation::Sweep { to, .. }, _)) => self.sweep_x = Some(to),
            Some((Animation::Mote { .. }, _)) | None => {}
        }
    }

    /// Fractional slot of `bar` right now
    pub fn bar_position(&self, bar: BarId) -> f64 {
        if let Some((Animation::Reslot { from, to }, tween)) = &self.active {
            if let (Some(&a), Some(&b)) = (from.get(bar), to.get(bar)) {
                return lerp(a, b, tween.progress());
            }
        }
        self.bar_slots.get(bar).copied().unwrap_or(bar as f64)
    }

    /// Bar in flight toward a bucket, with eased progress
    pub fn mote(&self) -> Option<(BarId, u8, f64)> {
        match &self.active {
            Some((Animation::Mote { bar, digit }, tween)) => Some((*bar, *digit, tween.progress())),
            _ => None,
        }
    }

    pub fn sweep_x(&self) -> Option<f64> {
        match &self.active {
            Some((Animation::Sweep { from, to }, tween)) => Some(lerp(*from, *to, tween.progress())),
            _ => self.sweep_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reslot_interpolates_then_settles() {
        let mut anim = Animator::with_bars(3);
        let speed = Speed::default();
        assert!(anim.start(Motion::Reslot, Some(&[2, 1, 0][..]), speed));
        assert_eq!(anim.bar_position(0), 0.0);
        anim.advance(speed.reslot_duration() / 2);
        assert!((anim.bar_position(0) - 1.0).abs() < 1e-9);
        assert!(anim.advance(speed.reslot_duration()));
        assert!(!anim.is_armed());
        assert_eq!(anim.bar_position(0), 2.0);
        assert_eq!(anim.bar_position(2), 0.0);
    }

    #[test]
    fn test_short_sweep_snaps() {
        let mut anim = Animator::default();
        assert!(!anim.start(Motion::Sweep { x: 100.0 }, None, Speed::default()));
        assert_eq!(anim.sweep_x(), Some(100.0));
        assert!(!anim.start(Motion::Sweep { x: 100.5 }, None, Speed::default()));
        assert!(anim.start(Motion::Sweep { x: 300.0 }, None, Speed::default()));
        assert_eq!(anim.sweep_x(), Some(100.5));
    }

    #[test]
    fn test_settle_interrupts_mote() {
        let mut anim = Animator::with_bars(2);
        anim.start(Motion::Mote { bar: 1, digit: 7 }, None, Speed::default());
        assert_eq!(anim.mote().map(|(b, d, _)| (b, d)), Some((1, 7)));
        anim.settle();
        assert_eq!(anim.mote(), None);
        assert_eq!(anim.bar_position(1), 1.0);
    }
}
