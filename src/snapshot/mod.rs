//! Render snapshot
//!
//! The front-end pulls one [`Frame`] per redraw instead of being pushed
//! updates by the controller. A frame carries the algorithm-independent part
//! of the picture; scene details are read from the session's view directly.

use std::fmt;

use crate::config::Speed;
use crate::motion::Camera;
use crate::playback::{Phase, Session};
use crate::replay::Interpret;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub algorithm: &'static str,
    pub phase: Phase,
    /// Events applied
    pub index: usize,
    pub total: usize,
    pub status: String,
    pub last_kind: Option<&'static str>,
    pub playing: bool,
    pub stepping: bool,
    pub speed: Speed,
    pub camera: Camera,
}

impl Frame {
    pub fn capture<V: Interpret>(algorithm: &'static str, session: &Session<V>) -> Self {
        Frame {
            algorithm,
            phase: session.phase(),
            index: session.index(),
            total: session.total(),
            status: session.status().to_string(),
            last_kind: session.last_kind(),
            playing: session.is_playing(),
            stepping: session.is_stepping(),
            speed: session.speed(),
            camera: session.camera(),
        }
    }

    /// Fraction of the log applied, `1.0` for an empty log
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.index as f64 / self.total as f64
        }
    }

    pub fn phase_label(&self) -> &'static str {
        match (self.phase, self.playing) {
            (Phase::Input, _) => "input",
            (Phase::Running, true) => "playing",
            (Phase::Running, false) => "paused",
            (Phase::Complete, _) => "complete",
        }
    }
}

/// `[index/total] status`, the line printed in headless mode
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.total.to_string().len();
        write!(
            f,
            "[{:>width$}/{}] {}",
            self.index,
            self.total,
            self.status,
            width = width
        )
    }
}
