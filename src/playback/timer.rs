//! Cancellable one-shot delay driven by frame ticks

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    remaining: Option<Duration>,
}

impl Timer {
    /// (Re)arm to fire after `delay`; replaces any pending delay
    pub fn arm(&mut self, delay: Duration) {
        tracing::trace!(?delay, "timer armed");
        self.remaining = Some(delay);
    }

    pub fn disarm(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Count down by `dt`; true exactly once, on the tick the delay runs out
    pub fn tick(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(left) if left <= dt => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = Timer::default();
        timer.arm(Duration::from_millis(50));
        assert!(!timer.tick(Duration::from_millis(30)));
        assert!(timer.tick(Duration::from_millis(30)));
        assert!(!timer.is_armed());
        assert!(!timer.tick(Duration::from_millis(100)));
    }

    #[test]
    fn test_disarm_cancels() {
        let mut timer = Timer::default();
        timer.arm(Duration::from_millis(10));
        timer.disarm();
        assert!(!timer.tick(Duration::from_secs(1)));
    }
}
