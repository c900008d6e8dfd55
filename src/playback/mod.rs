//! Playback controller
//!
//! A [`Session`] owns one algorithm run: the validated input, the recorded
//! trace, the interpreter state at the current index, and the presentation
//! rigs (entity animator and camera). Everything advances on [`Session::tick`],
//! so the caller decides the frame rate and tests can drive time by hand.
//!
//! ```text
//! Input --start--> Running --last event--> Complete
//!   ^                 |                       |
//!   +------reset------+-----------------------+
//! ```
//!
//! Only one event is ever in flight. An event is applied first; its motion
//! (if any) then plays out, and only after it settles may the next event be
//! applied, either by another [`step`](Session::step) or by the play delay.

pub mod timer;

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Speed;
use crate::motion::{Animator, Camera, CameraRig, TreeLayout, Viewport};
use crate::replay::{EventOf, InputOf, Interpret, NodeOf, Scene};
use crate::trace::{EventKind, NodeId, Trace, TraceBuilder};

pub use timer::Timer;

/// Default canvas size before the front-end reports its own
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 500.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Input is being edited; no trace exists
    Input,
    Running,
    Complete,
}

/// Result of a controller command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The command changed playback state
    Advanced,
    /// The run reached its end
    Finished,
    /// Not allowed right now; nothing changed
    Ignored(&'static str),
}

pub struct Session<V: Interpret> {
    input: InputOf<V>,
    builder: V::Builder,
    trace: Option<Trace<EventOf<V>, NodeOf<V>>>,
    view: Option<V>,
    /// Number of events applied
    index: usize,
    phase: Phase,
    playing: bool,
    /// An applied event's motion is still playing out
    stepping: bool,
    delay: Timer,
    speed: Speed,
    animator: Animator,
    camera: CameraRig,
    layout: TreeLayout,
    viewport: Viewport,
    /// Node the camera last moved to
    focused: Option<NodeId>,
}

impl<V: Interpret> Session<V> {
    pub fn new(input: InputOf<V>, builder: V::Builder, speed: Speed) -> Self {
        Session {
            input,
            builder,
            trace: None,
            view: None,
            index: 0,
            phase: Phase::Input,
            playing: false,
            stepping: false,
            delay: Timer::default(),
            speed,
            animator: Animator::default(),
            camera: CameraRig::default(),
            layout: TreeLayout::default(),
            viewport: DEFAULT_VIEWPORT,
            focused: None,
        }
    }

    // ========== Accessors for the renderer ==========

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &InputOf<V> {
        &self.input
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn trace(&self) -> Option<&Trace<EventOf<V>, NodeOf<V>>> {
        self.trace.as_ref()
    }

    /// Events applied so far
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::len)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_stepping(&self) -> bool {
        self.stepping
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn camera(&self) -> Camera {
        self.camera.current()
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Kind tag of the most recently applied event
    pub fn last_kind(&self) -> Option<&'static str> {
        let trace = self.trace.as_ref()?;
        let last = self.index.checked_sub(1)?;
        trace.get(last).map(EventKind::kind)
    }

    pub fn status(&self) -> &str {
        self.view
            .as_ref()
            .map_or("Press Enter to build the trace", Interpret::status)
    }

    // ========== Commands ==========

    /// Build the trace and enter `Running`
    pub fn start(&mut self) -> StepOutcome {
        if self.phase != Phase::Input {
            return StepOutcome::Ignored("already started; reset first");
        }
        let trace = self.builder.build(&self.input);
        debug!(
            events = trace.len(),
            nodes = trace.nodes().len(),
            "trace built"
        );
        let view = V::new(&self.input, trace.nodes());
        self.animator = Animator::with_bars(view.slots().map_or(0, <[_]>::len));
        self.layout = match V::SCENE {
            Scene::Tree => TreeLayout::compute(trace.nodes()),
            Scene::Bars | Scene::Plane => TreeLayout::default(),
        };
        self.trace = Some(trace);
        self.view = Some(view);
        self.index = 0;
        self.phase = Phase::Running;
        self.focused = None;
        self.camera.snap(self.overview());
        info!(events = self.total(), "session started");

        if self.total() == 0 {
            self.finish();
            return StepOutcome::Finished;
        }
        StepOutcome::Advanced
    }

    /// Apply the next event
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Ignored("not running");
        }
        if self.playing {
            return StepOutcome::Ignored("pause before stepping");
        }
        if self.stepping {
            return StepOutcome::Ignored("previous step still animating");
        }
        self.advance_one()
    }

    pub fn play(&mut self) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Ignored("not running");
        }
        if self.playing {
            return StepOutcome::Ignored("already playing");
        }
        self.playing = true;
        debug!(index = self.index, "play");
        if self.stepping {
            // The in-flight step arms the delay when it settles.
            return StepOutcome::Advanced;
        }
        self.advance_one()
    }

    pub fn pause(&mut self) -> StepOutcome {
        if !self.playing {
            return StepOutcome::Ignored("not playing");
        }
        self.playing = false;
        self.delay.disarm();
        self.animator.settle();
        debug!(index = self.index, "pause");
        self.after_advance()
    }

    pub fn toggle(&mut self) -> StepOutcome {
        if self.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Finish any in-flight motion at once
    pub fn settle(&mut self) -> StepOutcome {
        if !self.animator.is_armed() {
            return StepOutcome::Ignored("nothing animating");
        }
        self.animator.settle();
        self.after_advance()
    }

    /// Drop the trace and return to `Input`
    pub fn reset(&mut self) -> StepOutcome {
        self.trace = None;
        self.view = None;
        self.index = 0;
        self.phase = Phase::Input;
        self.playing = false;
        self.stepping = false;
        self.delay.disarm();
        self.animator = Animator::default();
        self.layout = TreeLayout::default();
        self.camera.snap(Camera::default());
        self.focused = None;
        info!("session reset");
        StepOutcome::Advanced
    }

    /// Reset and build a fresh trace from the same input
    pub fn restart(&mut self) -> StepOutcome {
        self.reset();
        self.start()
    }

    /// Apply every remaining event in order, then finish
    pub fn jump_to_end(&mut self) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Ignored("not running");
        }
        self.playing = false;
        self.stepping = false;
        self.delay.disarm();
        self.animator.settle();
        while self.index < self.total() {
            self.apply_settled();
        }
        self.finish();
        StepOutcome::Finished
    }

    /// Rebuild the state one event earlier
    pub fn step_back(&mut self) -> StepOutcome {
        if self.index == 0 {
            return StepOutcome::Ignored("already at the first event");
        }
        self.seek(self.index - 1)
    }

    /// Rebuild the state after exactly `target` events by replaying from zero
    pub fn seek(&mut self, target: usize) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Ignored("not running");
        }
        if self.playing {
            return StepOutcome::Ignored("pause before seeking");
        }
        if target >= self.total() {
            return self.jump_to_end();
        }
        let Some(trace) = &self.trace else {
            return StepOutcome::Ignored("not running");
        };
        let view = V::new(&self.input, trace.nodes());
        self.animator = Animator::with_bars(view.slots().map_or(0, <[_]>::len));
        self.view = Some(view);
        self.index = 0;
        self.stepping = false;
        self.delay.disarm();
        while self.index < target {
            self.apply_settled();
        }
        debug!(index = self.index, "seek");
        self.follow();
        StepOutcome::Advanced
    }

    /// Advance clocks by `dt`: camera easing, the in-flight motion, and the
    /// play delay
    pub fn tick(&mut self, dt: Duration) -> StepOutcome {
        self.camera.tick(dt);
        if self.phase != Phase::Running {
            return StepOutcome::Ignored("not running");
        }
        if self.animator.is_armed() {
            if self.animator.advance(dt) {
                return self.after_advance();
            }
        } else if self.delay.tick(dt) && self.playing {
            return self.advance_one();
        }
        StepOutcome::Ignored("idle")
    }

    /// New speed applies to the next motion and delay
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        debug!(speed = speed.get(), "speed");
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.camera.snap(self.target_camera());
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.camera.pan(dx, dy);
    }

    pub fn zoom(&mut self, factor: f64) {
        self.camera.zoom(factor);
    }

    // ========== Internals ==========

    fn advance_one(&mut self) -> StepOutcome {
        if self.index >= self.total() {
            self.finish();
            return StepOutcome::Finished;
        }
        let (Some(trace), Some(view)) = (&self.trace, &mut self.view) else {
            return StepOutcome::Ignored("not running");
        };
        let Some(event) = trace.get(self.index) else {
            return StepOutcome::Ignored("not running");
        };
        debug!(index = self.index, kind = event.kind(), "apply");
        let motion = view.apply(event, trace.nodes());
        self.index += 1;
        self.stepping = true;
        let armed = match motion {
            Some(motion) => self.animator.start(motion, view.slots(), self.speed),
            None => false,
        };
        self.follow();
        if armed {
            StepOutcome::Advanced
        } else {
            self.after_advance()
        }
    }

    /// Apply the next event with its motion already settled
    fn apply_settled(&mut self) {
        let (Some(trace), Some(view)) = (&self.trace, &mut self.view) else {
            return;
        };
        let Some(event) = trace.get(self.index) else {
            return;
        };
        if let Some(motion) = view.apply(event, trace.nodes()) {
            self.animator.start(motion, view.slots(), self.speed);
            self.animator.settle();
        }
        self.index += 1;
    }

    fn after_advance(&mut self) -> StepOutcome {
        self.stepping = false;
        if self.index >= self.total() {
            self.finish();
            return StepOutcome::Finished;
        }
        if self.playing {
            self.delay.arm(self.speed.step_delay());
        }
        StepOutcome::Advanced
    }

    fn finish(&mut self) {
        self.delay.disarm();
        self.animator.settle();
        self.playing = false;
        self.stepping = false;
        self.phase = Phase::Complete;
        if let (Some(trace), Some(view)) = (&self.trace, &mut self.view) {
            view.finish(trace.nodes());
            info!(events = trace.len(), status = view.status(), "session complete");
        }
        self.focused = None;
        self.camera.retarget(self.overview());
    }

    /// Move the camera when the active node changes
    fn follow(&mut self) {
        let active = self.view.as_ref().and_then(Interpret::active_node);
        if active != self.focused {
            self.focused = active;
            self.camera.retarget(self.target_camera());
        }
    }

    fn target_camera(&self) -> Camera {
        if self.phase == Phase::Running && V::SCENE == Scene::Tree {
            if let Some(camera) = self.focused.and_then(|id| self.focus_on(id)) {
                return camera;
            }
        }
        self.overview()
    }

    fn focus_on(&self, id: NodeId) -> Option<Camera> {
        let node = self.layout.get(id)?;
        let depth = self.trace.as_ref()?.nodes().get(id)?.depth;
        Some(Camera::focus(node.cx, node.cy, depth))
    }

    /// Framing of the whole scene
    fn overview(&self) -> Camera {
        let bounds = match V::SCENE {
            Scene::Tree => self.layout.bounds(),
            Scene::Plane => self.view.as_ref().and_then(Interpret::extent),
            Scene::Bars => None,
        };
        match bounds {
            Some(bounds) => Camera::frame(bounds, self.viewport),
            None => Camera {
                x: self.viewport.width / 2.0,
                y: self.viewport.height / 2.0,
                scale: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input;
    use crate::primitives::Segment;
    use crate::replay::{KaratsubaView, RadixView, SegmentSweepView, SelectView};
    use crate::trace::karatsuba::KaratsubaBuilder;
    use crate::trace::radix::RadixBuilder;
    use crate::trace::segments::SegmentSweepBuilder;
    use crate::trace::select::SelectBuilder;

    const FRAME: Duration = Duration::from_millis(16);

    fn karatsuba() -> Session<KaratsubaView> {
        Session::new(input::example_operands(), KaratsubaBuilder, Speed::MAX)
    }

    fn radix() -> Session<RadixView> {
        Session::new(input::example_radix(), RadixBuilder, Speed::MAX)
    }

    /// Tick until the session stops changing or `limit` frames pass
    fn run_until_idle<V: Interpret>(session: &mut Session<V>, limit: usize) {
        for _ in 0..limit {
            if session.phase() != Phase::Running {
                return;
            }
            session.tick(FRAME);
        }
    }

    #[test]
    fn test_commands_before_start_are_ignored() {
        let mut s = karatsuba();
        assert!(matches!(s.step(), StepOutcome::Ignored(_)));
        assert!(matches!(s.play(), StepOutcome::Ignored(_)));
        assert!(matches!(s.jump_to_end(), StepOutcome::Ignored(_)));
        assert_eq!(s.phase(), Phase::Input);
        assert_eq!(s.start(), StepOutcome::Advanced);
        assert!(matches!(s.start(), StepOutcome::Ignored(_)));
    }

    #[test]
    fn test_step_applies_one_event() {
        let mut s = karatsuba();
        s.start();
        assert_eq!(s.index(), 0);
        s.step();
        assert_eq!(s.index(), 1);
        assert_eq!(s.last_kind(), Some("enter"));
    }

    #[test]
    fn test_step_blocked_while_motion_in_flight() {
        let mut s = radix();
        s.start();
        // start-pass, examine, then distribute arms a mote
        s.step();
        s.step();
        assert_eq!(s.step(), StepOutcome::Advanced);
        assert!(s.is_stepping());
        assert!(matches!(s.step(), StepOutcome::Ignored(_)));
        assert_eq!(s.index(), 3);
        s.settle();
        assert!(!s.is_stepping());
        assert_eq!(s.step(), StepOutcome::Advanced);
        assert_eq!(s.index(), 4);
    }

    #[test]
    fn test_step_ignored_while_playing() {
        let mut s = karatsuba();
        s.start();
        s.play();
        assert!(s.is_playing());
        assert!(matches!(s.step(), StepOutcome::Ignored(_)));
        assert!(matches!(s.play(), StepOutcome::Ignored(_)));
        s.pause();
        assert!(!s.is_playing());
        assert!(matches!(s.pause(), StepOutcome::Ignored(_)));
    }

    #[test]
    fn test_play_runs_to_completion() {
        let mut s = karatsuba();
        s.start();
        s.play();
        run_until_idle(&mut s, 100_000);
        assert_eq!(s.phase(), Phase::Complete);
        assert_eq!(s.index(), s.total());
        assert!(!s.is_playing());
        assert!(s.status().starts_with("Complete"));
    }

    #[test]
    fn test_pause_stops_the_delay() {
        let mut s = karatsuba();
        s.start();
        s.play();
        let applied = s.index();
        s.pause();
        for _ in 0..200 {
            s.tick(FRAME);
        }
        assert_eq!(s.index(), applied);
    }

    #[test]
    fn test_pause_during_last_motion_completes() {
        // The final stop sits far right, so its sweep tween is still running
        let segments = vec![
            Segment::horizontal(0, 0.0, 0.0, 10.0),
            Segment::vertical(1, 500.0, -5.0, 5.0),
        ];
        let mut s: Session<SegmentSweepView> =
            Session::new(segments, SegmentSweepBuilder, Speed::default());
        s.start();
        s.seek(s.total() - 1);
        assert_eq!(s.step(), StepOutcome::Advanced);
        assert!(s.is_stepping());
        assert_eq!(s.index(), s.total());
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.play(), StepOutcome::Advanced);
        assert_eq!(s.pause(), StepOutcome::Finished);
        assert_eq!(s.phase(), Phase::Complete);
        assert!(!s.is_playing());
        assert!(!s.is_stepping());
    }

    #[test]
    fn test_jump_to_end_matches_full_replay() {
        let mut s = radix();
        s.start();
        s.step();
        assert_eq!(s.jump_to_end(), StepOutcome::Finished);
        assert_eq!(s.phase(), Phase::Complete);
        let view = s.view().expect("view after start");
        assert!(view.is_sorted());
        let slots = view.slots().expect("bar view").to_vec();
        for (slot, &bar) in slots.iter().enumerate() {
            assert_eq!(s.animator().bar_position(bar), slot as f64);
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut s = karatsuba();
        s.start();
        s.step();
        s.reset();
        let first = (s.phase(), s.index(), s.total(), s.is_playing(), s.camera());
        s.reset();
        let second = (s.phase(), s.index(), s.total(), s.is_playing(), s.camera());
        assert_eq!(first, second);
        assert_eq!(first.0, Phase::Input);
        assert!(s.view().is_none());
    }

    #[test]
    fn test_step_back_replays_from_zero() {
        let mut s = karatsuba();
        s.start();
        for _ in 0..5 {
            s.step();
            s.settle();
        }
        let status_at_4 = {
            let mut other = karatsuba();
            other.start();
            other.seek(4);
            other.status().to_string()
        };
        assert_eq!(s.step_back(), StepOutcome::Advanced);
        assert_eq!(s.index(), 4);
        assert_eq!(s.status(), status_at_4);
    }

    #[test]
    fn test_empty_trace_completes_at_once() {
        let mut s: Session<RadixView> = Session::new(Vec::new(), RadixBuilder, Speed::default());
        assert_eq!(s.start(), StepOutcome::Finished);
        assert_eq!(s.phase(), Phase::Complete);
    }

    #[test]
    fn test_restart_rebuilds_trace() {
        let mut s = Session::<SelectView>::new(
            input::example_selection(),
            SelectBuilder::seeded(3),
            Speed::default(),
        );
        s.start();
        s.jump_to_end();
        assert_eq!(s.restart(), StepOutcome::Advanced);
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_camera_follows_active_node() {
        let mut s = karatsuba();
        s.start();
        let overview = s.camera();
        s.step();
        let root = s.layout().get(NodeId::ROOT).expect("root box");
        // Let the camera settle on the root without applying more events.
        for _ in 0..400 {
            s.camera.tick(FRAME);
        }
        assert_eq!(s.camera(), Camera::focus(root.cx, root.cy, 0));
        assert_ne!(s.camera(), overview);
    }
}
