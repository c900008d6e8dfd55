//! One enum over the six algorithm sessions
//!
//! The front-end and the headless printer talk to a [`Visualizer`] without
//! caring which algorithm is loaded; scene rendering matches on the variant to
//! reach the concrete view.

use std::io::{self, Write};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{Command, Config, Speed};
use crate::input::{self, random, InputError};
use crate::motion::Viewport;
use crate::playback::{Phase, Session, StepOutcome};
use crate::primitives::{Point, Segment};
use crate::replay::{
    KaratsubaView, MaximaDivideView, MaximaSweepView, RadixView, SegmentSweepView, SelectView,
};
use crate::snapshot::Frame;
use crate::trace::karatsuba::{KaratsubaBuilder, Operands};
use crate::trace::maxima_dc::MaximaDivideBuilder;
use crate::trace::maxima_sweep::MaximaSweepBuilder;
use crate::trace::radix::RadixBuilder;
use crate::trace::segments::SegmentSweepBuilder;
use crate::trace::select::{SelectBuilder, Selection};

/// Which algorithm to run, on what input
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Karatsuba(Operands),
    Select(Selection),
    Radix(Vec<u64>),
    Maxima { points: Vec<Point>, sweep: bool },
    Segments(Vec<Segment>),
}

impl Request {
    /// Resolve a subcommand into validated input. No subcommand runs the
    /// Karatsuba example; a subcommand without input runs its example.
    pub fn from_command(command: Option<&Command>, seed: u64) -> input::Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let Some(command) = command else {
            return Ok(Request::Karatsuba(input::example_operands()));
        };
        let request = match command {
            Command::Karatsuba { random: true, .. } => {
                Request::Karatsuba(random::operands(&mut rng))
            }
            Command::Karatsuba { x, y, .. } => match (x, y) {
                (Some(x), Some(y)) => Request::Karatsuba(input::parse_operands(x, y)?),
                (None, None) => Request::Karatsuba(input::example_operands()),
                (Some(_), None) => return Err(InputError::Empty("operand y")),
                (None, Some(_)) => return Err(InputError::Empty("operand x")),
            },
            Command::Select { random: true, .. } => Request::Select(random::selection(&mut rng)),
            Command::Select { array, k, .. } => Request::Select(selection(array.as_deref(), *k)?),
            Command::Radix { random: true, .. } => Request::Radix(random::radix(&mut rng)),
            Command::Radix { array, .. } => Request::Radix(match array {
                Some(array) => input::parse_radix(array)?,
                None => input::example_radix(),
            }),
            Command::Maxima {
                points,
                sweep,
                random,
            } => Request::Maxima {
                points: match (random, points) {
                    (true, _) => random::points(&mut rng),
                    (false, Some(points)) => input::parse_points(points)?,
                    (false, None) => input::example_points(),
                },
                sweep: *sweep,
            },
            Command::Segments { random: true, .. } => {
                Request::Segments(random::segments(&mut rng))
            }
            Command::Segments { segments, .. } => Request::Segments(match segments {
                Some(segments) => input::parse_segments(segments)?,
                None => input::example_segments(),
            }),
        };
        Ok(request)
    }
}

/// `k` defaults to 1; the example keeps its own `k` unless one is given
fn selection(array: Option<&str>, k: Option<usize>) -> input::Result<Selection> {
    match (array, k) {
        (Some(array), k) => input::parse_selection(array, k.unwrap_or(1)),
        (None, None) => Ok(input::example_selection()),
        (None, Some(k)) => {
            let mut example = input::example_selection();
            if k == 0 || k > example.values.len() {
                return Err(InputError::KOutOfRange {
                    k,
                    len: example.values.len(),
                });
            }
            example.k = k;
            Ok(example)
        }
    }
}

pub enum Visualizer {
    Karatsuba(Session<KaratsubaView>),
    Select(Session<SelectView>),
    Radix(Session<RadixView>),
    MaximaDivide(Session<MaximaDivideView>),
    MaximaSweep(Session<MaximaSweepView>),
    Segments(Session<SegmentSweepView>),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Visualizer::Karatsuba($s) => $body,
            Visualizer::Select($s) => $body,
            Visualizer::Radix($s) => $body,
            Visualizer::MaximaDivide($s) => $body,
            Visualizer::MaximaSweep($s) => $body,
            Visualizer::Segments($s) => $body,
        }
    };
}

impl Visualizer {
    pub fn new(request: Request, config: &Config) -> Self {
        let speed = config.speed;
        match request {
            Request::Karatsuba(ops) => {
                Visualizer::Karatsuba(Session::new(ops, KaratsubaBuilder, speed))
            }
            Request::Select(sel) => Visualizer::Select(Session::new(
                sel,
                SelectBuilder::seeded(config.seed),
                speed,
            )),
            Request::Radix(values) => Visualizer::Radix(Session::new(values, RadixBuilder, speed)),
            Request::Maxima {
                points,
                sweep: false,
            } => Visualizer::MaximaDivide(Session::new(points, MaximaDivideBuilder, speed)),
            Request::Maxima { points, sweep: true } => {
                Visualizer::MaximaSweep(Session::new(points, MaximaSweepBuilder, speed))
            }
            Request::Segments(segments) => {
                Visualizer::Segments(Session::new(segments, SegmentSweepBuilder, speed))
            }
        }
    }

    /// Short name used in titles and logs
    pub fn name(&self) -> &'static str {
        match self {
            Visualizer::Karatsuba(_) => "karatsuba",
            Visualizer::Select(_) => "select",
            Visualizer::Radix(_) => "radix",
            Visualizer::MaximaDivide(_) => "maxima (divide & conquer)",
            Visualizer::MaximaSweep(_) => "maxima (sweep)",
            Visualizer::Segments(_) => "segment intersections",
        }
    }

    pub fn frame(&self) -> Frame {
        let name = self.name();
        dispatch!(self, s => Frame::capture(name, s))
    }

    pub fn phase(&self) -> Phase {
        dispatch!(self, s => s.phase())
    }

    pub fn speed(&self) -> Speed {
        dispatch!(self, s => s.speed())
    }

    pub fn start(&mut self) -> StepOutcome {
        dispatch!(self, s => s.start())
    }

    pub fn step(&mut self) -> StepOutcome {
        dispatch!(self, s => s.step())
    }

    pub fn step_back(&mut self) -> StepOutcome {
        dispatch!(self, s => s.step_back())
    }

    pub fn toggle(&mut self) -> StepOutcome {
        dispatch!(self, s => s.toggle())
    }

    pub fn settle(&mut self) -> StepOutcome {
        dispatch!(self, s => s.settle())
    }

    pub fn jump_to_end(&mut self) -> StepOutcome {
        dispatch!(self, s => s.jump_to_end())
    }

    pub fn reset(&mut self) -> StepOutcome {
        dispatch!(self, s => s.reset())
    }

    pub fn restart(&mut self) -> StepOutcome {
        dispatch!(self, s => s.restart())
    }

    pub fn tick(&mut self, dt: Duration) -> StepOutcome {
        dispatch!(self, s => s.tick(dt))
    }

    pub fn set_speed(&mut self, speed: Speed) {
        dispatch!(self, s => s.set_speed(speed))
    }

    pub fn resize(&mut self, viewport: Viewport) {
        dispatch!(self, s => s.resize(viewport))
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        dispatch!(self, s => s.pan(dx, dy))
    }

    pub fn zoom(&mut self, factor: f64) {
        dispatch!(self, s => s.zoom(factor))
    }

    /// Build and replay the whole trace, writing one status line per event
    pub fn print_all(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.reset();
        self.start();
        writeln!(out, "{}", self.frame())?;
        while self.phase() == Phase::Running {
            if let StepOutcome::Ignored(_) = self.step() {
                break;
            }
            self.settle();
            writeln!(out, "{}", self.frame())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            seed: 42,
            ..Config::default()
        }
    }

    #[test]
    fn test_no_command_runs_karatsuba_example() {
        let request = Request::from_command(None, 0).expect("example");
        assert_eq!(request, Request::Karatsuba(input::example_operands()));
    }

    #[test]
    fn test_select_example_takes_given_k() {
        let cmd = Command::Select {
            array: None,
            k: Some(5),
            random: false,
        };
        match Request::from_command(Some(&cmd), 0) {
            Ok(Request::Select(sel)) => assert_eq!(sel.k, 5),
            other => panic!("Expected selection, got {:?}", other),
        }
        let bad = Command::Select {
            array: None,
            k: Some(8),
            random: false,
        };
        assert!(Request::from_command(Some(&bad), 0).is_err());
    }

    #[test]
    fn test_random_requests_repeat_with_seed() {
        let cmd = Command::Maxima {
            points: None,
            sweep: true,
            random: true,
        };
        let a = Request::from_command(Some(&cmd), 9).expect("random");
        let b = Request::from_command(Some(&cmd), 9).expect("random");
        assert_eq!(a, b);
    }

    #[test]
    fn test_half_given_operands_are_rejected() {
        let cmd = Command::Karatsuba {
            x: Some("12".into()),
            y: None,
            random: false,
        };
        assert_eq!(
            Request::from_command(Some(&cmd), 0),
            Err(InputError::Empty("operand y"))
        );
    }

    #[test]
    fn test_print_all_ends_with_answer() {
        let mut vis = Visualizer::new(Request::Select(input::example_selection()), &config());
        let mut out = Vec::new();
        vis.print_all(&mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        let last = text.lines().last().expect("at least one line");
        assert!(last.ends_with("The 3rd smallest element is 3"), "{}", last);
        assert_eq!(vis.phase(), Phase::Complete);
    }

    #[test]
    fn test_every_variant_runs_to_completion() {
        let requests = [
            Request::Karatsuba(input::example_operands()),
            Request::Select(input::example_selection()),
            Request::Radix(input::example_radix()),
            Request::Maxima {
                points: input::example_points(),
                sweep: false,
            },
            Request::Maxima {
                points: input::example_points(),
                sweep: true,
            },
            Request::Segments(input::example_segments()),
        ];
        for request in requests {
            let mut vis = Visualizer::new(request, &config());
            vis.start();
            assert_eq!(vis.jump_to_end(), StepOutcome::Finished, "{}", vis.name());
            let frame = vis.frame();
            assert_eq!(frame.index, frame.total);
            assert!(
                frame.status.to_lowercase().contains("complete"),
                "{}",
                frame.status
            );
        }
    }
}
