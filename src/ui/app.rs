//! Main TUI application state and logic

use crate::config::Config;
use crate::playback::{Phase, StepOutcome};
use crate::visualizer::Visualizer;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

/// Screen-space distance of one pan keypress
const PAN_STEP: f64 = 40.0;

/// Zoom factor of one zoom keypress
const ZOOM_STEP: f64 = 1.2;

/// The main application state
pub struct App {
    /// The loaded algorithm session
    pub visualizer: Visualizer,

    /// Interval between clock ticks
    pub tick: Duration,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Reason the last command was ignored, shown until the next keypress
    pub notice: Option<&'static str>,
}

impl App {
    pub fn new(visualizer: Visualizer, config: &Config) -> Self {
        App {
            visualizer,
            tick: config.tick,
            should_quit: false,
            notice: None,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut last_tick = Instant::now();
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            let timeout = self.tick.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            let elapsed = last_tick.elapsed();
            if elapsed >= self.tick {
                last_tick = Instant::now();
                if self.visualizer.tick(elapsed) == StepOutcome::Finished {
                    debug!(algorithm = self.visualizer.name(), "playback finished");
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[0]);

        let camera_area = super::panes::camera_area(columns[0], &self.visualizer);
        self.visualizer
            .resize(super::panes::viewport_for(camera_area));

        super::panes::render_scene_pane(frame, columns[0], &self.visualizer);
        super::panes::render_inspector_pane(frame, columns[1], &self.visualizer);
        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.visualizer.frame(),
            self.notice,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        self.notice = None;
        let outcome = match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Enter => match self.visualizer.phase() {
                Phase::Input => self.visualizer.start(),
                _ => self.visualizer.jump_to_end(),
            },
            KeyCode::Right => self.visualizer.step(),
            KeyCode::Left => self.visualizer.step_back(),
            KeyCode::Char(' ') => self.visualizer.toggle(),
            KeyCode::Backspace | KeyCode::Char('r') => self.visualizer.reset(),
            KeyCode::Char('s') => self.visualizer.restart(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = self.visualizer.speed().faster();
                self.visualizer.set_speed(speed);
                return;
            }
            KeyCode::Char('-') => {
                let speed = self.visualizer.speed().slower();
                self.visualizer.set_speed(speed);
                return;
            }
            KeyCode::Char('h') => return self.visualizer.pan(PAN_STEP, 0.0),
            KeyCode::Char('l') => return self.visualizer.pan(-PAN_STEP, 0.0),
            KeyCode::Char('k') => return self.visualizer.pan(0.0, PAN_STEP),
            KeyCode::Char('j') => return self.visualizer.pan(0.0, -PAN_STEP),
            KeyCode::Char('z') => return self.visualizer.zoom(ZOOM_STEP),
            KeyCode::Char('x') => return self.visualizer.zoom(1.0 / ZOOM_STEP),
            _ => return,
        };
        if let StepOutcome::Ignored(reason) = outcome {
            debug!(key = ?key.code, reason, "command ignored");
            self.notice = Some(reason);
        } else {
            debug!(key = ?key.code, phase = self.visualizer.frame().phase_label(), "command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input;
    use crate::visualizer::Request;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(request: Request) -> App {
        let config = Config::default();
        App::new(Visualizer::new(request, &config), &config)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_starts_then_jumps_to_end() {
        let mut app = app(Request::Radix(input::example_radix()));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.visualizer.phase(), Phase::Running);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.visualizer.phase(), Phase::Complete);
        let frame = app.visualizer.frame();
        assert_eq!(frame.index, frame.total);
    }

    #[test]
    fn test_ignored_step_sets_notice() {
        let mut app = app(Request::Select(input::example_selection()));
        press(&mut app, KeyCode::Right);
        assert!(app.notice.is_some());
        press(&mut app, KeyCode::Enter);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_speed_keys_clamp() {
        let mut app = app(Request::Radix(input::example_radix()));
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.visualizer.speed().get(), 10);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.visualizer.speed().get(), 1);
    }

    #[test]
    fn test_quit_key() {
        let mut app = app(Request::Karatsuba(input::example_operands()));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_every_scene_renders() {
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
            let mut app = app(request);
            let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("test backend");
            terminal.draw(|f| app.render(f)).expect("draw input phase");
            press(&mut app, KeyCode::Enter);
            for _ in 0..5 {
                press(&mut app, KeyCode::Right);
                app.visualizer.settle();
            }
            terminal.draw(|f| app.render(f)).expect("draw mid-run");
            press(&mut app, KeyCode::Enter);
            terminal.draw(|f| app.render(f)).expect("draw complete");
        }
    }
}
