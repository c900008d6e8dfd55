// algoscope: step-by-step algorithm visualizer

use std::io;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use thiserror::Error;
use tracing::{error, info};

use algoscope::config::{Cli, Config};
use algoscope::input::InputError;
use algoscope::logging::{self, Sink};
use algoscope::ui::App;
use algoscope::visualizer::{Request, Visualizer};

#[derive(Debug, Error)]
enum AppError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "exiting");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let sink = match (&config.log_file, config.print) {
        (_, true) => Sink::Stderr,
        (Some(path), false) => Sink::File(path),
        (None, false) => Sink::Off,
    };
    logging::init(sink)?;

    let request = Request::from_command(cli.command.as_ref(), config.seed)?;
    let mut visualizer = Visualizer::new(request, config);
    info!(
        algorithm = visualizer.name(),
        seed = config.seed,
        speed = config.speed.get(),
        "loaded"
    );

    if config.print {
        let stdout = io::stdout();
        return Ok(visualizer.print_all(&mut stdout.lock())?);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(visualizer, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(res?)
}
