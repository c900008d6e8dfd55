//! tracing subscriber setup for the binary

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "ALGOSCOPE_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Where log lines go
#[derive(Debug, Clone, Copy)]
pub enum Sink<'a> {
    /// Headless runs own stderr
    Stderr,
    /// The terminal UI owns the screen, so logs go to a file
    File(&'a Path),
    Off,
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(sink: Sink<'_>) -> io::Result<()> {
    match sink {
        Sink::Off => {}
        Sink::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(io::stderr)
                .with_target(false)
                .try_init();
        }
        Sink::File(path) => {
            let file = File::create(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
    }
    Ok(())
}
