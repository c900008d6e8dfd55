//! Command line and presentation settings

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// Base step delay at speed 1
const STEP_DELAY_MS: u64 = 1200;

/// Playback dial, 1 (slowest) through 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(10);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Speed(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn faster(self) -> Self {
        Speed((self.0 + 1).min(Self::MAX.0))
    }

    pub fn slower(self) -> Self {
        Speed(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    /// Pause between events during continuous play
    pub fn step_delay(self) -> Duration {
        Duration::from_millis(STEP_DELAY_MS / u64::from(self.0))
    }

    /// Bars gliding to new slots
    pub fn reslot_duration(self) -> Duration {
        Duration::from_millis((600 / u64::from(self.0)).max(200))
    }

    /// A bar flying into its bucket
    pub fn mote_duration(self) -> Duration {
        Duration::from_millis((400 / u64::from(self.0)).max(150))
    }

    /// Sweep line covering `dist` world units
    pub fn sweep_duration(self, dist: f64) -> Duration {
        let ms = (dist.abs() * 2.5 / f64::from(self.0)).min(400.0);
        Duration::from_secs_f64(ms / 1000.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(5)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "algoscope",
    about = "Step through textbook algorithms one recorded event at a time",
    version
)]
pub struct Cli {
    /// Playback speed, 1 (slow) to 10 (fast)
    #[arg(long, global = true, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub speed: u8,

    /// Seed for pivot sampling and random inputs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Redraw cadence in milliseconds
    #[arg(long, global = true, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub tick_ms: u64,

    /// Write logs to this file while the terminal UI is running
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Replay the whole trace without a UI, printing each status line
    #[arg(long, global = true)]
    pub print: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Karatsuba multiplication of two positive integers
    Karatsuba {
        x: Option<String>,
        y: Option<String>,
        #[arg(long)]
        random: bool,
    },

    /// k-th smallest element with good-splitter pivots
    Select {
        /// Comma or space separated numbers
        array: Option<String>,
        #[arg(short)]
        k: Option<usize>,
        #[arg(long)]
        random: bool,
    },

    /// Least-significant-digit radix sort
    Radix {
        /// Comma or space separated non-negative integers
        array: Option<String>,
        #[arg(long)]
        random: bool,
    },

    /// Maximal points of a planar set
    Maxima {
        /// Points as `x,y` pairs separated by `;`
        points: Option<String>,
        /// Use the right-to-left sweep instead of divide and conquer
        #[arg(long)]
        sweep: bool,
        #[arg(long)]
        random: bool,
    },

    /// Orthogonal segment intersections by sweep line
    Segments {
        /// Segments as `h:y,x1,x2` or `v:x,y1,y2` separated by `;`
        segments: Option<String>,
        #[arg(long)]
        random: bool,
    },
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Config {
    pub speed: Speed,
    pub seed: u64,
    pub tick: Duration,
    pub log_file: Option<PathBuf>,
    pub print: bool,
}

impl Config {
    /// Settings from parsed flags; a missing seed is drawn at random
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            speed: Speed::new(cli.speed).unwrap_or_default(),
            seed: cli.seed.unwrap_or_else(rand::random),
            tick: Duration::from_millis(cli.tick_ms),
            log_file: cli.log_file.clone(),
            print: cli.print,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            speed: Speed::default(),
            seed: 0,
            tick: Duration::from_millis(16),
            log_file: None,
            print: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_bounds() {
        assert_eq!(Speed::new(0), None);
        assert_eq!(Speed::new(11), None);
        assert_eq!(Speed::MAX.faster(), Speed::MAX);
        assert_eq!(Speed::MIN.slower(), Speed::MIN);
        assert_eq!(Speed::default().faster().get(), 6);
    }

    #[test]
    fn test_speed_durations() {
        let slow = Speed::MIN;
        let fast = Speed::MAX;
        assert_eq!(slow.step_delay(), Duration::from_millis(1200));
        assert_eq!(fast.step_delay(), Duration::from_millis(120));
        assert_eq!(slow.reslot_duration(), Duration::from_millis(600));
        assert_eq!(fast.reslot_duration(), Duration::from_millis(200));
        assert_eq!(slow.mote_duration(), Duration::from_millis(400));
        assert_eq!(fast.mote_duration(), Duration::from_millis(150));
        assert_eq!(slow.sweep_duration(1000.0), Duration::from_millis(400));
        assert_eq!(fast.sweep_duration(40.0), Duration::from_millis(10));
    }

    #[test]
    fn test_cli_parses_subcommand_and_globals() {
        let cli = Cli::try_parse_from([
            "algoscope", "select", "7,2,5", "-k", "2", "--speed", "9", "--seed", "4",
        ])
        .expect("valid command line");
        assert_eq!(cli.speed, 9);
        assert_eq!(cli.seed, Some(4));
        match cli.command {
            Some(Command::Select { array, k, random }) => {
                assert_eq!(array.as_deref(), Some("7,2,5"));
                assert_eq!(k, Some(2));
                assert!(!random);
            }
            other => panic!("Expected select, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["algoscope", "--speed", "11"]).is_err());
    }

    #[test]
    fn test_config_keeps_given_seed() {
        let cli = Cli::try_parse_from(["algoscope", "--seed", "77"]).expect("valid");
        let config = Config::from_cli(&cli);
        assert_eq!(config.seed, 77);
        assert_eq!(config.speed, Speed::default());
    }
}
