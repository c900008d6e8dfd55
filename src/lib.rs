//! # Introduction
//!
//! algoscope runs a textbook algorithm on a small input, records every
//! decision it makes as an event log, and replays that log step by step in a
//! terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Input → Builder → Trace (events + node registry) → Interpreter view → Animator → TUI
//! ```
//!
//! 1. [`input`]: parsing, validation, worked examples and random inputs.
//! 2. [`trace`]: one builder per algorithm, running it to completion and
//!    emitting a flat event log plus an arena of recursion nodes.
//! 3. [`replay`]: deterministic reducers that fold a prefix of the log into
//!    display state. Stepping backward is replaying a shorter prefix.
//! 4. [`motion`]: camera, layout, and the eased tweens that start after each
//!    event is applied.
//! 5. [`playback`]: the session state machine (step, play, pause, reset).
//! 6. [`snapshot`]: the algorithm-independent frame the front-end pulls.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Algorithms
//!
//! Karatsuba multiplication, randomized selection with the good-splitter
//! rule, LSD radix sort, 2-D maxima by divide & conquer and by sweep, and
//! the horizontal/vertical segment intersection sweep.

pub mod config;
pub mod input;
pub mod logging;
pub mod motion;
pub mod playback;
pub mod primitives;
pub mod replay;
pub mod snapshot;
pub mod trace;
pub mod ui;
pub mod visualizer;
