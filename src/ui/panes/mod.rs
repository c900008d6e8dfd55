//! TUI pane rendering modules
//!
//! - [`scene`]: braille canvas with the recursion tree, the bars, or the plane
//! - [`inspector`]: per-algorithm numbers (split halves, round history, active set)
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane exports a stateless `render_*` function over a
//! [`Visualizer`](crate::visualizer::Visualizer) or a snapshot.

pub mod inspector;
pub mod scene;
pub mod status;

pub use inspector::render_inspector_pane;
pub use scene::{camera_area, render_scene_pane, viewport_for};
pub use status::render_status_bar;
