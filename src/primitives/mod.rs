//! Pure helpers shared by the trace builders and interpreters
//!
//! - [`geometry`]: points, axis-aligned segments, dominance and brute-force references
//! - [`digits`]: decimal digit extraction and bucket grouping
//! - [`rank`]: pivot rank counting and the good-splitter window
//!
//! Nothing in this module holds state.

pub mod digits;
pub mod geometry;
pub mod rank;

pub use digits::{bucket_by_digit, digit_at, num_digits};
pub use geometry::{dominates, Point, PointId, Segment, SegmentId, EPS};
pub use rank::{is_good_splitter, less_count, splitter_bounds};
