//! Free-text input for every algorithm
//!
//! - [`parse`]: validation of user text into builder inputs
//! - [`random`]: seeded random inputs
//!
//! The built-in examples live here. Builders only ever see values that came
//! through this module.

pub mod parse;
pub mod random;

use thiserror::Error;

use crate::primitives::{Point, Segment};
use crate::trace::karatsuba::Operands;
use crate::trace::select::Selection;

pub use parse::{parse_operands, parse_points, parse_radix, parse_segments, parse_selection};

/// Fewest and most elements accepted for selection and radix arrays
pub const MIN_ELEMENTS: usize = 2;
pub const MAX_ELEMENTS: usize = 20;

/// Longest operand whose product still fits in a `u128`
pub const MAX_OPERAND_DIGITS: usize = 18;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("`{token}` is not a number")]
    NotANumber { token: String },

    #[error("expected {min} to {max} values, got {got}")]
    Count { min: usize, max: usize, got: usize },

    #[error("value {value} appears more than once; selection needs distinct values")]
    Repeated { value: f64 },

    #[error("k must be between 1 and {len}, got {k}")]
    KOutOfRange { k: usize, len: usize },

    #[error("operand {which} must be a positive integer")]
    ZeroOperand { which: char },

    #[error("operand {which} has {digits} digits, at most {max} allowed")]
    OperandTooLong {
        which: char,
        digits: usize,
        max: usize,
    },

    #[error("radix sort needs non-negative integers, got `{token}`")]
    NotNonNegativeInteger { token: String },

    #[error("malformed point `{0}`, expected `x,y`")]
    MalformedPoint(String),

    #[error("malformed segment `{0}`, expected `h:y,x1,x2` or `v:x,y1,y2`")]
    MalformedSegment(String),

    #[error("no {0} given")]
    Empty(&'static str),
}

pub type Result<T> = std::result::Result<T, InputError>;

pub fn example_operands() -> Operands {
    Operands::new("1234", "5678")
}

pub fn example_selection() -> Selection {
    Selection {
        values: vec![7.0, 2.0, 5.0, 1.0, 8.0, 3.0, 6.0],
        k: 3,
    }
}

pub fn example_radix() -> Vec<u64> {
    vec![170, 45, 75, 90, 802, 24, 2, 66]
}

/// Twelve points drifting up and to the right, two pairs sharing an x
pub fn example_points() -> Vec<Point> {
    const SAMPLE: [(f64, f64); 12] = [
        (10.0, 20.0),
        (18.0, 46.0),
        (26.0, 28.0),
        (34.0, 62.0),
        (45.0, 40.0),
        (56.0, 72.0),
        (64.0, 55.0),
        (64.0, 67.0),
        (74.0, 79.0),
        (82.0, 63.0),
        (90.0, 88.0),
        (90.0, 71.0),
    ];
    SAMPLE
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| Point::new(id, x, y))
        .collect()
}

/// Five horizontals crossed by three verticals
pub fn example_segments() -> Vec<Segment> {
    vec![
        Segment::horizontal(0, 80.0, 80.0, 520.0),
        Segment::horizontal(1, 180.0, 150.0, 650.0),
        Segment::horizontal(2, 280.0, 50.0, 400.0),
        Segment::horizontal(3, 350.0, 250.0, 700.0),
        Segment::horizontal(4, 430.0, 100.0, 550.0),
        Segment::vertical(5, 200.0, 50.0, 460.0),
        Segment::vertical(6, 380.0, 120.0, 400.0),
        Segment::vertical(7, 550.0, 60.0, 480.0),
    ]
}
