//! Text to validated builder input

use super::{InputError, Result, MAX_ELEMENTS, MAX_OPERAND_DIGITS, MIN_ELEMENTS};
use crate::primitives::digits::trim_zeros;
use crate::primitives::{Point, Segment};
use crate::trace::karatsuba::Operands;
use crate::trace::select::Selection;

/// Split on commas and whitespace, dropping empty pieces
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

fn number(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NotANumber {
            token: token.to_string(),
        })
}

fn check_count(got: usize) -> Result<()> {
    if (MIN_ELEMENTS..=MAX_ELEMENTS).contains(&got) {
        Ok(())
    } else {
        Err(InputError::Count {
            min: MIN_ELEMENTS,
            max: MAX_ELEMENTS,
            got,
        })
    }
}

fn operand(text: &str, which: char) -> Result<String> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotANumber {
            token: text.to_string(),
        });
    }
    let digits = trim_zeros(text);
    if digits == "0" {
        return Err(InputError::ZeroOperand { which });
    }
    if digits.len() > MAX_OPERAND_DIGITS {
        return Err(InputError::OperandTooLong {
            which,
            digits: digits.len(),
            max: MAX_OPERAND_DIGITS,
        });
    }
    Ok(digits.to_string())
}

/// Two positive decimal integers; leading zeros are dropped
pub fn parse_operands(x: &str, y: &str) -> Result<Operands> {
    Ok(Operands::new(operand(x, 'x')?, operand(y, 'y')?))
}

/// 2 to 20 distinct finite numbers and a 1-based `k` no larger than their count
pub fn parse_selection(array: &str, k: usize) -> Result<Selection> {
    let values = tokens(array).map(number).collect::<Result<Vec<_>>>()?;
    check_count(values.len())?;
    if k == 0 || k > values.len() {
        return Err(InputError::KOutOfRange {
            k,
            len: values.len(),
        });
    }
    let selection = Selection { values, k };
    if let Some(value) = selection.first_repeat() {
        return Err(InputError::Repeated { value });
    }
    Ok(selection)
}

/// 2 to 20 non-negative integers
pub fn parse_radix(array: &str) -> Result<Vec<u64>> {
    let values = tokens(array)
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|_| InputError::NotNonNegativeInteger {
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    check_count(values.len())?;
    Ok(values)
}

/// `x,y` pairs separated by `;`, ids assigned in order
pub fn parse_points(text: &str) -> Result<Vec<Point>> {
    let points = text
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(id, pair)| {
            let coords: Vec<&str> = tokens(pair).collect();
            match coords.as_slice() {
                [x, y] => Ok(Point::new(id, number(x)?, number(y)?)),
                _ => Err(InputError::MalformedPoint(pair.to_string())),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    if points.is_empty() {
        return Err(InputError::Empty("points"));
    }
    Ok(points)
}

/// `h:y,x1,x2` and `v:x,y1,y2` entries separated by `;`
pub fn parse_segments(text: &str) -> Result<Vec<Segment>> {
    let segments = text
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(id, entry)| {
            let malformed = || InputError::MalformedSegment(entry.to_string());
            let (kind, rest) = entry.split_once(':').ok_or_else(malformed)?;
            let nums = tokens(rest).map(number).collect::<Result<Vec<_>>>()?;
            let [a, b, c] = nums.as_slice() else {
                return Err(malformed());
            };
            match kind.trim().to_ascii_lowercase().as_str() {
                "h" => Ok(Segment::horizontal(id, *a, *b, *c)),
                "v" => Ok(Segment::vertical(id, *a, *b, *c)),
                _ => Err(malformed()),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    if segments.is_empty() {
        return Err(InputError::Empty("segments"));
    }
    Ok(segments)
}
