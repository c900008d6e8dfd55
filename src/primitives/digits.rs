//! Decimal digit helpers for radix sort and digit-string arithmetic

/// Number of buckets used by the decimal radix sort
pub const RADIX: usize = 10;

/// Digit of `value` at decimal position `pos` (0 = ones)
pub fn digit_at(value: u64, pos: u32) -> u8 {
    match 10u64.checked_pow(pos) {
        Some(scale) => ((value / scale) % 10) as u8,
        None => 0,
    }
}

/// Decimal digit count; `0` counts as one digit
pub fn num_digits(value: u64) -> u32 {
    if value == 0 {
        1
    } else {
        value.ilog10() + 1
    }
}

/// Stable grouping of `(id, value)` items into ten buckets by the digit at `pos`
pub fn bucket_by_digit<I>(items: I, pos: u32) -> [Vec<(usize, u64)>; RADIX]
where
    I: IntoIterator<Item = (usize, u64)>,
{
    let mut buckets: [Vec<(usize, u64)>; RADIX] = Default::default();
    for (id, value) in items {
        buckets[digit_at(value, pos) as usize].push((id, value));
    }
    buckets
}

/// Human-readable name of a digit position
pub fn position_label(pos: u32) -> String {
    match pos {
        0 => "ones".to_string(),
        1 => "tens".to_string(),
        2 => "hundreds".to_string(),
        3 => "thousands".to_string(),
        4 => "ten-thousands".to_string(),
        _ => format!("10^{}", pos),
    }
}

/// Left-pad the shorter of two digit strings with zeros
pub fn pad_to_equal(a: &str, b: &str) -> (String, String) {
    let width = a.len().max(b.len());
    (format!("{:0>width$}", a), format!("{:0>width$}", b))
}

/// Strip leading zeros, keeping a single `0` for an all-zero string
pub fn trim_zeros(s: &str) -> &str {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Value of a validated decimal digit string
pub fn digits_value(s: &str) -> u128 {
    s.bytes()
        .fold(0u128, |acc, b| acc * 10 + u128::from(b.wrapping_sub(b'0')))
}

/// English ordinal suffix (`1st`, `2nd`, `11th`, ...)
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
