//! Pivot rank counting for order-statistic selection

/// Number of values strictly below `pivot`
pub fn less_count(values: impl IntoIterator<Item = f64>, pivot: f64) -> usize {
    values.into_iter().filter(|&v| v < pivot).count()
}

/// Inclusive rank window `[⌊n/4⌋, n-1-⌊n/4⌋]` a good splitter must land in
pub fn splitter_bounds(range_size: usize) -> (usize, usize) {
    let lower = range_size / 4;
    let upper = range_size.saturating_sub(1).saturating_sub(lower);
    (lower, upper)
}

/// Ranges of three or fewer accept any pivot
pub fn is_good_splitter(rank: usize, range_size: usize) -> bool {
    if range_size <= 3 {
        return true;
    }
    let (lower, upper) = splitter_bounds(range_size);
    (lower..=upper).contains(&rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_less_count_ignores_equal_values() {
        assert_eq!(less_count([7.0, 2.0, 5.0, 5.0, 8.0], 5.0), 1);
        assert_eq!(less_count(Vec::<f64>::new(), 1.0), 0);
    }

    #[test]
    fn test_splitter_window() {
        assert_eq!(splitter_bounds(7), (1, 5));
        assert_eq!(splitter_bounds(8), (2, 5));
        assert!(!is_good_splitter(0, 8));
        assert!(is_good_splitter(2, 8));
        assert!(is_good_splitter(5, 8));
        assert!(!is_good_splitter(6, 8));
    }

    #[test]
    fn test_small_ranges_accept_everything() {
        for rank in 0..3 {
            assert!(is_good_splitter(rank, 3));
        }
    }
}
