//! Seeded random inputs
//!
//! Every generator takes the RNG by reference so one `--seed` reproduces the
//! input and the selection pivots together.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::primitives::{Point, Segment};
use crate::trace::karatsuba::Operands;
use crate::trace::select::Selection;

/// Plane the random points and segments are drawn in
pub const FIELD_WIDTH: f64 = 600.0;
pub const FIELD_HEIGHT: f64 = 400.0;

const FIELD_MARGIN: f64 = 30.0;
const POINT_COUNT: usize = 14;
const MIN_POINT_GAP: f64 = 18.0;
const PLACEMENT_ATTEMPTS: usize = 2000;

fn coordinate(rng: &mut SmallRng, extent: f64) -> f64 {
    rng.random_range(FIELD_MARGIN..=extent - FIELD_MARGIN).round()
}

/// Two operands of 2 to 8 digits
pub fn operands(rng: &mut SmallRng) -> Operands {
    let digits = |rng: &mut SmallRng| {
        let len = rng.random_range(2..=8u32);
        rng.random_range(10u64.pow(len - 1)..10u64.pow(len)).to_string()
    };
    let x = digits(rng);
    let y = digits(rng);
    Operands::new(x, y)
}

/// 8 to 12 distinct values in `1..=50` and a random `k`
pub fn selection(rng: &mut SmallRng) -> Selection {
    let n = rng.random_range(8..=12);
    let mut pool: Vec<u32> = (1..=50).collect();
    pool.shuffle(rng);
    let values = pool[..n].iter().map(|&v| f64::from(v)).collect();
    let k = rng.random_range(1..=n);
    Selection { values, k }
}

/// 8 to 12 values in `1..=999`
pub fn radix(rng: &mut SmallRng) -> Vec<u64> {
    let n = rng.random_range(8..=12);
    (0..n).map(|_| rng.random_range(1..=999)).collect()
}

/// Up to 14 points kept at least 18 units apart
pub fn points(rng: &mut SmallRng) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::with_capacity(POINT_COUNT);
    let mut attempts = 0;
    while points.len() < POINT_COUNT && attempts < PLACEMENT_ATTEMPTS {
        attempts += 1;
        let x = coordinate(rng, FIELD_WIDTH);
        let y = coordinate(rng, FIELD_HEIGHT);
        let crowded = points.iter().any(|p| {
            let (dx, dy) = (p.x - x, p.y - y);
            dx * dx + dy * dy < MIN_POINT_GAP * MIN_POINT_GAP
        });
        if !crowded {
            points.push(Point::new(points.len(), x, y));
        }
    }
    points
}

/// Four to six horizontals and three to four verticals
pub fn segments(rng: &mut SmallRng) -> Vec<Segment> {
    let horizontals = rng.random_range(4..=6);
    let verticals = rng.random_range(3..=4);
    let mut segments = Vec::with_capacity(horizontals + verticals);
    for _ in 0..horizontals {
        let y = coordinate(rng, FIELD_HEIGHT);
        let a = coordinate(rng, FIELD_WIDTH);
        let b = coordinate(rng, FIELD_WIDTH);
        segments.push(Segment::horizontal(segments.len(), y, a, b));
    }
    for _ in 0..verticals {
        let x = coordinate(rng, FIELD_WIDTH);
        let a = coordinate(rng, FIELD_HEIGHT);
        let b = coordinate(rng, FIELD_HEIGHT);
        segments.push(Segment::vertical(segments.len(), x, a, b));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn test_selection_is_distinct_with_valid_k() {
        for seed in 0..20 {
            let sel = selection(&mut rng(seed));
            assert!((8..=12).contains(&sel.values.len()));
            assert!(sel.k >= 1 && sel.k <= sel.values.len());
            let mut sorted = sel.values.clone();
            sorted.sort_by(f64::total_cmp);
            sorted.dedup();
            assert_eq!(sorted.len(), sel.values.len());
        }
    }

    #[test]
    fn test_radix_values_in_range() {
        let values = radix(&mut rng(3));
        assert!((8..=12).contains(&values.len()));
        assert!(values.iter().all(|v| (1..=999).contains(v)));
    }

    #[test]
    fn test_points_keep_their_distance() {
        let pts = points(&mut rng(11));
        assert!(!pts.is_empty());
        for (i, a) in pts.iter().enumerate() {
            assert_eq!(a.id, i);
            for b in &pts[i + 1..] {
                assert!((a.x - b.x).hypot(a.y - b.y) >= MIN_POINT_GAP);
            }
        }
    }

    #[test]
    fn test_same_seed_same_input() {
        assert_eq!(operands(&mut rng(5)), operands(&mut rng(5)));
        assert_eq!(segments(&mut rng(5)), segments(&mut rng(5)));
        let ops = operands(&mut rng(9));
        assert!(!ops.x.starts_with('0') && ops.x.len() >= 2);
    }
}
