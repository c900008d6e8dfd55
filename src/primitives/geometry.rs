//! Points, segments and the dominance relation

use std::cmp::Ordering;

/// Tolerance used when grouping points that share an x coordinate
pub const EPS: f64 = 1e-9;

/// Folds `-0.0` into `0.0` so ordered keys agree with `==`
pub fn unsigned_zero(v: f64) -> f64 {
    v + 0.0
}

/// Stable identity of an input point (its index in the input list)
pub type PointId = usize;

/// Stable identity of an input segment (its index in the input list)
pub type SegmentId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Point {
            id,
            x: unsigned_zero(x),
            y: unsigned_zero(y),
        }
    }
}

/// An axis-aligned segment. Endpoints are normalized so that `x1 <= x2`
/// and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Horizontal { id: SegmentId, y: f64, x1: f64, x2: f64 },
    Vertical { id: SegmentId, x: f64, y1: f64, y2: f64 },
}

impl Segment {
    pub fn horizontal(id: SegmentId, y: f64, xa: f64, xb: f64) -> Self {
        Segment::Horizontal {
            id,
            y: unsigned_zero(y),
            x1: unsigned_zero(xa.min(xb)),
            x2: unsigned_zero(xa.max(xb)),
        }
    }

    pub fn vertical(id: SegmentId, x: f64, ya: f64, yb: f64) -> Self {
        Segment::Vertical {
            id,
            x: unsigned_zero(x),
            y1: unsigned_zero(ya.min(yb)),
            y2: unsigned_zero(ya.max(yb)),
        }
    }

    pub fn id(&self) -> SegmentId {
        match self {
            Segment::Horizontal { id, .. } | Segment::Vertical { id, .. } => *id,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Segment::Horizontal { .. })
    }

    /// Endpoints as `((x1, y1), (x2, y2))`
    pub fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        match *self {
            Segment::Horizontal { y, x1, x2, .. } => ((x1, y), (x2, y)),
            Segment::Vertical { x, y1, y2, .. } => ((x, y1), (x, y2)),
        }
    }
}

/// `a` dominates `b` when it is no smaller in both coordinates and strictly
/// larger in at least one.
pub fn dominates(a: &Point, b: &Point) -> bool {
    a.x >= b.x && a.y >= b.y && (a.x > b.x || a.y > b.y)
}

/// Ascending by x, then y, then id.
pub fn cmp_by_x(a: &Point, b: &Point) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.id.cmp(&b.id))
}

/// Descending by x, then descending by y, ties by ascending id.
pub fn cmp_by_x_desc(a: &Point, b: &Point) -> Ordering {
    b.x.total_cmp(&a.x)
        .then_with(|| b.y.total_cmp(&a.y))
        .then_with(|| a.id.cmp(&b.id))
}

/// Points sorted with [`cmp_by_x`]
pub fn sorted_by_x(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(cmp_by_x);
    sorted
}

/// O(n²) reference filter: ids of every point no other point dominates,
/// ascending.
pub fn brute_force_maxima(points: &[Point]) -> Vec<PointId> {
    let mut ids: Vec<PointId> = points
        .iter()
        .filter(|p| !points.iter().any(|q| dominates(q, p)))
        .map(|p| p.id)
        .collect();
    ids.sort_unstable();
    ids
}

/// O(h·v) reference for orthogonal intersections, as `(vertical x, horizontal y)`
/// pairs sorted by x then y.
pub fn brute_force_intersections(segments: &[Segment]) -> Vec<(f64, f64)> {
    let mut hits = Vec::new();
    for v in segments {
        let Segment::Vertical { x, y1, y2, .. } = *v else {
            continue;
        };
        for h in segments {
            if let Segment::Horizontal { y, x1, x2, .. } = *h {
                if x1 <= x && x <= x2 && y1 <= y && y <= y2 {
                    hits.push((x, y));
                }
            }
        }
    }
    hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominance_requires_one_strict_coordinate() {
        let a = Point::new(0, 2.0, 2.0);
        let b = Point::new(1, 2.0, 1.0);
        let c = Point::new(2, 2.0, 2.0);

        assert!(dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert!(!dominates(&a, &c));
        assert!(!dominates(&c, &a));
    }

    #[test]
    fn test_brute_force_maxima_staircase() {
        let points = vec![
            Point::new(0, 1.0, 5.0),
            Point::new(1, 2.0, 3.0),
            Point::new(2, 3.0, 4.0),
            Point::new(3, 4.0, 1.0),
        ];
        assert_eq!(brute_force_maxima(&points), vec![0, 2, 3]);
    }

    #[test]
    fn test_segment_normalizes_endpoints() {
        let s = Segment::horizontal(0, 3.0, 10.0, 2.0);
        assert_eq!(s.endpoints(), ((2.0, 3.0), (10.0, 3.0)));
        let v = Segment::vertical(1, 4.0, 9.0, 1.0);
        assert_eq!(v.endpoints(), ((4.0, 1.0), (4.0, 9.0)));
    }

    #[test]
    fn test_constructors_fold_negative_zero() {
        let s = Segment::horizontal(0, -0.0, -10.0, 10.0);
        let Segment::Horizontal { y, .. } = s else {
            panic!("expected a horizontal segment");
        };
        assert!(y.is_sign_positive());
        assert!(Point::new(0, -0.0, -0.0).x.is_sign_positive());
        let segments = vec![s, Segment::vertical(1, 0.0, 0.0, 5.0)];
        assert_eq!(brute_force_intersections(&segments), vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_brute_force_intersections_includes_touching_endpoints() {
        let segments = vec![
            Segment::horizontal(0, 5.0, 0.0, 10.0),
            Segment::vertical(1, 10.0, 0.0, 5.0),
            Segment::vertical(2, 11.0, 0.0, 10.0),
        ];
        assert_eq!(brute_force_intersections(&segments), vec![(10.0, 5.0)]);
    }
}
