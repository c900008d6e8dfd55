// Property tests: every trace must agree with a direct computation

use std::collections::HashSet;

use proptest::prelude::*;

use algoscope::input::{parse_selection, InputError};
use algoscope::primitives::geometry::{brute_force_intersections, brute_force_maxima};
use algoscope::primitives::{is_good_splitter, Point, Segment};
use algoscope::replay::{
    replay_all, KaratsubaView, MaximaDivideView, MaximaSweepView, RadixView, SegmentSweepView,
    SelectView,
};
use algoscope::trace::karatsuba::{KaratsubaBuilder, Operands};
use algoscope::trace::maxima_dc::MaximaDivideBuilder;
use algoscope::trace::maxima_sweep::MaximaSweepBuilder;
use algoscope::trace::radix::RadixBuilder;
use algoscope::trace::segments::SegmentSweepBuilder;
use algoscope::trace::select::{SelectBuilder, SelectEvent, Selection};
use algoscope::trace::TraceBuilder;

/// Distinct values with a valid `k`
fn selection() -> impl Strategy<Value = Selection> {
    prop::collection::hash_set(-500i32..500, 2..=20).prop_flat_map(|set| {
        let values: Vec<f64> = set.into_iter().map(f64::from).collect();
        let len = values.len();
        (Just(values), 1..=len).prop_map(|(values, k)| Selection { values, k })
    })
}

/// Values drawn from a tiny range so most arrays repeat something
fn crowded_selection() -> impl Strategy<Value = (Vec<i32>, usize)> {
    prop::collection::vec(0i32..8, 2..=10).prop_flat_map(|values| {
        let len = values.len();
        (Just(values), 1..=len)
    })
}

/// Points on a 5x5 grid: shared x, shared y, and exact duplicates all occur
fn crowded_points() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0u32..5, 0u32..5), 1..=12).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(id, (x, y))| Point::new(id, f64::from(x), f64::from(y)))
            .collect::<Vec<Point>>()
    })
}

/// Segments on a 6x6 grid, so verticals land on horizontal endpoints and
/// several stops share an x
fn touching_segments() -> impl Strategy<Value = Vec<Segment>> {
    let horizontal = (0u32..6, 0u32..6, 0u32..6);
    let vertical = (0u32..6, 0u32..6, 0u32..6);
    (
        prop::collection::vec(horizontal, 0..6),
        prop::collection::vec(vertical, 0..6),
    )
        .prop_map(|(hs, vs)| {
            let mut out = Vec::new();
            for (y, a, b) in hs {
                let id = out.len();
                out.push(Segment::horizontal(id, f64::from(y), f64::from(a), f64::from(b)));
            }
            for (x, a, b) in vs {
                let id = out.len();
                out.push(Segment::vertical(id, f64::from(x), f64::from(a), f64::from(b)));
            }
            out
        })
}

/// Points with pairwise distinct x and pairwise distinct y
fn points() -> impl Strategy<Value = Vec<Point>> {
    (1usize..=16).prop_flat_map(|n| {
        (
            prop::collection::hash_set(0u32..600, n),
            prop::collection::hash_set(0u32..400, n),
        )
            .prop_map(|(xs, ys)| {
                xs.into_iter()
                    .zip(ys)
                    .enumerate()
                    .map(|(id, (x, y))| Point::new(id, f64::from(x), f64::from(y)))
                    .collect::<Vec<Point>>()
            })
    })
}

/// Horizontal endpoints and y on even coordinates, verticals on odd ones, so
/// no vertical ever touches a horizontal endpoint exactly
fn segments() -> impl Strategy<Value = Vec<Segment>> {
    let horizontal = (0u32..200, 0u32..300, 0u32..300);
    let vertical = (0u32..300, 0u32..200, 0u32..200);
    (
        prop::collection::vec(horizontal, 0..8),
        prop::collection::vec(vertical, 0..6),
    )
        .prop_map(|(hs, vs)| {
            let mut out = Vec::new();
            let mut used_y = HashSet::new();
            for (y, a, b) in hs {
                if a == b || !used_y.insert(y) {
                    continue;
                }
                let id = out.len();
                out.push(Segment::horizontal(
                    id,
                    f64::from(y * 2),
                    f64::from(a * 2),
                    f64::from(b * 2),
                ));
            }
            let mut used_x = HashSet::new();
            for (x, a, b) in vs {
                if a == b || !used_x.insert(x) {
                    continue;
                }
                let id = out.len();
                out.push(Segment::vertical(
                    id,
                    f64::from(x * 2 + 1),
                    f64::from(a * 2 + 1),
                    f64::from(b * 2 + 1),
                ));
            }
            out
        })
}

proptest! {
    #[test]
    fn test_karatsuba_product_matches(x in 1u64..1_000_000_000_000_000_000, y in 1u64..1_000_000_000_000) {
        let ops = Operands::new(x.to_string(), y.to_string());
        let trace = KaratsubaBuilder.build(&ops);
        let view: KaratsubaView = replay_all(&ops, &trace);
        prop_assert_eq!(view.product(), Some(u128::from(x) * u128::from(y)));
    }

    #[test]
    fn test_select_finds_kth_and_keeps_good_pivots(sel in selection(), seed in any::<u64>()) {
        let trace = SelectBuilder::seeded(seed).build(&sel);
        for event in trace.events() {
            match event {
                SelectEvent::PickPivot { lo, hi, rank, .. } => {
                    prop_assert!(is_good_splitter(*rank, hi - lo + 1), "rank {} in [{}..{}]", rank, lo, hi);
                }
                SelectEvent::RejectPivot { less_count, range_size, .. } => {
                    prop_assert!(!is_good_splitter(*less_count, *range_size));
                }
                _ => {}
            }
        }
        let view: SelectView = replay_all(&sel, &trace);
        prop_assert_eq!(view.answer(), sel.kth_smallest());
    }

    #[test]
    fn test_radix_sorts(values in prop::collection::vec(0u64..100_000, 2..=20)) {
        let trace = RadixBuilder.build(&values);
        let view: RadixView = replay_all(&values, &trace);
        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(view.sorted_values(), expected);
        prop_assert!(view.is_sorted());
    }

    #[test]
    fn test_maxima_algorithms_agree(points in points()) {
        let expected = brute_force_maxima(&points);
        let dc: MaximaDivideView = replay_all(&points, &MaximaDivideBuilder.build(&points));
        let sweep: MaximaSweepView = replay_all(&points, &MaximaSweepBuilder.build(&points));
        let mut from_dc = dc.maximal().to_vec();
        from_dc.sort_unstable();
        let mut from_sweep = sweep.maximal();
        from_sweep.sort_unstable();
        prop_assert_eq!(&from_dc, &expected);
        prop_assert_eq!(&from_sweep, &expected);
    }

    #[test]
    fn test_segment_sweep_matches_brute_force(segments in segments()) {
        let trace = SegmentSweepBuilder.build(&segments);
        let view: SegmentSweepView = replay_all(&segments, &trace);
        let mut hits = view.intersections().to_vec();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
        prop_assert_eq!(hits, brute_force_intersections(&segments));
        prop_assert!(view.active().is_empty());
    }

    #[test]
    fn test_selection_input_with_repeats_is_rejected((values, k) in crowded_selection(), seed in any::<u64>()) {
        let text = values.iter().map(i32::to_string).collect::<Vec<_>>().join(" ");
        let distinct = values.iter().collect::<HashSet<_>>().len();
        match parse_selection(&text, k) {
            Ok(sel) => {
                prop_assert_eq!(distinct, values.len());
                prop_assert_eq!(sel.first_repeat(), None);
                let trace = SelectBuilder::seeded(seed).build(&sel);
                for event in trace.events() {
                    if let SelectEvent::PickPivot { lo, hi, rank, .. } = event {
                        prop_assert!(is_good_splitter(*rank, hi - lo + 1));
                    }
                }
            }
            Err(InputError::Repeated { value }) => {
                prop_assert!(distinct < values.len());
                prop_assert!(values.iter().filter(|&&v| f64::from(v) == value).count() > 1);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn test_maxima_algorithms_agree_with_ties(points in crowded_points()) {
        let expected = brute_force_maxima(&points);
        let dc: MaximaDivideView = replay_all(&points, &MaximaDivideBuilder.build(&points));
        let sweep: MaximaSweepView = replay_all(&points, &MaximaSweepBuilder.build(&points));
        let mut from_dc = dc.maximal().to_vec();
        from_dc.sort_unstable();
        let mut from_sweep = sweep.maximal();
        from_sweep.sort_unstable();
        prop_assert_eq!(&from_dc, &expected);
        prop_assert_eq!(&from_sweep, &expected);
    }

    #[test]
    fn test_segment_sweep_counts_touching_endpoints(segments in touching_segments()) {
        let trace = SegmentSweepBuilder.build(&segments);
        let view: SegmentSweepView = replay_all(&segments, &trace);
        let mut hits = view.intersections().to_vec();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
        prop_assert_eq!(hits, brute_force_intersections(&segments));
        prop_assert!(view.active().is_empty());
    }
}
