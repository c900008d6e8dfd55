//! Order-statistic selection trace
//!
//! Each round samples a pivot position uniformly within the active range and
//! keeps it only if it is a good splitter: its rank (the count of smaller
//! values in range) lands in `[⌊n/4⌋, n-1-⌊n/4⌋]`, or the range has at most
//! three elements. The accepted pivot is swapped to the end, a single
//! left-to-right scan with a store index partitions the range, and the round
//! recurses into the side that contains the target slot.

use std::ops::Range;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{BarId, EventKind, NodeId, Registry, Trace, TraceBuilder};
use crate::primitives::rank::{is_good_splitter, less_count};

/// Consecutive rejections after which the round takes the median-rank element
pub const MAX_PIVOT_ATTEMPTS: usize = 64;

/// Validated selection input; `k` is 1-based and values are pairwise distinct
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub values: Vec<f64>,
    pub k: usize,
}

impl Selection {
    /// Direct answer by sorting, for checking a replay against
    pub fn kth_smallest(&self) -> Option<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        self.k.checked_sub(1).and_then(|i| sorted.get(i).copied())
    }

    /// Smallest value that occurs more than once
    pub fn first_repeat(&self) -> Option<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
    }
}

/// Source of pivot offsets within an active range
pub trait PivotSource {
    /// An offset in `0..len`
    fn pick(&mut self, len: usize) -> usize;
}

impl<F: FnMut(usize) -> usize> PivotSource for F {
    fn pick(&mut self, len: usize) -> usize {
        self(len)
    }
}

/// Uniform pivots from a seeded small RNG
#[derive(Debug, Clone)]
pub struct RandomPivots {
    rng: SmallRng,
}

impl RandomPivots {
    pub fn seeded(seed: u64) -> Self {
        RandomPivots {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl PivotSource for RandomPivots {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.random_range(0..len)
        }
    }
}

/// One recursive round over the slot range `lo..=hi`
#[derive(Debug, Clone)]
pub struct Round {
    pub lo: usize,
    pub hi: usize,
    pub target: usize,
    pub rejected: usize,
    pub pivot: Option<BarId>,
    pub landed: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Found,
    Left,
    Right,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Found => "found",
            Decision::Left => "left",
            Decision::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    Enter {
        round: NodeId,
        lo: usize,
        hi: usize,
        target: usize,
    },
    RejectPivot {
        round: NodeId,
        lo: usize,
        hi: usize,
        pivot_pos: usize,
        pivot: BarId,
        value: f64,
        less_count: usize,
        range_size: usize,
    },
    PickPivot {
        round: NodeId,
        lo: usize,
        hi: usize,
        pivot_pos: usize,
        pivot: BarId,
        value: f64,
        rank: usize,
    },
    PartitionDone {
        round: NodeId,
        lo: usize,
        hi: usize,
        p: usize,
        pivot: BarId,
        value: f64,
        /// Bar occupying each slot after the partition
        slots: Vec<BarId>,
    },
    Compare {
        round: NodeId,
        lo: usize,
        hi: usize,
        p: usize,
        target: usize,
        pivot: BarId,
        value: f64,
        decision: Decision,
    },
    Eliminate {
        round: NodeId,
        side: Decision,
        /// Discarded slots, not counting the pivot
        discarded: Range<usize>,
        pivot_slot: usize,
        keep: Range<usize>,
    },
    Found {
        round: NodeId,
        slot: usize,
        bar: BarId,
        value: f64,
    },
}

impl SelectEvent {
    pub fn round(&self) -> NodeId {
        match self {
            SelectEvent::Enter { round, .. }
            | SelectEvent::RejectPivot { round, .. }
            | SelectEvent::PickPivot { round, .. }
            | SelectEvent::PartitionDone { round, .. }
            | SelectEvent::Compare { round, .. }
            | SelectEvent::Eliminate { round, .. }
            | SelectEvent::Found { round, .. } => *round,
        }
    }
}

impl EventKind for SelectEvent {
    fn kind(&self) -> &'static str {
        match self {
            SelectEvent::Enter { .. } => "enter",
            SelectEvent::RejectPivot { .. } => "reject-pivot",
            SelectEvent::PickPivot { .. } => "pick-pivot",
            SelectEvent::PartitionDone { .. } => "partition-done",
            SelectEvent::Compare { .. } => "compare",
            SelectEvent::Eliminate { .. } => "eliminate",
            SelectEvent::Found { .. } => "found",
        }
    }
}

pub struct SelectBuilder {
    pivots: Box<dyn PivotSource>,
}

impl SelectBuilder {
    pub fn new(pivots: impl PivotSource + 'static) -> Self {
        SelectBuilder {
            pivots: Box::new(pivots),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomPivots::seeded(seed))
    }
}

impl TraceBuilder for SelectBuilder {
    type Input = Selection;
    type Event = SelectEvent;
    type Node = Round;

    fn build(&mut self, input: &Selection) -> Trace<SelectEvent, Round> {
        let mut run = Recursion {
            work: input.values.iter().copied().enumerate().collect(),
            pivots: self.pivots.as_mut(),
            nodes: Registry::new(),
            events: Vec::new(),
        };
        if let Some(target) = input.k.checked_sub(1) {
            if target < run.work.len() {
                let hi = run.work.len() - 1;
                run.select(None, 0, hi, target);
            }
        }
        tracing::debug!(
            events = run.events.len(),
            rounds = run.nodes.len(),
            "selection trace built"
        );
        Trace::new(run.events, run.nodes)
    }
}

struct Recursion<'a> {
    /// `(bar, value)` per slot
    work: Vec<(BarId, f64)>,
    pivots: &'a mut dyn PivotSource,
    nodes: Registry<Round>,
    events: Vec<SelectEvent>,
}

impl Recursion<'_> {
    fn select(&mut self, parent: Option<NodeId>, lo: usize, hi: usize, target: usize) {
        let round = self.nodes.insert(
            parent,
            Round {
                lo,
                hi,
                target,
                rejected: 0,
                pivot: None,
                landed: None,
            },
        );
        self.events.push(SelectEvent::Enter {
            round,
            lo,
            hi,
            target,
        });

        if lo == hi {
            let (bar, value) = self.work[lo];
            self.events.push(SelectEvent::Found {
                round,
                slot: lo,
                bar,
                value,
            });
            return;
        }

        let (pivot_pos, pivot, value) = self.choose_pivot(round, lo, hi);

        self.work.swap(pivot_pos, hi);
        let mut store = lo;
        for i in lo..hi {
            if self.work[i].1 < value {
                if i != store {
                    self.work.swap(i, store);
                }
                store += 1;
            }
        }
        self.work.swap(store, hi);
        let p = store;

        if let Some(r) = self.nodes.data_mut(round) {
            r.pivot = Some(pivot);
            r.landed = Some(p);
        }
        self.events.push(SelectEvent::PartitionDone {
            round,
            lo,
            hi,
            p,
            pivot,
            value,
            slots: self.work.iter().map(|&(bar, _)| bar).collect(),
        });

        let decision = if target == p {
            Decision::Found
        } else if target < p {
            Decision::Left
        } else {
            Decision::Right
        };
        self.events.push(SelectEvent::Compare {
            round,
            lo,
            hi,
            p,
            target,
            pivot,
            value,
            decision,
        });

        match decision {
            Decision::Found => self.events.push(SelectEvent::Found {
                round,
                slot: p,
                bar: pivot,
                value,
            }),
            Decision::Left => {
                self.events.push(SelectEvent::Eliminate {
                    round,
                    side: Decision::Right,
                    discarded: p + 1..hi + 1,
                    pivot_slot: p,
                    keep: lo..p,
                });
                self.select(Some(round), lo, p - 1, target);
            }
            Decision::Right => {
                self.events.push(SelectEvent::Eliminate {
                    round,
                    side: Decision::Left,
                    discarded: lo..p,
                    pivot_slot: p,
                    keep: p + 1..hi + 1,
                });
                self.select(Some(round), p + 1, hi, target);
            }
        }
    }

    /// Sample until a good splitter turns up; returns `(slot, bar, value)`
    fn choose_pivot(&mut self, round: NodeId, lo: usize, hi: usize) -> (usize, BarId, f64) {
        let range_size = hi - lo + 1;
        for _ in 0..MAX_PIVOT_ATTEMPTS {
            let pivot_pos = lo + self.pivots.pick(range_size) % range_size;
            let (pivot, value) = self.work[pivot_pos];
            let rank = less_count(self.work[lo..=hi].iter().map(|&(_, v)| v), value);

            if is_good_splitter(rank, range_size) {
                self.events.push(SelectEvent::PickPivot {
                    round,
                    lo,
                    hi,
                    pivot_pos,
                    pivot,
                    value,
                    rank,
                });
                return (pivot_pos, pivot, value);
            }

            if let Some(r) = self.nodes.data_mut(round) {
                r.rejected += 1;
            }
            self.events.push(SelectEvent::RejectPivot {
                round,
                lo,
                hi,
                pivot_pos,
                pivot,
                value,
                less_count: rank,
                range_size,
            });
        }

        // The source kept missing; settle on the median-rank element, whose
        // rank is the window midpoint when values are distinct.
        let mut by_value: Vec<usize> = (lo..=hi).collect();
        by_value.sort_by(|&a, &b| self.work[a].1.total_cmp(&self.work[b].1));
        let pivot_pos = by_value[range_size / 2];
        let (pivot, value) = self.work[pivot_pos];
        let rank = less_count(self.work[lo..=hi].iter().map(|&(_, v)| v), value);
        tracing::warn!(round = round.index(), "pivot source exhausted; using median rank");
        self.events.push(SelectEvent::PickPivot {
            round,
            lo,
            hi,
            pivot_pos,
            pivot,
            value,
            rank,
        });
        (pivot_pos, pivot, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Selection {
        Selection {
            values: vec![7.0, 2.0, 5.0, 1.0, 8.0, 3.0, 6.0],
            k: 3,
        }
    }

    fn found_value(trace: &Trace<SelectEvent, Round>) -> Option<f64> {
        trace.events().iter().find_map(|e| match e {
            SelectEvent::Found { value, .. } => Some(*value),
            _ => None,
        })
    }

    #[test]
    fn test_example_selects_third_smallest() {
        let trace = SelectBuilder::seeded(7).build(&example());
        assert_eq!(found_value(&trace), Some(3.0));
    }

    #[test]
    fn test_seeded_traces_are_identical() {
        let a = SelectBuilder::seeded(42).build(&example());
        let b = SelectBuilder::seeded(42).build(&example());
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn test_bad_pivot_is_rejected_then_resampled() {
        // First sample hits slot 3 (value 1, rank 0): rejected. Then slot 2 (value 5, rank 3).
        let mut script = vec![3usize, 2].into_iter();
        let mut builder = SelectBuilder::new(move |_len: usize| script.next().unwrap_or(0));
        let trace = builder.build(&example());
        match &trace.events()[1] {
            SelectEvent::RejectPivot {
                pivot_pos,
                less_count,
                range_size,
                ..
            } => {
                assert_eq!(*pivot_pos, 3);
                assert_eq!(*less_count, 0);
                assert_eq!(*range_size, 7);
            }
            other => panic!("Expected reject-pivot, got {:?}", other),
        }
        match &trace.events()[2] {
            SelectEvent::PickPivot { value, rank, .. } => {
                assert_eq!(*value, 5.0);
                assert_eq!(*rank, 3);
            }
            other => panic!("Expected pick-pivot, got {:?}", other),
        }
        assert_eq!(found_value(&trace), Some(3.0));
    }

    #[test]
    fn test_partition_places_pivot_at_its_rank() {
        let mut builder = SelectBuilder::new(|_len: usize| 2);
        let trace = builder.build(&example());
        let partition = trace.events().iter().find_map(|e| match e {
            SelectEvent::PartitionDone { p, pivot, slots, .. } => Some((*p, *pivot, slots.clone())),
            _ => None,
        });
        let (p, pivot, slots) = partition.expect("a partition happens");
        assert_eq!(p, 3);
        assert_eq!(slots[p], pivot);
        for &bar in &slots[..p] {
            assert!(example().values[bar] < 5.0);
        }
    }

    #[test]
    fn test_stubborn_source_falls_back_to_median() {
        // Slot 0 holds the minimum, and rank 0 is never a good splitter for n = 8.
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let input = Selection { values, k: 8 };
        let mut builder = SelectBuilder::new(|_len: usize| 0);
        let trace = builder.build(&input);
        let rejects = trace
            .events()
            .iter()
            .filter(|e| matches!(e, SelectEvent::RejectPivot { .. }))
            .count();
        assert!(rejects >= MAX_PIVOT_ATTEMPTS);
        for event in trace.events() {
            if let SelectEvent::PickPivot { lo, hi, rank, .. } = event {
                assert!(is_good_splitter(*rank, hi - lo + 1));
            }
        }
        assert_eq!(found_value(&trace), Some(8.0));
    }

    #[test]
    fn test_first_repeat_finds_smallest_duplicate() {
        let sel = |values: Vec<f64>| Selection { values, k: 1 };
        assert_eq!(sel(vec![3.0, 1.0, 9.0]).first_repeat(), None);
        assert_eq!(sel(vec![9.0, 3.0, 9.0, 3.0]).first_repeat(), Some(3.0));
    }
}
