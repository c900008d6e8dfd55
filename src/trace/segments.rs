//! Orthogonal segment intersections by a left-to-right sweep
//!
//! Horizontal segments produce a start stop at their left end and an end stop
//! at their right end; vertical segments produce a single query stop. Stops
//! are ordered by x with ties broken start, vertical, end, so touching
//! endpoints count as intersections.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use super::{EventKind, NodeId, Registry, Trace, TraceBuilder};
use crate::primitives::geometry::{unsigned_zero, Segment, SegmentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StopKind {
    Start = 0,
    Vertical = 1,
    End = 2,
}

/// A sweep position; every stop sharing an x lands in the same node
#[derive(Debug, Clone)]
pub struct Column {
    pub x: f64,
    pub stops: Vec<(StopKind, SegmentId)>,
}

/// `f64` ordered by `total_cmp`, with `-0.0` folded into `0.0`
#[derive(Debug, Clone, Copy)]
struct Key(f64);

impl Key {
    fn new(v: f64) -> Self {
        Key(unsigned_zero(v))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Horizontal segments currently crossed by the sweep line, ordered by y
#[derive(Debug, Clone, Default)]
pub struct ActiveSet {
    ordered: BTreeSet<(Key, SegmentId)>,
    by_id: FxHashMap<SegmentId, f64>,
}

/// One node of the balanced view over an [`ActiveSet`]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    pub segment: SegmentId,
    pub y: f64,
    pub depth: usize,
    pub parent: Option<usize>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, segment: SegmentId, y: f64) {
        if let Some(old) = self.by_id.insert(segment, y) {
            self.ordered.remove(&(Key::new(old), segment));
        }
        self.ordered.insert((Key::new(y), segment));
    }

    /// Remove by identity; returns the segment's y if it was present
    pub fn remove(&mut self, segment: SegmentId) -> Option<f64> {
        let y = self.by_id.remove(&segment)?;
        self.ordered.remove(&(Key::new(y), segment));
        Some(y)
    }

    pub fn contains(&self, segment: SegmentId) -> bool {
        self.by_id.contains_key(&segment)
    }

    /// Active segments with `y1 <= y <= y2`, ascending by y
    pub fn range(&self, y1: f64, y2: f64) -> Vec<(SegmentId, f64)> {
        if y1 > y2 {
            return Vec::new();
        }
        self.ordered
            .range((Key::new(y1), SegmentId::MIN)..=(Key::new(y2), SegmentId::MAX))
            .map(|&(Key(y), id)| (id, y))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, f64)> + '_ {
        self.ordered.iter().map(|&(Key(y), id)| (id, y))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Median-rooted balanced tree over the current order, in pre-order.
    pub fn balanced(&self) -> Vec<TreeEntry> {
        let sorted: Vec<(SegmentId, f64)> = self.iter().collect();
        let mut out = Vec::with_capacity(sorted.len());
        fn build(
            items: &[(SegmentId, f64)],
            depth: usize,
            parent: Option<usize>,
            out: &mut Vec<TreeEntry>,
        ) {
            if items.is_empty() {
                return;
            }
            let mid = items.len() / 2;
            let (segment, y) = items[mid];
            let here = out.len();
            out.push(TreeEntry {
                segment,
                y,
                depth,
                parent,
            });
            build(&items[..mid], depth + 1, Some(here), out);
            build(&items[mid + 1..], depth + 1, Some(here), out);
        }
        build(&sorted, 0, None, &mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEvent {
    Start {
        column: NodeId,
        segment: SegmentId,
        x: f64,
        y: f64,
    },
    Vertical {
        column: NodeId,
        segment: SegmentId,
        x: f64,
        y1: f64,
        y2: f64,
        /// Active horizontals crossed, ascending by y
        hits: Vec<(SegmentId, f64)>,
    },
    End {
        column: NodeId,
        segment: SegmentId,
        x: f64,
        y: f64,
    },
}

impl SegmentEvent {
    pub fn column(&self) -> NodeId {
        match self {
            SegmentEvent::Start { column, .. }
            | SegmentEvent::Vertical { column, .. }
            | SegmentEvent::End { column, .. } => *column,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            SegmentEvent::Start { x, .. }
            | SegmentEvent::Vertical { x, .. }
            | SegmentEvent::End { x, .. } => *x,
        }
    }

    pub fn segment(&self) -> SegmentId {
        match self {
            SegmentEvent::Start { segment, .. }
            | SegmentEvent::Vertical { segment, .. }
            | SegmentEvent::End { segment, .. } => *segment,
        }
    }
}

impl EventKind for SegmentEvent {
    fn kind(&self) -> &'static str {
        match self {
            SegmentEvent::Start { .. } => "start",
            SegmentEvent::Vertical { .. } => "vertical",
            SegmentEvent::End { .. } => "end",
        }
    }
}

/// Sweep stops in processing order: `(x, kind, segment)`
pub fn sweep_order(segments: &[Segment]) -> Vec<(f64, StopKind, Segment)> {
    let mut stops = Vec::with_capacity(segments.len() * 2);
    for &seg in segments {
        match seg {
            Segment::Horizontal { x1, x2, .. } => {
                stops.push((unsigned_zero(x1), StopKind::Start, seg));
                stops.push((unsigned_zero(x2), StopKind::End, seg));
            }
            Segment::Vertical { x, .. } => {
                stops.push((unsigned_zero(x), StopKind::Vertical, seg))
            }
        }
    }
    stops.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    stops
}

#[derive(Debug, Default)]
pub struct SegmentSweepBuilder;

impl TraceBuilder for SegmentSweepBuilder {
    type Input = Vec<Segment>;
    type Event = SegmentEvent;
    type Node = Column;

    fn build(&mut self, input: &Vec<Segment>) -> Trace<SegmentEvent, Column> {
        let mut nodes: Registry<Column> = Registry::new();
        let mut events = Vec::new();
        let mut active = ActiveSet::new();
        let mut current: Option<(NodeId, f64)> = None;

        for (x, kind, seg) in sweep_order(input) {
            let column = match current {
                Some((id, cx)) if cx.total_cmp(&x) == Ordering::Equal => id,
                _ => {
                    let id = nodes.insert(
                        None,
                        Column {
                            x,
                            stops: Vec::new(),
                        },
                    );
                    current = Some((id, x));
                    id
                }
            };
            if let Some(c) = nodes.data_mut(column) {
                c.stops.push((kind, seg.id()));
            }

            let event = match seg {
                Segment::Horizontal { id, y, .. } if kind == StopKind::Start => {
                    active.insert(id, y);
                    SegmentEvent::Start {
                        column,
                        segment: id,
                        x,
                        y,
                    }
                }
                Segment::Horizontal { id, y, .. } => {
                    active.remove(id);
                    SegmentEvent::End {
                        column,
                        segment: id,
                        x,
                        y,
                    }
                }
                Segment::Vertical { id, y1, y2, .. } => SegmentEvent::Vertical {
                    column,
                    segment: id,
                    x,
                    y1,
                    y2,
                    hits: active.range(y1, y2),
                },
            };
            events.push(event);
        }

        tracing::debug!(
            events = events.len(),
            columns = nodes.len(),
            "segment sweep trace built"
        );
        Trace::new(events, nodes)
    }
}
