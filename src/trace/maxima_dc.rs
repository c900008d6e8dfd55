//! Maximal points by divide and conquer
//!
//! Points are sorted by x once. Each call solves its right half first, takes
//! the right half's maximum y, solves the left half, then keeps every left
//! maximum no right maximum dominates.

use super::{EventKind, NodeId, Registry, Trace, TraceBuilder};
use crate::primitives::geometry::{cmp_by_x, dominates, sorted_by_x, Point, PointId};

/// A recursive call over the x-sorted range `lo..=hi`
#[derive(Debug, Clone)]
pub struct Call {
    pub lo: usize,
    pub hi: usize,
    pub mid: Option<usize>,
    pub result: Vec<PointId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaximaEvent {
    Enter {
        node: NodeId,
        lo: usize,
        hi: usize,
        depth: usize,
    },
    Base {
        node: NodeId,
        point: PointId,
    },
    Split {
        node: NodeId,
        lo: usize,
        mid: usize,
        hi: usize,
        /// Left child, then right child
        children: [NodeId; 2],
    },
    RightReady {
        node: NodeId,
        right: Vec<PointId>,
        right_max_y: f64,
    },
    MergeStart {
        node: NodeId,
        right: Vec<PointId>,
        right_max_y: f64,
        left: Vec<PointId>,
    },
    CheckLeft {
        node: NodeId,
        point: PointId,
        right_max_y: f64,
        witness: Option<PointId>,
    },
    DropLeft {
        node: NodeId,
        point: PointId,
        witness: PointId,
    },
    KeepLeft {
        node: NodeId,
        point: PointId,
    },
    MergeDone {
        node: NodeId,
        lo: usize,
        hi: usize,
        result: Vec<PointId>,
    },
    Return {
        node: NodeId,
        lo: usize,
        hi: usize,
        result: Vec<PointId>,
    },
}

impl MaximaEvent {
    pub fn node(&self) -> NodeId {
        match self {
            MaximaEvent::Enter { node, .. }
            | MaximaEvent::Base { node, .. }
            | MaximaEvent::Split { node, .. }
            | MaximaEvent::RightReady { node, .. }
            | MaximaEvent::MergeStart { node, .. }
            | MaximaEvent::CheckLeft { node, .. }
            | MaximaEvent::DropLeft { node, .. }
            | MaximaEvent::KeepLeft { node, .. }
            | MaximaEvent::MergeDone { node, .. }
            | MaximaEvent::Return { node, .. } => *node,
        }
    }
}

impl EventKind for MaximaEvent {
    fn kind(&self) -> &'static str {
        match self {
            MaximaEvent::Enter { .. } => "enter",
            MaximaEvent::Base { .. } => "base",
            MaximaEvent::Split { .. } => "split",
            MaximaEvent::RightReady { .. } => "right-ready",
            MaximaEvent::MergeStart { .. } => "merge-start",
            MaximaEvent::CheckLeft { .. } => "check-left",
            MaximaEvent::DropLeft { .. } => "drop-left",
            MaximaEvent::KeepLeft { .. } => "keep-left",
            MaximaEvent::MergeDone { .. } => "merge-done",
            MaximaEvent::Return { .. } => "return",
        }
    }
}

#[derive(Debug, Default)]
pub struct MaximaDivideBuilder;

impl TraceBuilder for MaximaDivideBuilder {
    type Input = Vec<Point>;
    type Event = MaximaEvent;
    type Node = Call;

    fn build(&mut self, input: &Vec<Point>) -> Trace<MaximaEvent, Call> {
        let sorted = sorted_by_x(input);
        let mut run = Recursion {
            sorted,
            nodes: Registry::new(),
            events: Vec::new(),
        };
        if !run.sorted.is_empty() {
            let hi = run.sorted.len() - 1;
            let root = run.nodes.insert(
                None,
                Call {
                    lo: 0,
                    hi,
                    mid: None,
                    result: Vec::new(),
                },
            );
            run.solve(root);
        }
        tracing::debug!(
            events = run.events.len(),
            calls = run.nodes.len(),
            "maxima divide-and-conquer trace built"
        );
        Trace::new(run.events, run.nodes)
    }
}

struct Recursion {
    sorted: Vec<Point>,
    nodes: Registry<Call>,
    events: Vec<MaximaEvent>,
}

impl Recursion {
    fn solve(&mut self, id: NodeId) -> Vec<Point> {
        let (lo, hi, depth) = {
            let node = &self.nodes[id];
            (node.data.lo, node.data.hi, node.depth)
        };
        self.events.push(MaximaEvent::Enter {
            node: id,
            lo,
            hi,
            depth,
        });

        if lo == hi {
            let p = self.sorted[lo];
            self.events.push(MaximaEvent::Base {
                node: id,
                point: p.id,
            });
            self.finish(id, lo, hi, vec![p.id]);
            return vec![p];
        }

        let mid = (lo + hi) / 2;
        let left_id = self.nodes.insert(
            Some(id),
            Call {
                lo,
                hi: mid,
                mid: None,
                result: Vec::new(),
            },
        );
        let right_id = self.nodes.insert(
            Some(id),
            Call {
                lo: mid + 1,
                hi,
                mid: None,
                result: Vec::new(),
            },
        );
        if let Some(call) = self.nodes.data_mut(id) {
            call.mid = Some(mid);
        }
        self.events.push(MaximaEvent::Split {
            node: id,
            lo,
            mid,
            hi,
            children: [left_id, right_id],
        });

        let right = self.solve(right_id);
        let right_ids: Vec<PointId> = right.iter().map(|p| p.id).collect();
        let right_max_y = right.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        self.events.push(MaximaEvent::RightReady {
            node: id,
            right: right_ids.clone(),
            right_max_y,
        });

        let left = self.solve(left_id);
        self.events.push(MaximaEvent::MergeStart {
            node: id,
            right: right_ids,
            right_max_y,
            left: left.iter().map(|p| p.id).collect(),
        });

        let mut merged = right.clone();
        for lp in &left {
            let witness = right.iter().find(|rp| dominates(rp, lp)).map(|rp| rp.id);
            self.events.push(MaximaEvent::CheckLeft {
                node: id,
                point: lp.id,
                right_max_y,
                witness,
            });
            match witness {
                Some(witness) => self.events.push(MaximaEvent::DropLeft {
                    node: id,
                    point: lp.id,
                    witness,
                }),
                None => {
                    merged.push(*lp);
                    self.events.push(MaximaEvent::KeepLeft {
                        node: id,
                        point: lp.id,
                    });
                }
            }
        }

        merged.sort_by(cmp_by_x);
        let result: Vec<PointId> = merged.iter().map(|p| p.id).collect();
        self.events.push(MaximaEvent::MergeDone {
            node: id,
            lo,
            hi,
            result: result.clone(),
        });
        self.finish(id, lo, hi, result);
        merged
    }

    fn finish(&mut self, id: NodeId, lo: usize, hi: usize, result: Vec<PointId>) {
        if let Some(call) = self.nodes.data_mut(id) {
            call.result = result.clone();
        }
        self.events.push(MaximaEvent::Return {
            node: id,
            lo,
            hi,
            result,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::geometry::brute_force_maxima;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(i, x, y))
            .collect()
    }

    fn root_result(trace: &Trace<MaximaEvent, Call>) -> Vec<PointId> {
        let mut ids = trace.nodes()[NodeId::ROOT].data.result.clone();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_single_point_is_maximal() {
        let trace = MaximaDivideBuilder.build(&pts(&[(3.0, 4.0)]));
        let kinds: Vec<_> = trace.events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["enter", "base", "return"]);
        assert_eq!(root_result(&trace), vec![0]);
    }

    #[test]
    fn test_matches_brute_force() {
        let points = pts(&[
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
        ]);
        let trace = MaximaDivideBuilder.build(&points);
        assert_eq!(root_result(&trace), brute_force_maxima(&points));
    }

    #[test]
    fn test_right_half_is_solved_before_left() {
        let trace = MaximaDivideBuilder.build(&pts(&[(1.0, 1.0), (2.0, 2.0)]));
        // enter root, split, then the right child (id 2) is entered first
        match &trace.events()[2] {
            MaximaEvent::Enter { node, lo, .. } => {
                assert_eq!(*node, NodeId(2));
                assert_eq!(*lo, 1);
            }
            other => panic!("Expected right child enter, got {:?}", other),
        }
    }

    #[test]
    fn test_dropped_point_names_its_witness() {
        let trace = MaximaDivideBuilder.build(&pts(&[(1.0, 1.0), (2.0, 2.0)]));
        let drop = trace.events().iter().find_map(|e| match e {
            MaximaEvent::DropLeft { point, witness, .. } => Some((*point, *witness)),
            _ => None,
        });
        assert_eq!(drop, Some((0, 1)));
    }

    #[test]
    fn test_empty_input_yields_empty_trace() {
        let trace = MaximaDivideBuilder.build(&Vec::new());
        assert!(trace.is_empty());
        assert!(trace.nodes().is_empty());
    }
}
