//! Divide-and-conquer maxima replay
//!
//! Points are labelled `#1..#n` by their x-sorted rank. The view tracks the
//! live call stack, per-call results, the candidate/witness pair under
//! inspection, and every point dropped so far.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{plural, Interpret, Motion, NodeStatus, Scene, StatusBoard, Verdict};
use crate::motion::Bounds;
use crate::primitives::geometry::{sorted_by_x, Point, PointId};
use crate::trace::maxima_dc::{Call, MaximaDivideBuilder, MaximaEvent};
use crate::trace::{NodeId, Registry};

#[derive(Debug, Clone)]
pub struct MaximaDivideView {
    points: FxHashMap<PointId, Point>,
    rank: FxHashMap<PointId, usize>,
    statuses: StatusBoard,
    results: Vec<Option<Vec<PointId>>>,
    right_max_y: Vec<Option<f64>>,
    stack: Vec<NodeId>,
    dominated: FxHashSet<PointId>,
    maximal: Vec<PointId>,
    candidate: Option<PointId>,
    witness: Option<PointId>,
    verdict: Option<Verdict>,
    status: String,
}

impl MaximaDivideView {
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(&id)
    }

    /// Input points ordered by id
    pub fn points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.points.values().copied().collect();
        points.sort_by_key(|p| p.id);
        points
    }

    pub fn status_of(&self, id: NodeId) -> NodeStatus {
        self.statuses.get(id)
    }

    pub fn result_of(&self, id: NodeId) -> Option<&[PointId]> {
        self.results.get(id.index()).and_then(|r| r.as_deref())
    }

    pub fn right_max_y(&self, id: NodeId) -> Option<f64> {
        self.right_max_y.get(id.index()).copied().flatten()
    }

    /// Innermost call last
    pub fn call_stack(&self) -> &[NodeId] {
        &self.stack
    }

    pub fn is_dominated(&self, id: PointId) -> bool {
        self.dominated.contains(&id)
    }

    /// Final maximal set, ascending by id; empty until the root returns
    pub fn maximal(&self) -> &[PointId] {
        &self.maximal
    }

    pub fn candidate(&self) -> Option<(PointId, Option<PointId>, Option<Verdict>)> {
        self.candidate.map(|c| (c, self.witness, self.verdict))
    }

    /// `#k (x, y)` with `k` the x-sorted rank
    pub fn label(&self, id: PointId) -> String {
        match (self.rank.get(&id), self.points.get(&id)) {
            (Some(rank), Some(p)) => format!("#{} ({}, {})", rank + 1, p.x.round(), p.y.round()),
            _ => format!("#{}", id + 1),
        }
    }

    fn clear_candidate(&mut self) {
        self.candidate = None;
        self.witness = None;
        self.verdict = None;
    }

    fn store_result(&mut self, id: NodeId, result: &[PointId]) {
        if let Some(slot) = self.results.get_mut(id.index()) {
            *slot = Some(result.to_vec());
        }
    }
}

impl Interpret for MaximaDivideView {
    type Builder = MaximaDivideBuilder;
    const SCENE: Scene = Scene::Tree;

    fn new(input: &Vec<Point>, nodes: &Registry<Call>) -> Self {
        let rank = sorted_by_x(input)
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        let mut statuses = StatusBoard::new(nodes.len());
        if !nodes.is_empty() {
            statuses.reveal(NodeId::ROOT);
        }
        MaximaDivideView {
            points: input.iter().map(|p| (p.id, *p)).collect(),
            rank,
            statuses,
            results: vec![None; nodes.len()],
            right_max_y: vec![None; nodes.len()],
            stack: Vec::new(),
            dominated: FxHashSet::default(),
            maximal: Vec::new(),
            candidate: None,
            witness: None,
            verdict: None,
            status: "Trace ready. Points are sorted by x and relabeled as #1 to #n.".to_string(),
        }
    }

    fn apply(&mut self, event: &MaximaEvent, nodes: &Registry<Call>) -> Option<Motion> {
        let node = event.node();
        match event {
            MaximaEvent::Enter { lo, hi, depth, .. } => {
                self.statuses.set(node, NodeStatus::Active);
                self.stack.push(node);
                self.clear_candidate();
                self.status = format!("Enter F({},{}) at depth {}", lo, hi, depth);
            }
            MaximaEvent::Base { point, .. } => {
                self.candidate = Some(*point);
                self.witness = None;
                self.verdict = Some(Verdict::Keep);
                self.status = format!("Base case keeps {}", self.label(*point));
            }
            MaximaEvent::Split {
                lo,
                mid,
                hi,
                children,
                ..
            } => {
                for &child in children {
                    self.statuses.reveal(child);
                }
                self.status = format!("Split F({},{}) at mid={}", lo, hi, mid);
            }
            MaximaEvent::RightReady {
                right, right_max_y, ..
            } => {
                if let Some(slot) = self.right_max_y.get_mut(node.index()) {
                    *slot = Some(*right_max_y);
                }
                self.clear_candidate();
                self.status = format!(
                    "Right half solved: {}, rightMaxY={}",
                    plural(right.len(), "maximal point"),
                    right_max_y.round()
                );
            }
            MaximaEvent::MergeStart { .. } => {
                self.clear_candidate();
                let (lo, hi) = nodes
                    .get(node)
                    .map(|n| (n.data.lo, n.data.hi))
                    .unwrap_or_default();
                self.status = format!("Merge in F({},{})", lo, hi);
            }
            MaximaEvent::CheckLeft { point, witness, .. } => {
                self.candidate = Some(*point);
                self.witness = *witness;
                self.status = match witness {
                    Some(w) => {
                        self.verdict = Some(Verdict::Drop);
                        format!("{} is dominated by {}", self.label(*point), self.label(*w))
                    }
                    None => {
                        self.verdict = Some(Verdict::Keep);
                        format!("{} survives against the right maxima", self.label(*point))
                    }
                };
            }
            MaximaEvent::DropLeft { point, witness, .. } => {
                self.dominated.insert(*point);
                self.candidate = Some(*point);
                self.witness = Some(*witness);
                self.verdict = Some(Verdict::Drop);
                self.status = format!(
                    "Drop {} (dominated by {})",
                    self.label(*point),
                    self.label(*witness)
                );
            }
            MaximaEvent::KeepLeft { point, .. } => {
                self.candidate = Some(*point);
                self.witness = None;
                self.verdict = Some(Verdict::Keep);
                self.status = format!("Keep {} in merged result", self.label(*point));
            }
            MaximaEvent::MergeDone { lo, hi, result, .. } => {
                self.store_result(node, result);
                self.clear_candidate();
                self.status = format!(
                    "Merge complete for F({},{}) with {}",
                    lo,
                    hi,
                    plural(result.len(), "maximal point")
                );
            }
            MaximaEvent::Return { lo, hi, result, .. } => {
                self.store_result(node, result);
                self.statuses.set(node, NodeStatus::Done);
                if self.stack.last() == Some(&node) {
                    self.stack.pop();
                }
                if node == NodeId::ROOT {
                    let mut ids = result.clone();
                    ids.sort_unstable();
                    self.maximal = ids;
                }
                self.status = format!("Return from F({},{})", lo, hi);
            }
        }
        None
    }

    fn finish(&mut self, _nodes: &Registry<Call>) {
        self.clear_candidate();
        self.stack.clear();
        self.status = format!(
            "Complete: {} out of {}",
            plural(self.maximal.len(), "maximal point"),
            self.points.len()
        );
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn active_node(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    fn extent(&self) -> Option<Bounds> {
        Bounds::around(self.points.values().map(|p| (p.x, p.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{replay_all, replay_to};
    use crate::trace::TraceBuilder;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(i, x, y))
            .collect()
    }

    #[test]
    fn test_replay_finds_maximal_set() {
        let input = pts(&[(1.0, 5.0), (2.0, 3.0), (3.0, 4.0), (4.0, 1.0)]);
        let trace = MaximaDivideBuilder.build(&input);
        let view: MaximaDivideView = replay_all(&input, &trace);
        assert_eq!(view.maximal(), &[0, 2, 3]);
        assert!(view.is_dominated(1));
        assert_eq!(view.status(), "Complete: 3 maximal points out of 4");
    }

    #[test]
    fn test_call_stack_tracks_recursion() {
        let input = pts(&[(1.0, 1.0), (2.0, 2.0)]);
        let trace = MaximaDivideBuilder.build(&input);
        // enter root, split, enter right child
        let view: MaximaDivideView = replay_to(&input, &trace, 3);
        assert_eq!(view.call_stack(), &[NodeId(0), NodeId(2)]);
        assert_eq!(view.active_node(), Some(NodeId(2)));
        assert_eq!(view.status_of(NodeId(1)), NodeStatus::Pending);
    }

    #[test]
    fn test_labels_use_sorted_rank() {
        let input = pts(&[(9.0, 1.0), (2.0, 3.0)]);
        let trace = MaximaDivideBuilder.build(&input);
        let view: MaximaDivideView = replay_to(&input, &trace, 0);
        assert_eq!(view.label(1), "#1 (2, 3)");
        assert_eq!(view.label(0), "#2 (9, 1)");
    }
}
