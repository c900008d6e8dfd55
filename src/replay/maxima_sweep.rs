//! Sweep-line maxima replay

use rustc_hash::{FxHashMap, FxHashSet};

use super::{plural, Interpret, Motion, NodeStatus, Scene, StatusBoard, Verdict};
use crate::motion::Bounds;
use crate::primitives::geometry::{sorted_by_x, Point, PointId};
use crate::trace::maxima_sweep::{DropReason, Group, MaximaSweepBuilder, SweepEvent};
use crate::trace::{NodeId, Registry};

#[derive(Debug, Clone)]
pub struct MaximaSweepView {
    points: FxHashMap<PointId, Point>,
    rank: FxHashMap<PointId, usize>,
    statuses: StatusBoard,
    current: Option<NodeId>,
    processed: FxHashSet<PointId>,
    dominated: FxHashSet<PointId>,
    maximal: FxHashSet<PointId>,
    candidate: Option<PointId>,
    witness: Option<PointId>,
    verdict: Option<Verdict>,
    right_max: Option<(f64, Option<PointId>)>,
    sweep_x: Option<f64>,
    status: String,
}

impl MaximaSweepView {
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

    pub fn is_processed(&self, id: PointId) -> bool {
        self.processed.contains(&id)
    }

    pub fn is_dominated(&self, id: PointId) -> bool {
        self.dominated.contains(&id)
    }

    pub fn is_maximal(&self, id: PointId) -> bool {
        self.maximal.contains(&id)
    }

    /// Maximal points found so far, ascending by id
    pub fn maximal(&self) -> Vec<PointId> {
        let mut ids: Vec<_> = self.maximal.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn candidate(&self) -> Option<(PointId, Option<PointId>, Option<Verdict>)> {
        self.candidate.map(|c| (c, self.witness, self.verdict))
    }

    /// Highest y among strictly larger x, with the point holding it
    pub fn right_max(&self) -> Option<(f64, Option<PointId>)> {
        self.right_max
    }

    /// x the sweep line last moved to
    pub fn sweep_x(&self) -> Option<f64> {
        self.sweep_x
    }

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
}

impl Interpret for MaximaSweepView {
    type Builder = MaximaSweepBuilder;
    const SCENE: Scene = Scene::Plane;

    fn new(input: &Vec<Point>, nodes: &Registry<Group>) -> Self {
        let rank = sorted_by_x(input)
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        MaximaSweepView {
            points: input.iter().map(|p| (p.id, *p)).collect(),
            rank,
            statuses: StatusBoard::new(nodes.len()),
            current: None,
            processed: FxHashSet::default(),
            dominated: FxHashSet::default(),
            maximal: FxHashSet::default(),
            candidate: None,
            witness: None,
            verdict: None,
            right_max: None,
            sweep_x: None,
            status: "Points sorted by x and relabeled as #1 to #n. Sweep right-to-left with rightMaxY."
                .to_string(),
        }
    }

    fn apply(&mut self, event: &SweepEvent, _nodes: &Registry<Group>) -> Option<Motion> {
        let group = event.group();
        match event {
            SweepEvent::EnterGroup { x, points, .. } => {
                self.statuses.set(group, NodeStatus::Active);
                self.current = Some(group);
                self.clear_candidate();
                self.sweep_x = Some(*x);
                self.status = format!(
                    "Sweep at x={}: processing {}",
                    x.round(),
                    plural(points.len(), "point")
                );
                return Some(Motion::Sweep { x: *x });
            }
            SweepEvent::CheckPoint {
                point,
                reason,
                witness,
                right_max_y,
                ..
            } => {
                self.candidate = Some(*point);
                self.witness = *witness;
                self.status = match reason {
                    Some(DropReason::SameX) => {
                        self.verdict = Some(Verdict::Drop);
                        format!(
                            "{} is dominated by a higher point at the same x",
                            self.label(*point)
                        )
                    }
                    Some(DropReason::Right) => {
                        self.verdict = Some(Verdict::Drop);
                        format!(
                            "{} is dominated by right region (rightMaxY={})",
                            self.label(*point),
                            right_max_y.unwrap_or(0.0).round()
                        )
                    }
                    None => {
                        self.verdict = Some(Verdict::Keep);
                        format!("{} survives and becomes maximal so far", self.label(*point))
                    }
                };
            }
            SweepEvent::DropPoint { point, witness, .. } => {
                self.processed.insert(*point);
                self.dominated.insert(*point);
                self.candidate = Some(*point);
                self.witness = *witness;
                self.verdict = Some(Verdict::Drop);
                self.status = format!("Drop {}", self.label(*point));
            }
            SweepEvent::KeepPoint { point, .. } => {
                self.processed.insert(*point);
                self.maximal.insert(*point);
                self.candidate = Some(*point);
                self.witness = None;
                self.verdict = Some(Verdict::Keep);
                self.status = format!("Keep {} as maximal", self.label(*point));
            }
            SweepEvent::GroupDone {
                x,
                right_max_y,
                witness,
                ..
            } => {
                self.statuses.set(group, NodeStatus::Done);
                self.clear_candidate();
                self.right_max = right_max_y.map(|y| (y, *witness));
                self.status = format!("Group at x={} complete", x.round());
            }
        }
        None
    }

    fn finish(&mut self, _nodes: &Registry<Group>) {
        self.current = None;
        self.clear_candidate();
        self.sweep_x = None;
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
        self.current
    }

    fn extent(&self) -> Option<Bounds> {
        Bounds::around(self.points.values().map(|p| (p.x, p.y)))
    }
}
