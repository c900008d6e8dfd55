//! Segment sweep replay
//!
//! The view keeps its own [`ActiveSet`], applying inserts and removals as the
//! log dictates, and appends each vertical's hits to the intersection list.

use rustc_hash::FxHashSet;

use super::{plural, Interpret, Motion, NodeStatus, Scene, StatusBoard};
use crate::motion::Bounds;
use crate::primitives::geometry::{Segment, SegmentId};
use crate::trace::segments::{ActiveSet, Column, SegmentEvent, SegmentSweepBuilder};
use crate::trace::{NodeId, Registry};

#[derive(Debug, Clone)]
pub struct SegmentSweepView {
    segments: Vec<Segment>,
    active: ActiveSet,
    retired: FxHashSet<SegmentId>,
    statuses: StatusBoard,
    current: Option<NodeId>,
    current_segment: Option<SegmentId>,
    /// Range of the vertical being queried, if any
    query: Option<(f64, f64)>,
    intersections: Vec<(f64, f64)>,
    sweep_x: Option<f64>,
    status: String,
}

impl SegmentSweepView {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// Horizontal whose right endpoint the sweep has passed
    pub fn is_retired(&self, id: SegmentId) -> bool {
        self.retired.contains(&id)
    }

    pub fn current_segment(&self) -> Option<SegmentId> {
        self.current_segment
    }

    pub fn query(&self) -> Option<(f64, f64)> {
        self.query
    }

    /// Intersections reported so far, in sweep order
    pub fn intersections(&self) -> &[(f64, f64)] {
        &self.intersections
    }

    pub fn sweep_x(&self) -> Option<f64> {
        self.sweep_x
    }

    pub fn status_of(&self, column: NodeId) -> NodeStatus {
        self.statuses.get(column)
    }
}

impl Interpret for SegmentSweepView {
    type Builder = SegmentSweepBuilder;
    const SCENE: Scene = Scene::Plane;

    fn new(input: &Vec<Segment>, nodes: &Registry<Column>) -> Self {
        SegmentSweepView {
            segments: input.clone(),
            active: ActiveSet::new(),
            retired: FxHashSet::default(),
            statuses: StatusBoard::new(nodes.len()),
            current: None,
            current_segment: None,
            query: None,
            intersections: Vec::new(),
            sweep_x: None,
            status: "Step through events or press Play".to_string(),
        }
    }

    fn apply(&mut self, event: &SegmentEvent, _nodes: &Registry<Column>) -> Option<Motion> {
        let column = event.column();
        if let Some(prev) = self.current.filter(|&c| c != column) {
            self.statuses.set(prev, NodeStatus::Done);
        }
        self.statuses.set(column, NodeStatus::Active);
        self.current = Some(column);
        self.current_segment = Some(event.segment());
        self.query = None;

        match event {
            SegmentEvent::Start { segment, y, .. } => {
                self.active.insert(*segment, *y);
                self.status = format!("Left endpoint (y={}): inserting into BST", y.round());
            }
            SegmentEvent::End { segment, y, .. } => {
                self.active.remove(*segment);
                self.retired.insert(*segment);
                self.status = format!("Right endpoint (y={}): deleting from BST", y.round());
            }
            SegmentEvent::Vertical {
                x, y1, y2, hits, ..
            } => {
                self.query = Some((*y1, *y2));
                self.intersections.extend(hits.iter().map(|&(_, y)| (*x, y)));
                self.status = format!(
                    "Vertical line at x={}: range query [{}, {}] hits {}",
                    x.round(),
                    y1.round(),
                    y2.round(),
                    hits.len()
                );
            }
        }

        let x = event.x();
        self.sweep_x = Some(x);
        Some(Motion::Sweep { x })
    }

    fn finish(&mut self, _nodes: &Registry<Column>) {
        if let Some(prev) = self.current.take() {
            self.statuses.set(prev, NodeStatus::Done);
        }
        self.current_segment = None;
        self.query = None;
        self.sweep_x = None;
        self.status = format!(
            "Complete: found {} among {}",
            plural(self.intersections.len(), "intersection"),
            plural(self.segments.len(), "segment")
        );
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn active_node(&self) -> Option<NodeId> {
        self.current
    }

    fn extent(&self) -> Option<Bounds> {
        Bounds::around(self.segments.iter().flat_map(|s| {
            let (a, b) = s.endpoints();
            [a, b]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{replay_all, replay_to};
    use crate::trace::TraceBuilder;

    fn cross() -> Vec<Segment> {
        vec![
            Segment::horizontal(0, 5.0, 0.0, 10.0),
            Segment::vertical(1, 4.0, 0.0, 8.0),
        ]
    }

    #[test]
    fn test_active_set_follows_log() {
        let input = cross();
        let trace = SegmentSweepBuilder.build(&input);
        let view: SegmentSweepView = replay_to(&input, &trace, 1);
        assert!(view.active().contains(0));
        assert_eq!(view.sweep_x(), Some(0.0));
        let view: SegmentSweepView = replay_to(&input, &trace, 3);
        assert!(view.active().is_empty());
        assert!(view.is_retired(0));
    }

    #[test]
    fn test_vertical_reports_hits() {
        let input = cross();
        let trace = SegmentSweepBuilder.build(&input);
        let mut view: SegmentSweepView = replay_to(&input, &trace, 1);
        let motion = trace.get(1).and_then(|e| view.apply(e, trace.nodes()));
        assert_eq!(motion, Some(Motion::Sweep { x: 4.0 }));
        assert_eq!(view.intersections(), &[(4.0, 5.0)]);
        assert_eq!(view.query(), Some((0.0, 8.0)));
    }

    #[test]
    fn test_finish_status() {
        let input = cross();
        let trace = SegmentSweepBuilder.build(&input);
        let view: SegmentSweepView = replay_all(&input, &trace);
        assert_eq!(view.status(), "Complete: found 1 intersection among 2 segments");
        assert_eq!(view.status_of(NodeId(0)), NodeStatus::Done);
    }
}
