//! Radix sort replay: buckets fill as bars are distributed and drain on collect

use super::{Interpret, Motion, NodeStatus, Scene, StatusBoard};
use crate::primitives::digits::{digit_at, position_label, RADIX};
use crate::trace::radix::{Pass, RadixBuilder, RadixEvent};
use crate::trace::{BarId, NodeId, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Distributing,
    Collected,
}

/// One line of pass history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub pass: NodeId,
    pub position: u32,
    pub bucket_sizes: [usize; RADIX],
    pub state: PassState,
}

#[derive(Debug, Clone)]
pub struct RadixView {
    values: Vec<u64>,
    slots: Vec<BarId>,
    buckets: [Vec<BarId>; RADIX],
    statuses: StatusBoard,
    current: Option<NodeId>,
    position: Option<u32>,
    total_passes: u32,
    examining: Option<BarId>,
    history: Vec<PassSummary>,
    sorted: bool,
    status: String,
}

impl RadixView {
    pub fn value(&self, bar: BarId) -> Option<u64> {
        self.values.get(bar).copied()
    }

    pub fn buckets(&self) -> &[Vec<BarId>; RADIX] {
        &self.buckets
    }

    /// Digit position of the pass in progress
    pub fn position(&self) -> Option<u32> {
        self.position
    }

    /// Digit of `bar` at the current position, for highlighting
    pub fn current_digit(&self, bar: BarId) -> Option<u8> {
        Some(digit_at(self.value(bar)?, self.position?))
    }

    pub fn examining(&self) -> Option<BarId> {
        self.examining
    }

    pub fn total_passes(&self) -> u32 {
        self.total_passes
    }

    pub fn history(&self) -> &[PassSummary] {
        &self.history
    }

    pub fn status_of(&self, pass: NodeId) -> NodeStatus {
        self.statuses.get(pass)
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Values in current slot order
    pub fn sorted_values(&self) -> Vec<u64> {
        self.slots
            .iter()
            .filter_map(|&bar| self.value(bar))
            .collect()
    }

    fn summary(&mut self, pass: NodeId) -> Option<&mut PassSummary> {
        self.history.iter_mut().rev().find(|s| s.pass == pass)
    }
}

impl Interpret for RadixView {
    type Builder = RadixBuilder;
    const SCENE: Scene = Scene::Bars;

    fn new(input: &Vec<u64>, nodes: &Registry<Pass>) -> Self {
        RadixView {
            values: input.clone(),
            slots: (0..input.len()).collect(),
            buckets: Default::default(),
            statuses: StatusBoard::new(nodes.len()),
            current: None,
            position: None,
            total_passes: nodes.len() as u32,
            examining: None,
            history: Vec::new(),
            sorted: false,
            status: "Trace ready. Step through the Radix Sort algorithm or press Play.".to_string(),
        }
    }

    fn apply(&mut self, event: &RadixEvent, _nodes: &Registry<Pass>) -> Option<Motion> {
        match event {
            RadixEvent::StartPass {
                pass,
                position,
                total_passes,
            } => {
                self.statuses.set(*pass, NodeStatus::Active);
                self.current = Some(*pass);
                self.position = Some(*position);
                self.total_passes = *total_passes;
                self.examining = None;
                for bucket in &mut self.buckets {
                    bucket.clear();
                }
                self.history.push(PassSummary {
                    pass: *pass,
                    position: *position,
                    bucket_sizes: [0; RADIX],
                    state: PassState::Distributing,
                });
                self.status = format!(
                    "Pass {}/{}: Sorting by {} digit",
                    position + 1,
                    total_passes,
                    position_label(*position)
                );
            }
            RadixEvent::Examine {
                bar, value, digit, ..
            } => {
                self.examining = Some(*bar);
                let label = self.position.map(position_label).unwrap_or_default();
                self.status = format!("Examining {}: {} digit is {}", value, label, digit);
            }
            RadixEvent::Distribute {
                pass,
                bar,
                value,
                digit,
            } => {
                let d = usize::from(*digit);
                if let Some(bucket) = self.buckets.get_mut(d) {
                    bucket.push(*bar);
                }
                if let Some(s) = self.summary(*pass) {
                    s.bucket_sizes[d % RADIX] += 1;
                }
                self.status = format!("Placed {} into bucket {}", value, digit);
                return Some(Motion::Mote {
                    bar: *bar,
                    digit: *digit,
                });
            }
            RadixEvent::Collect {
                pass,
                position,
                slots,
            } => {
                self.slots = slots.clone();
                for bucket in &mut self.buckets {
                    bucket.clear();
                }
                self.examining = None;
                self.statuses.set(*pass, NodeStatus::Done);
                if let Some(s) = self.summary(*pass) {
                    s.state = PassState::Collected;
                }
                self.status = format!(
                    "Pass {}: Collected all buckets back into array",
                    position + 1
                );
                return Some(Motion::Reslot);
            }
            RadixEvent::Complete => {
                self.sorted = true;
                self.current = None;
                self.examining = None;
                self.status = "Radix Sort complete! Array is now sorted.".to_string();
            }
        }
        None
    }

    fn finish(&mut self, _nodes: &Registry<Pass>) {
        self.current = None;
        self.position = None;
        self.examining = None;
        self.status = "Radix Sort complete! Array is now sorted.".to_string();
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn active_node(&self) -> Option<NodeId> {
        self.current
    }

    fn slots(&self) -> Option<&[BarId]> {
        Some(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{replay_all, replay_to};
    use crate::trace::TraceBuilder;

    fn example() -> Vec<u64> {
        vec![170, 45, 75, 90, 802, 24, 2, 66]
    }

    #[test]
    fn test_full_replay_sorts() {
        let input = example();
        let trace = RadixBuilder.build(&input);
        let view: RadixView = replay_all(&input, &trace);
        assert!(view.is_sorted());
        assert_eq!(view.sorted_values(), vec![2, 24, 45, 66, 75, 90, 170, 802]);
        assert_eq!(view.history().len(), 3);
        assert!(view
            .history()
            .iter()
            .all(|p| p.state == PassState::Collected));
    }

    #[test]
    fn test_distribute_fills_bucket_and_requests_mote() {
        let input = example();
        let trace = RadixBuilder.build(&input);
        // start-pass, examine 170
        let mut view: RadixView = replay_to(&input, &trace, 2);
        assert_eq!(view.examining(), Some(0));
        assert_eq!(view.status(), "Examining 170: ones digit is 0");
        let motion = trace.get(2).and_then(|e| view.apply(e, trace.nodes()));
        assert_eq!(motion, Some(Motion::Mote { bar: 0, digit: 0 }));
        assert_eq!(view.buckets()[0], vec![0]);
        assert_eq!(view.history()[0].bucket_sizes[0], 1);
    }

    #[test]
    fn test_collect_drains_buckets() {
        let input = example();
        let trace = RadixBuilder.build(&input);
        // start-pass + 8 × (examine, distribute) + collect
        let view: RadixView = replay_to(&input, &trace, 18);
        assert!(view.buckets().iter().all(|b| b.is_empty()));
        assert_eq!(view.status_of(NodeId(0)), NodeStatus::Done);
        assert_eq!(view.slots().map(|s| s[0..2].to_vec()), Some(vec![0, 3]));
    }
}
