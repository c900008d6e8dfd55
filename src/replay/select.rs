//! Selection replay: bar colouring, slot order, round history

use super::{plural, Interpret, Motion, NodeStatus, Scene, StatusBoard};
use crate::primitives::digits::ordinal;
use crate::primitives::rank::splitter_bounds;
use crate::trace::select::{Decision, Round, SelectBuilder, SelectEvent, Selection};
use crate::trace::{BarId, NodeId, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarState {
    /// Outside every range examined so far
    #[default]
    Idle,
    /// Inside the current range
    Active,
    Pivot,
    Rejected,
    Less,
    Greater,
    Eliminated,
    Found,
}

/// One line of round history
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub round: NodeId,
    pub lo: usize,
    pub hi: usize,
    pub rejected: usize,
    pub pivot: Option<f64>,
    pub landed: Option<usize>,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone)]
pub struct SelectView {
    values: Vec<f64>,
    k: usize,
    slots: Vec<BarId>,
    bars: Vec<BarState>,
    statuses: StatusBoard,
    range: Option<(usize, usize)>,
    current: Option<NodeId>,
    history: Vec<RoundSummary>,
    rejects: usize,
    found: Option<f64>,
    status: String,
}

impl SelectView {
    pub fn bar_state(&self, bar: BarId) -> BarState {
        self.bars.get(bar).copied().unwrap_or_default()
    }

    pub fn value(&self, bar: BarId) -> Option<f64> {
        self.values.get(bar).copied()
    }

    /// Current inclusive slot range
    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    /// Pivots rejected across every round so far
    pub fn rejects(&self) -> usize {
        self.rejects
    }

    pub fn status_of(&self, round: NodeId) -> NodeStatus {
        self.statuses.get(round)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn answer(&self) -> Option<f64> {
        self.found
    }

    fn paint(&mut self, lo: usize, hi: usize, state: BarState) {
        for slot in lo..=hi {
            if let Some(&bar) = self.slots.get(slot) {
                if let Some(b) = self.bars.get_mut(bar) {
                    *b = state;
                }
            }
        }
    }

    fn set_bar(&mut self, bar: BarId, state: BarState) {
        if let Some(b) = self.bars.get_mut(bar) {
            *b = state;
        }
    }

    fn summary(&mut self, round: NodeId) -> Option<&mut RoundSummary> {
        self.history.iter_mut().rev().find(|r| r.round == round)
    }
}

impl Interpret for SelectView {
    type Builder = SelectBuilder;
    const SCENE: Scene = Scene::Bars;

    fn new(input: &Selection, nodes: &Registry<Round>) -> Self {
        let n = input.values.len();
        SelectView {
            values: input.values.clone(),
            k: input.k,
            slots: (0..n).collect(),
            bars: vec![BarState::Idle; n],
            statuses: StatusBoard::new(nodes.len()),
            range: None,
            current: None,
            history: Vec::new(),
            rejects: 0,
            found: None,
            status: "Trace ready. Step through the QuickSelect algorithm or press Play.".to_string(),
        }
    }

    fn apply(&mut self, event: &SelectEvent, _nodes: &Registry<Round>) -> Option<Motion> {
        let round = event.round();
        match event {
            SelectEvent::Enter { lo, hi, .. } => {
                self.statuses.set(round, NodeStatus::Active);
                self.current = Some(round);
                self.range = Some((*lo, *hi));
                self.paint(*lo, *hi, BarState::Active);
                self.history.push(RoundSummary {
                    round,
                    lo: *lo,
                    hi: *hi,
                    rejected: 0,
                    pivot: None,
                    landed: None,
                    decision: None,
                });
                self.status = format!(
                    "Entering subproblem [{}..{}], looking for the {} smallest",
                    lo,
                    hi,
                    ordinal(self.k)
                );
            }
            SelectEvent::RejectPivot {
                lo,
                hi,
                pivot,
                value,
                less_count,
                range_size,
                ..
            } => {
                self.paint(*lo, *hi, BarState::Active);
                self.set_bar(*pivot, BarState::Rejected);
                self.rejects += 1;
                if let Some(r) = self.summary(round) {
                    r.rejected += 1;
                }
                let (lower, upper) = splitter_bounds(*range_size);
                self.status = format!(
                    "Rejected pivot {} with rank {} not in [{}..{}]. Reselecting...",
                    value, less_count, lower, upper
                );
            }
            SelectEvent::PickPivot {
                lo,
                hi,
                pivot,
                value,
                ..
            } => {
                self.paint(*lo, *hi, BarState::Active);
                self.set_bar(*pivot, BarState::Pivot);
                if let Some(r) = self.summary(round) {
                    r.pivot = Some(*value);
                }
                self.status = format!("Good pivot picked: {}", value);
            }
            SelectEvent::PartitionDone {
                lo,
                hi,
                p,
                pivot,
                value,
                slots,
                ..
            } => {
                self.slots = slots.clone();
                if *p > *lo {
                    self.paint(*lo, p - 1, BarState::Less);
                }
                if *p < *hi {
                    self.paint(p + 1, *hi, BarState::Greater);
                }
                self.set_bar(*pivot, BarState::Pivot);
                if let Some(r) = self.summary(round) {
                    r.landed = Some(*p);
                }
                self.status = format!("Partitioned: pivot {} landed at index {}", value, p);
                return Some(Motion::Reslot);
            }
            SelectEvent::Compare {
                lo,
                hi,
                p,
                decision,
                ..
            } => {
                if let Some(r) = self.summary(round) {
                    r.decision = Some(*decision);
                }
                self.status = match decision {
                    Decision::Found => format!(
                        "Pivot landed exactly at position {}. That's our {} smallest!",
                        p,
                        ordinal(self.k)
                    ),
                    Decision::Left => format!(
                        "Target position < pivot position (p={}). Answer is in the LEFT side [{}..{}]",
                        p,
                        lo,
                        p.saturating_sub(1)
                    ),
                    Decision::Right => format!(
                        "Target position > pivot position (p={}). Answer is in the RIGHT side [{}..{}]",
                        p,
                        p + 1,
                        hi
                    ),
                };
            }
            SelectEvent::Eliminate {
                side,
                discarded,
                pivot_slot,
                keep,
                ..
            } => {
                if !discarded.is_empty() {
                    self.paint(discarded.start, discarded.end - 1, BarState::Eliminated);
                }
                self.paint(*pivot_slot, *pivot_slot, BarState::Eliminated);
                self.statuses.set(round, NodeStatus::Done);
                self.status = format!(
                    "Eliminated {} on the {} + pivot. Range: [{}..{}]",
                    plural(discarded.len(), "element"),
                    side.label(),
                    keep.start,
                    keep.end.saturating_sub(1)
                );
            }
            SelectEvent::Found { bar, value, .. } => {
                self.set_bar(*bar, BarState::Found);
                self.statuses.set(round, NodeStatus::Done);
                self.found = Some(*value);
                self.status = format!(
                    "Found! The {} smallest element is {}",
                    ordinal(self.k),
                    value
                );
            }
        }
        None
    }

    fn finish(&mut self, _nodes: &Registry<Round>) {
        self.current = None;
        self.status = match self.found {
            Some(v) => format!("Complete! The {} smallest element is {}", ordinal(self.k), v),
            None => "Complete".to_string(),
        };
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
