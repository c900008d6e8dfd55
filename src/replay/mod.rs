//! Event interpreters
//!
//! An interpreter is a deterministic reducer over one algorithm's event log.
//! It owns a separate presentation state (node statuses, revealed values,
//! highlighted identities, cumulative sets, status text) and never touches the
//! [`Trace`] it reads from, so the state at any index can be rebuilt by
//! replaying the log from zero.
//!
//! # Monotonicity
//!
//! State at index `j` is always reached by applying `i+1..=j` to the state at
//! `i`; nothing is ever un-applied. Stepping backwards replays from scratch.

pub mod karatsuba;
pub mod maxima_dc;
pub mod maxima_sweep;
pub mod radix;
pub mod segments;
pub mod select;

use crate::motion::Bounds;
use crate::trace::{BarId, NodeId, Registry, Trace, TraceBuilder};

pub use karatsuba::KaratsubaView;
pub use maxima_dc::MaximaDivideView;
pub use maxima_sweep::MaximaSweepView;
pub use radix::RadixView;
pub use segments::SegmentSweepView;
pub use select::SelectView;

pub type InputOf<V> = <<V as Interpret>::Builder as TraceBuilder>::Input;
pub type EventOf<V> = <<V as Interpret>::Builder as TraceBuilder>::Event;
pub type NodeOf<V> = <<V as Interpret>::Builder as TraceBuilder>::Node;

/// Lifecycle of a recursion node or sweep group as seen by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStatus {
    /// Not yet revealed
    #[default]
    Hidden,
    /// Revealed by its parent, not yet entered
    Pending,
    Active,
    Done,
}

/// Verdict on the candidate point currently under inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
}

/// Position animation an applied event asks for. Purely visual: the logical
/// state is already final when the motion starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Bars move from their previous slots to the view's current slots
    Reslot,
    /// A bar flies into a digit bucket
    Mote { bar: BarId, digit: u8 },
    /// The sweep line glides to a new x
    Sweep { x: f64 },
}

/// What a view draws, which decides how the camera frames it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Recursion tree placed by [`TreeLayout`](crate::motion::TreeLayout)
    Tree,
    /// Bars in slots, drawn in viewport coordinates
    Bars,
    /// Points or segments in the input's own coordinates
    Plane,
}

pub trait Interpret: Sized {
    type Builder: TraceBuilder;

    const SCENE: Scene;

    /// Fresh state before any event has been applied
    fn new(input: &InputOf<Self>, nodes: &Registry<NodeOf<Self>>) -> Self;

    fn apply(&mut self, event: &EventOf<Self>, nodes: &Registry<NodeOf<Self>>) -> Option<Motion>;

    /// Called once after the last event
    fn finish(&mut self, nodes: &Registry<NodeOf<Self>>);

    fn status(&self) -> &str;

    /// Node the camera should frame, if any
    fn active_node(&self) -> Option<NodeId> {
        None
    }

    /// Bar identity occupying each slot, for array views
    fn slots(&self) -> Option<&[BarId]> {
        None
    }

    /// World rectangle holding the whole input, for plane views
    fn extent(&self) -> Option<Bounds> {
        None
    }
}

/// State after applying the first `upto` events
pub fn replay_to<V: Interpret>(
    input: &InputOf<V>,
    trace: &Trace<EventOf<V>, NodeOf<V>>,
    upto: usize,
) -> V {
    let mut view = V::new(input, trace.nodes());
    for event in trace.events().iter().take(upto) {
        view.apply(event, trace.nodes());
    }
    view
}

/// State after the whole log, finished
pub fn replay_all<V: Interpret>(input: &InputOf<V>, trace: &Trace<EventOf<V>, NodeOf<V>>) -> V {
    let mut view = replay_to::<V>(input, trace, trace.len());
    view.finish(trace.nodes());
    view
}

/// Per-node statuses stored densely by id
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    statuses: Vec<NodeStatus>,
}

impl StatusBoard {
    pub fn new(len: usize) -> Self {
        StatusBoard {
            statuses: vec![NodeStatus::Hidden; len],
        }
    }

    pub fn get(&self, id: NodeId) -> NodeStatus {
        self.statuses.get(id.index()).copied().unwrap_or_default()
    }

    pub fn set(&mut self, id: NodeId, status: NodeStatus) {
        if let Some(s) = self.statuses.get_mut(id.index()) {
            *s = status;
        }
    }

    /// Promote a hidden node to pending; leaves other states alone
    pub fn reveal(&mut self, id: NodeId) {
        if self.get(id) == NodeStatus::Hidden {
            self.set(id, NodeStatus::Pending);
        }
    }

    pub fn count(&self, status: NodeStatus) -> usize {
        self.statuses.iter().filter(|s| **s == status).count()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// `"1 thing"` / `"3 things"`
pub(crate) fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_board_reveal_only_promotes_hidden() {
        let mut board = StatusBoard::new(2);
        board.set(NodeId(1), NodeStatus::Done);
        board.reveal(NodeId(0));
        board.reveal(NodeId(1));
        assert_eq!(board.get(NodeId(0)), NodeStatus::Pending);
        assert_eq!(board.get(NodeId(1)), NodeStatus::Done);
        assert_eq!(board.get(NodeId(9)), NodeStatus::Hidden);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "point"), "1 point");
        assert_eq!(plural(0, "point"), "0 points");
    }
}
