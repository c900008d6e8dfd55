//! Trace builders
//!
//! Each builder runs its algorithm once, to completion, against a snapshot of
//! validated input and records every meaningful action as an immutable event.
//! The result is a [`Trace`]: the ordered event log plus the [`Registry`] of
//! recursion nodes (or sweep groups) discovered along the way.
//!
//! # Builders
//!
//! - [`karatsuba`]: recursive digit-splitting multiplication
//! - [`maxima_dc`]: maximal points by divide and conquer
//! - [`maxima_sweep`]: maximal points by a right-to-left sweep
//! - [`select`]: k-th smallest with good-splitter pivot selection
//! - [`radix`]: least-significant-digit radix sort
//! - [`segments`]: orthogonal segment intersections by sweep line
//!
//! Builders never touch presentation state; the [`replay`](crate::replay)
//! interpreters reconstruct that from the log.

pub mod karatsuba;
pub mod maxima_dc;
pub mod maxima_sweep;
pub mod radix;
pub mod registry;
pub mod segments;
pub mod select;

use std::fmt;

pub use registry::{Node, NodeId, Registry};

/// Stable identity of an input element drawn as a bar
pub type BarId = usize;

/// An event log and the node arena it refers to
#[derive(Debug, Clone)]
pub struct Trace<E, N = ()> {
    events: Vec<E>,
    nodes: Registry<N>,
}

impl<E, N> Trace<E, N> {
    pub fn new(events: Vec<E>, nodes: Registry<N>) -> Self {
        Trace { events, nodes }
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn nodes(&self) -> &Registry<N> {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Runs an algorithm over validated input and records its trace.
///
/// `build` has no side effects beyond the builder's own randomness source;
/// every run gets a fresh call.
pub trait TraceBuilder {
    type Input: Clone + fmt::Debug;
    type Event: Clone + fmt::Debug + EventKind;
    type Node: fmt::Debug;

    fn build(&mut self, input: &Self::Input) -> Trace<Self::Event, Self::Node>;
}

/// Short tag naming an event variant, used by logs and the inspector pane
pub trait EventKind {
    fn kind(&self) -> &'static str;
}
