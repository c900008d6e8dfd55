//! Least-significant-digit radix sort trace
//!
//! The number of passes is the decimal digit count of the largest value. Each
//! pass examines every slot in order, appends the bar to the bucket of its
//! digit, then concatenates buckets 0 through 9 back into the working array.

use super::{BarId, EventKind, NodeId, Registry, Trace, TraceBuilder};
use crate::primitives::digits::{bucket_by_digit, digit_at, num_digits, RADIX};

/// One pass over a single digit position
#[derive(Debug, Clone)]
pub struct Pass {
    pub position: u32,
    /// Bucket sizes once the pass has distributed every bar
    pub bucket_sizes: [usize; RADIX],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadixEvent {
    StartPass {
        pass: NodeId,
        position: u32,
        total_passes: u32,
    },
    Examine {
        pass: NodeId,
        bar: BarId,
        value: u64,
        digit: u8,
        slot: usize,
    },
    Distribute {
        pass: NodeId,
        bar: BarId,
        value: u64,
        digit: u8,
    },
    Collect {
        pass: NodeId,
        position: u32,
        /// Bar occupying each slot after concatenating the buckets
        slots: Vec<BarId>,
    },
    Complete,
}

impl RadixEvent {
    pub fn pass(&self) -> Option<NodeId> {
        match self {
            RadixEvent::StartPass { pass, .. }
            | RadixEvent::Examine { pass, .. }
            | RadixEvent::Distribute { pass, .. }
            | RadixEvent::Collect { pass, .. } => Some(*pass),
            RadixEvent::Complete => None,
        }
    }
}

impl EventKind for RadixEvent {
    fn kind(&self) -> &'static str {
        match self {
            RadixEvent::StartPass { .. } => "start-pass",
            RadixEvent::Examine { .. } => "examine",
            RadixEvent::Distribute { .. } => "distribute",
            RadixEvent::Collect { .. } => "collect",
            RadixEvent::Complete => "complete",
        }
    }
}

#[derive(Debug, Default)]
pub struct RadixBuilder;

impl TraceBuilder for RadixBuilder {
    type Input = Vec<u64>;
    type Event = RadixEvent;
    type Node = Pass;

    fn build(&mut self, input: &Vec<u64>) -> Trace<RadixEvent, Pass> {
        let mut nodes = Registry::new();
        let mut events = Vec::new();
        if input.is_empty() {
            return Trace::new(events, nodes);
        }

        let max = input.iter().copied().max().unwrap_or(0);
        let total_passes = num_digits(max);
        let mut work: Vec<(BarId, u64)> = input.iter().copied().enumerate().collect();

        for position in 0..total_passes {
            let pass = nodes.insert(
                None,
                Pass {
                    position,
                    bucket_sizes: [0; RADIX],
                },
            );
            events.push(RadixEvent::StartPass {
                pass,
                position,
                total_passes,
            });

            for (slot, &(bar, value)) in work.iter().enumerate() {
                let digit = digit_at(value, position);
                events.push(RadixEvent::Examine {
                    pass,
                    bar,
                    value,
                    digit,
                    slot,
                });
                events.push(RadixEvent::Distribute {
                    pass,
                    bar,
                    value,
                    digit,
                });
            }

            let buckets = bucket_by_digit(work.iter().copied(), position);
            if let Some(p) = nodes.data_mut(pass) {
                for (size, bucket) in p.bucket_sizes.iter_mut().zip(&buckets) {
                    *size = bucket.len();
                }
            }
            work = buckets.into_iter().flatten().collect();
            events.push(RadixEvent::Collect {
                pass,
                position,
                slots: work.iter().map(|&(bar, _)| bar).collect(),
            });
        }
        events.push(RadixEvent::Complete);

        tracing::debug!(
            events = events.len(),
            passes = nodes.len(),
            "radix trace built"
        );
        Trace::new(events, nodes)
    }
}
