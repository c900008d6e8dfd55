//! Karatsuba multiplication trace
//!
//! Operands are padded to equal length at every level and split at
//! `m = ⌊n/2⌋`, the high halves keeping `n - m` digits. All three children
//! (`z2`, `z0`, `z1`) are registered before any of them is solved so a single
//! `Split` event can reveal the whole child row.

use super::{EventKind, NodeId, Registry, Trace, TraceBuilder};
use crate::primitives::digits::{digits_value, pad_to_equal};

/// Validated operands: non-empty decimal digit strings without leading zeros
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operands {
    pub x: String,
    pub y: String,
}

impl Operands {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Operands {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Direct product, for checking a replay against
    pub fn product(&self) -> u128 {
        digits_value(&self.x) * digits_value(&self.y)
    }
}

/// Which partial product a node computes for its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    Z2,
    Z0,
    Z1,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::Z2 => "z2",
            Role::Z0 => "z0",
            Role::Z1 => "z1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub x_high: String,
    pub x_low: String,
    pub y_high: String,
    pub y_low: String,
    pub m: usize,
    pub sum_x: String,
    pub sum_y: String,
}

/// Payload of one recursion node
#[derive(Debug, Clone)]
pub struct Subproduct {
    pub role: Role,
    /// Padded operands
    pub x: String,
    pub y: String,
    pub split: Option<Split>,
    pub z2: Option<u128>,
    pub z0: Option<u128>,
    pub z1_product: Option<u128>,
    pub z1: Option<u128>,
    pub result: u128,
}

impl Subproduct {
    fn new(role: Role, x: String, y: String) -> Self {
        Subproduct {
            role,
            x,
            y,
            split: None,
            z2: None,
            z0: None,
            z1_product: None,
            z1: None,
            result: 0,
        }
    }

    pub fn is_base(&self) -> bool {
        self.split.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KaratsubaEvent {
    Enter {
        node: NodeId,
        x: String,
        y: String,
        depth: usize,
    },
    Base {
        node: NodeId,
        x: String,
        y: String,
        result: u128,
    },
    Split {
        node: NodeId,
        x_high: String,
        x_low: String,
        y_high: String,
        y_low: String,
        m: usize,
        children: [NodeId; 3],
    },
    ComputeZ2 {
        node: NodeId,
        a: String,
        b: String,
    },
    ComputeZ0 {
        node: NodeId,
        a: String,
        b: String,
    },
    ComputeZ1Setup {
        node: NodeId,
        sum_x: String,
        sum_y: String,
    },
    ComputeZ1Subtract {
        node: NodeId,
        z1_product: u128,
        z2: u128,
        z0: u128,
        z1: u128,
    },
    Combine {
        node: NodeId,
        z2: u128,
        z1: u128,
        z0: u128,
        m: usize,
        result: u128,
    },
    Return {
        node: NodeId,
        result: u128,
    },
}

impl KaratsubaEvent {
    pub fn node(&self) -> NodeId {
        match self {
            KaratsubaEvent::Enter { node, .. }
            | KaratsubaEvent::Base { node, .. }
            | KaratsubaEvent::Split { node, .. }
            | KaratsubaEvent::ComputeZ2 { node, .. }
            | KaratsubaEvent::ComputeZ0 { node, .. }
            | KaratsubaEvent::ComputeZ1Setup { node, .. }
            | KaratsubaEvent::ComputeZ1Subtract { node, .. }
            | KaratsubaEvent::Combine { node, .. }
            | KaratsubaEvent::Return { node, .. } => *node,
        }
    }
}

impl EventKind for KaratsubaEvent {
    fn kind(&self) -> &'static str {
        match self {
            KaratsubaEvent::Enter { .. } => "enter",
            KaratsubaEvent::Base { .. } => "base",
            KaratsubaEvent::Split { .. } => "split",
            KaratsubaEvent::ComputeZ2 { .. } => "compute-z2",
            KaratsubaEvent::ComputeZ0 { .. } => "compute-z0",
            KaratsubaEvent::ComputeZ1Setup { .. } => "compute-z1-setup",
            KaratsubaEvent::ComputeZ1Subtract { .. } => "compute-z1-subtract",
            KaratsubaEvent::Combine { .. } => "combine",
            KaratsubaEvent::Return { .. } => "return",
        }
    }
}

#[derive(Debug, Default)]
pub struct KaratsubaBuilder;

impl TraceBuilder for KaratsubaBuilder {
    type Input = Operands;
    type Event = KaratsubaEvent;
    type Node = Subproduct;

    fn build(&mut self, input: &Operands) -> Trace<KaratsubaEvent, Subproduct> {
        let mut run = Recursion::default();
        let (x, y) = pad_to_equal(&input.x, &input.y);
        let root = run.nodes.insert(None, Subproduct::new(Role::Root, x, y));
        run.solve(root);
        tracing::debug!(
            events = run.events.len(),
            nodes = run.nodes.len(),
            "karatsuba trace built"
        );
        Trace::new(run.events, run.nodes)
    }
}

#[derive(Default)]
struct Recursion {
    nodes: Registry<Subproduct>,
    events: Vec<KaratsubaEvent>,
}

impl Recursion {
    fn solve(&mut self, id: NodeId) -> u128 {
        let depth = self.nodes[id].depth;
        let (x, y) = {
            let data = &self.nodes[id].data;
            pad_to_equal(&data.x, &data.y)
        };
        if let Some(data) = self.nodes.data_mut(id) {
            data.x = x.clone();
            data.y = y.clone();
        }

        self.events.push(KaratsubaEvent::Enter {
            node: id,
            x: x.clone(),
            y: y.clone(),
            depth,
        });

        if x.len() <= 1 {
            let result = digits_value(&x) * digits_value(&y);
            self.set(id, |d| d.result = result);
            self.events.push(KaratsubaEvent::Base {
                node: id,
                x,
                y,
                result,
            });
            self.events.push(KaratsubaEvent::Return { node: id, result });
            return result;
        }

        let n = x.len();
        let m = n / 2;
        let (x_high, x_low) = x.split_at(n - m);
        let (y_high, y_low) = y.split_at(n - m);
        let sum_x = (digits_value(x_high) + digits_value(x_low)).to_string();
        let sum_y = (digits_value(y_high) + digits_value(y_low)).to_string();

        let children = [
            (Role::Z2, x_high, y_high),
            (Role::Z0, x_low, y_low),
            (Role::Z1, sum_x.as_str(), sum_y.as_str()),
        ]
        .map(|(role, a, b)| {
            let (a, b) = pad_to_equal(a, b);
            self.nodes.insert(Some(id), Subproduct::new(role, a, b))
        });
        let [z2_id, z0_id, z1_id] = children;

        let split = Split {
            x_high: x_high.to_string(),
            x_low: x_low.to_string(),
            y_high: y_high.to_string(),
            y_low: y_low.to_string(),
            m,
            sum_x: sum_x.clone(),
            sum_y: sum_y.clone(),
        };
        self.events.push(KaratsubaEvent::Split {
            node: id,
            x_high: split.x_high.clone(),
            x_low: split.x_low.clone(),
            y_high: split.y_high.clone(),
            y_low: split.y_low.clone(),
            m,
            children,
        });
        self.set(id, |d| d.split = Some(split.clone()));

        self.events.push(KaratsubaEvent::ComputeZ2 {
            node: id,
            a: split.x_high.clone(),
            b: split.y_high.clone(),
        });
        let z2 = self.solve(z2_id);
        self.set(id, |d| d.z2 = Some(z2));

        self.events.push(KaratsubaEvent::ComputeZ0 {
            node: id,
            a: split.x_low.clone(),
            b: split.y_low.clone(),
        });
        let z0 = self.solve(z0_id);
        self.set(id, |d| d.z0 = Some(z0));

        self.events.push(KaratsubaEvent::ComputeZ1Setup {
            node: id,
            sum_x,
            sum_y,
        });
        let z1_product = self.solve(z1_id);
        let z1 = z1_product - z2 - z0;
        self.set(id, |d| {
            d.z1_product = Some(z1_product);
            d.z1 = Some(z1);
        });
        self.events.push(KaratsubaEvent::ComputeZ1Subtract {
            node: id,
            z1_product,
            z2,
            z0,
            z1,
        });

        let scale = 10u128.pow(m as u32);
        let result = z2 * scale * scale + z1 * scale + z0;
        self.set(id, |d| d.result = result);
        self.events.push(KaratsubaEvent::Combine {
            node: id,
            z2,
            z1,
            z0,
            m,
            result,
        });
        self.events.push(KaratsubaEvent::Return { node: id, result });
        result
    }

    fn set(&mut self, id: NodeId, f: impl FnOnce(&mut Subproduct)) {
        if let Some(data) = self.nodes.data_mut(id) {
            f(data);
        }
    }
}
