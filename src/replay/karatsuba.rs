//! Karatsuba replay: node reveal, partial products, and the completed-call tally

use super::{Interpret, Motion, NodeStatus, Scene, StatusBoard};
use crate::primitives::digits::trim_zeros;
use crate::trace::karatsuba::{KaratsubaBuilder, KaratsubaEvent, Operands, Role, Subproduct};
use crate::trace::{NodeId, Registry};

/// Values a node has shown so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revealed {
    pub split: bool,
    pub z2: Option<u128>,
    pub z0: Option<u128>,
    pub z1: Option<u128>,
    pub result: Option<u128>,
}

#[derive(Debug, Clone)]
pub struct KaratsubaView {
    operands: Operands,
    statuses: StatusBoard,
    revealed: Vec<Revealed>,
    current: Option<NodeId>,
    status: String,
}

impl KaratsubaView {
    pub fn status_of(&self, id: NodeId) -> NodeStatus {
        self.statuses.get(id)
    }

    pub fn revealed(&self, id: NodeId) -> Option<&Revealed> {
        self.revealed.get(id.index())
    }

    /// `(completed, total)` calls
    pub fn progress(&self) -> (usize, usize) {
        (self.statuses.count(NodeStatus::Done), self.statuses.len())
    }

    /// Deepest depth among nodes that are no longer hidden
    pub fn visible_depth(&self, nodes: &Registry<Subproduct>) -> usize {
        nodes
            .iter()
            .filter(|n| self.statuses.get(n.id) != NodeStatus::Hidden)
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }

    /// Root product, once the root has returned
    pub fn product(&self) -> Option<u128> {
        self.revealed.first().and_then(|r| r.result)
    }
}

impl Interpret for KaratsubaView {
    type Builder = KaratsubaBuilder;
    const SCENE: Scene = Scene::Tree;

    fn new(input: &Operands, nodes: &Registry<Subproduct>) -> Self {
        let mut statuses = StatusBoard::new(nodes.len());
        statuses.reveal(NodeId::ROOT);
        KaratsubaView {
            operands: input.clone(),
            statuses,
            revealed: vec![Revealed::default(); nodes.len()],
            current: None,
            status: "Trace built. Step through the Karatsuba recursion or press Play.".to_string(),
        }
    }

    fn apply(&mut self, event: &KaratsubaEvent, nodes: &Registry<Subproduct>) -> Option<Motion> {
        let node = event.node();
        match event {
            KaratsubaEvent::Enter { x, y, depth, .. } => {
                self.statuses.set(node, NodeStatus::Active);
                self.current = Some(node);
                self.status = format!(
                    "Enter: {} × {} (depth {})",
                    trim_zeros(x),
                    trim_zeros(y),
                    depth
                );
            }
            KaratsubaEvent::Base { x, y, result, .. } => {
                self.reveal(node).result = Some(*result);
                self.status = format!(
                    "Base case: {} × {} = {}",
                    trim_zeros(x),
                    trim_zeros(y),
                    result
                );
            }
            KaratsubaEvent::Split {
                x_high,
                x_low,
                y_high,
                y_low,
                m,
                children,
                ..
            } => {
                for &child in children {
                    self.statuses.reveal(child);
                }
                self.reveal(node).split = true;
                self.status = format!(
                    "Split: xH={}, xL={}, yH={}, yL={}, m={}",
                    trim_zeros(x_high),
                    trim_zeros(x_low),
                    trim_zeros(y_high),
                    trim_zeros(y_low),
                    m
                );
            }
            KaratsubaEvent::ComputeZ2 { a, b, .. } => {
                self.current = Some(node);
                self.status = format!("Computing z2 = {} × {}", trim_zeros(a), trim_zeros(b));
            }
            KaratsubaEvent::ComputeZ0 { a, b, .. } => {
                self.current = Some(node);
                self.status = format!("Computing z0 = {} × {}", trim_zeros(a), trim_zeros(b));
            }
            KaratsubaEvent::ComputeZ1Setup { sum_x, sum_y, .. } => {
                self.current = Some(node);
                self.status = format!(
                    "Computing z1: ({}) × ({}) then subtract z2 and z0",
                    trim_zeros(sum_x),
                    trim_zeros(sum_y)
                );
            }
            KaratsubaEvent::ComputeZ1Subtract {
                z1_product,
                z2,
                z0,
                z1,
                ..
            } => {
                let r = self.reveal(node);
                r.z2 = Some(*z2);
                r.z0 = Some(*z0);
                r.z1 = Some(*z1);
                self.status = format!("z1 = {} − {} − {} = {}", z1_product, z2, z0, z1);
            }
            KaratsubaEvent::Combine {
                z2,
                z1,
                z0,
                m,
                result,
                ..
            } => {
                self.reveal(node).result = Some(*result);
                self.status = format!(
                    "Combine: {}·10^{} + {}·10^{} + {} = {}",
                    z2,
                    2 * m,
                    z1,
                    m,
                    z0,
                    result
                );
            }
            KaratsubaEvent::Return { result, .. } => {
                self.statuses.set(node, NodeStatus::Done);
                self.reveal(node).result = Some(*result);
                let Some(n) = nodes.get(node) else {
                    return None;
                };
                if let Some(parent) = n.parent {
                    let slot = self.reveal(parent);
                    match n.data.role {
                        Role::Z2 => slot.z2 = Some(*result),
                        Role::Z0 => slot.z0 = Some(*result),
                        Role::Z1 | Role::Root => {}
                    }
                }
                self.current = n.parent.or(Some(node));
                self.status = format!(
                    "Return {} from {} × {}",
                    result,
                    trim_zeros(&n.data.x),
                    trim_zeros(&n.data.y)
                );
            }
        }
        tracing::trace!(kind = "karatsuba", node = node.index(), "applied");
        None
    }

    fn finish(&mut self, _nodes: &Registry<Subproduct>) {
        self.current = None;
        self.status = match self.product() {
            Some(result) => format!(
                "Complete: {} × {} = {}",
                self.operands.x, self.operands.y, result
            ),
            None => "Complete".to_string(),
        };
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn active_node(&self) -> Option<NodeId> {
        self.current
    }
}

impl KaratsubaView {
    fn reveal(&mut self, id: NodeId) -> &mut Revealed {
        let index = id.index();
        if index >= self.revealed.len() {
            self.revealed.resize(index + 1, Revealed::default());
        }
        &mut self.revealed[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{replay_all, replay_to};
    use crate::trace::TraceBuilder;

    #[test]
    fn test_full_replay_reveals_product() {
        let input = Operands::new("1234", "5678");
        let trace = KaratsubaBuilder.build(&input);
        let view: KaratsubaView = replay_all(&input, &trace);
        assert_eq!(view.product(), Some(7_006_652));
        assert_eq!(view.progress(), (trace.nodes().len(), trace.nodes().len()));
        assert_eq!(view.status(), "Complete: 1234 × 5678 = 7006652");
        assert_eq!(view.active_node(), None);
    }

    #[test]
    fn test_split_reveals_children_as_pending() {
        let input = Operands::new("1234", "5678");
        let trace = KaratsubaBuilder.build(&input);
        let view: KaratsubaView = replay_to(&input, &trace, 2);
        assert_eq!(view.status_of(NodeId::ROOT), NodeStatus::Active);
        for child in trace.nodes().children(NodeId::ROOT) {
            assert_eq!(view.status_of(*child), NodeStatus::Pending);
        }
        assert_eq!(view.visible_depth(trace.nodes()), 1);
        assert!(view.status().starts_with("Split: xH=12"));
    }

    #[test]
    fn test_child_return_fills_parent_partial() {
        let input = Operands::new("12", "34");
        let trace = KaratsubaBuilder.build(&input);
        // enter, split, compute-z2, enter z2, base, return z2
        let view: KaratsubaView = replay_to(&input, &trace, 6);
        let root = view.revealed(NodeId::ROOT).cloned().unwrap_or_default();
        assert_eq!(root.z2, Some(3));
        assert_eq!(root.result, None);
        assert_eq!(view.active_node(), Some(NodeId::ROOT));
    }
}
