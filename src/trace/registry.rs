//! Flat arena of recursion nodes and sweep groups
//!
//! Nodes are appended while a trace is built and never removed. Parent and
//! child links are plain [`NodeId`]s into the arena, so the tree shape and the
//! replay state that refers to it never borrow each other.

use std::fmt;
use std::ops::Index;

/// Monotonically assigned identity of a node; the first node is the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node<N> {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub data: N,
}

#[derive(Debug, Clone)]
pub struct Registry<N> {
    nodes: Vec<Node<N>>,
}

impl<N> Registry<N> {
    pub fn new() -> Self {
        Registry { nodes: Vec::new() }
    }

    /// Append a node under `parent` (or as a free-standing entry) and return its id
    pub fn insert(&mut self, parent: Option<NodeId>, data: N) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(parent_node) => {
                parent_node.children.push(id);
                parent_node.depth + 1
            }
            None => 0,
        };
        self.nodes.push(Node {
            id,
            parent,
            children: Vec::new(),
            depth,
            data,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<N>> {
        self.nodes.get(id.0)
    }

    /// Payload access while the owning trace is still being built
    pub(crate) fn data_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id.0).map(|n| &mut n.data)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node<N>> {
        self.nodes.iter()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<NodeId> for Registry<N> {
    type Output = Node<N>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
