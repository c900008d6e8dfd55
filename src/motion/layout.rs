//! Static layouts computed once per run
//!
//! - [`TreeLayout`]: recursion trees, subtree widths summed bottom-up and each
//!   parent centred over its children, root at the origin
//! - [`BarLayout`]: equally spaced bars centred in the viewport
//! - [`bucket_center`]: the ten digit buckets laid side by side

use super::camera::Viewport;
use crate::trace::{NodeId, Registry};

pub const NODE_W: f64 = 120.0;
pub const NODE_H: f64 = 52.0;
pub const H_GAP: f64 = 24.0;
pub const V_GAP: f64 = 56.0;

pub const BAR_PADDING: f64 = 50.0;
pub const BAR_GAP: f64 = 6.0;
pub const MIN_BAR_WIDTH: f64 = 22.0;
pub const MAX_BAR_WIDTH: f64 = 56.0;

/// Axis-aligned world rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Smallest rectangle holding every `(x, y)`; `None` for no points
    pub fn around(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    max_x: x,
                    min_y: y,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    max_x: b.max_x.max(x),
                    min_y: b.min_y.min(y),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Node box centre in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub cx: f64,
    pub cy: f64,
}

impl NodeBox {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.cx - NODE_W / 2.0,
            max_x: self.cx + NODE_W / 2.0,
            min_y: self.cy - NODE_H / 2.0,
            max_y: self.cy + NODE_H / 2.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    boxes: Vec<NodeBox>,
}

impl TreeLayout {
    pub fn compute<N>(nodes: &Registry<N>) -> Self {
        let mut layout = TreeLayout {
            boxes: vec![NodeBox { cx: 0.0, cy: 0.0 }; nodes.len()],
        };
        if nodes.is_empty() {
            return layout;
        }
        let mut widths = vec![0.0; nodes.len()];
        for node in nodes.iter().collect::<Vec<_>>().into_iter().rev() {
            // Children always carry larger ids than their parent.
            let kids = nodes.children(node.id);
            widths[node.id.index()] = if kids.is_empty() {
                NODE_W
            } else {
                let total: f64 = kids.iter().map(|k| widths[k.index()]).sum::<f64>()
                    + H_GAP * (kids.len() - 1) as f64;
                total.max(NODE_W)
            };
        }
        layout.assign(nodes, &widths, NodeId::ROOT, 0.0, 0.0);
        layout
    }

    fn assign<N>(&mut self, nodes: &Registry<N>, widths: &[f64], id: NodeId, cx: f64, top: f64) {
        if let Some(b) = self.boxes.get_mut(id.index()) {
            *b = NodeBox {
                cx,
                cy: top + NODE_H / 2.0,
            };
        }
        let kids = nodes.children(id);
        if kids.is_empty() {
            return;
        }
        let span: f64 = kids.iter().map(|k| widths[k.index()]).sum::<f64>()
            + H_GAP * (kids.len() - 1) as f64;
        let mut left = cx - span / 2.0;
        for &kid in kids {
            let w = widths[kid.index()];
            self.assign(nodes, widths, kid, left + w / 2.0, top + NODE_H + V_GAP);
            left += w + H_GAP;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeBox> {
        self.boxes.get(id.index()).copied()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::around(self.boxes.iter().flat_map(|b| {
            let r = b.bounds();
            [(r.min_x, r.min_y), (r.max_x, r.max_y)]
        }))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Horizontal placement of `n` bars across a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub start_x: f64,
    pub bar_width: f64,
}

impl BarLayout {
    pub fn new(n: usize, viewport: Viewport) -> Self {
        let n = n.max(1) as f64;
        let usable = viewport.width - 2.0 * BAR_PADDING - BAR_GAP * (n - 1.0);
        let bar_width = (usable / n).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
        let total = n * bar_width + (n - 1.0) * BAR_GAP;
        BarLayout {
            start_x: (viewport.width - total) / 2.0,
            bar_width,
        }
    }

    /// Left edge of a (possibly fractional) slot
    pub fn slot_x(&self, slot: f64) -> f64 {
        self.start_x + slot * (self.bar_width + BAR_GAP)
    }

    pub fn slot_center(&self, slot: f64) -> f64 {
        self.slot_x(slot) + self.bar_width / 2.0
    }
}

/// Centre x of the bucket for `digit`, buckets splitting the width in ten
pub fn bucket_center(digit: u8, viewport: Viewport) -> f64 {
    let width = viewport.width / 10.0;
    f64::from(digit) * width + width / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_root_sits_at_origin() {
        let mut nodes = Registry::new();
        nodes.insert(None, ());
        let layout = TreeLayout::compute(&nodes);
        assert_eq!(layout.get(NodeId::ROOT), Some(NodeBox { cx: 0.0, cy: NODE_H / 2.0 }));
    }

    #[test]
    fn test_three_children_are_centered_under_parent() {
        let mut nodes = Registry::new();
        let root = nodes.insert(None, ());
        for _ in 0..3 {
            nodes.insert(Some(root), ());
        }
        let layout = TreeLayout::compute(&nodes);
        let xs: Vec<f64> = (1..=3)
            .filter_map(|i| layout.get(NodeId(i)))
            .map(|b| b.cx)
            .collect();
        assert_eq!(xs, vec![-(NODE_W + H_GAP), 0.0, NODE_W + H_GAP]);
        let child_top = layout.get(NodeId(1)).map(|b| b.cy - NODE_H / 2.0);
        assert_eq!(child_top, Some(NODE_H + V_GAP));
    }

    #[test]
    fn test_wide_subtree_pushes_sibling_out() {
        let mut nodes = Registry::new();
        let root = nodes.insert(None, ());
        let left = nodes.insert(Some(root), ());
        nodes.insert(Some(root), ());
        nodes.insert(Some(left), ());
        nodes.insert(Some(left), ());
        let layout = TreeLayout::compute(&nodes);
        let bounds = layout.bounds().expect("non-empty");
        // left subtree is 2·120+24 wide, right is 120, plus one gap
        assert_eq!(bounds.width(), 264.0 + H_GAP + NODE_W);
    }

    #[test]
    fn test_bar_width_is_clamped_and_centered() {
        let few = BarLayout::new(3, Viewport::new(800.0, 400.0));
        assert_eq!(few.bar_width, MAX_BAR_WIDTH);
        let total = 3.0 * MAX_BAR_WIDTH + 2.0 * BAR_GAP;
        assert!((few.start_x - (800.0 - total) / 2.0).abs() < 1e-9);

        let many = BarLayout::new(20, Viewport::new(300.0, 400.0));
        assert_eq!(many.bar_width, MIN_BAR_WIDTH);
        assert_eq!(many.slot_x(1.0) - many.slot_x(0.0), MIN_BAR_WIDTH + BAR_GAP);
    }

    #[test]
    fn test_bucket_centers() {
        let vp = Viewport::new(1000.0, 400.0);
        assert_eq!(bucket_center(0, vp), 50.0);
        assert_eq!(bucket_center(9, vp), 950.0);
    }
}
