use std::collections::HashMap;

use crate::model::{NodeId, Tree};
use crate::treemap::{squarify, Rect};

/// Geometry of one node within a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    /// Distance from the node the pass started at.
    pub depth: usize,
    pub parent: Option<NodeId>,
}

/// Geometry for a subtree, regenerated whenever the displayed node changes.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub root: NodeId,
    pub placements: HashMap<NodeId, Placement>,
    /// Nodes in pre-order; siblings appear in tiling order.
    pub order: Vec<NodeId>,
}

impl Layout {
    pub fn get(&self, id: NodeId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.placements.get(&id).map(|p| p.rect)
    }

    /// Children of `id` in tiling order (ascending value).
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(move |c| self.placements.get(c).and_then(|p| p.parent) == Some(id))
    }
}

/// Nested squarified layout.
///
/// Every group of siblings is tiled in a unit square and then stretched into
/// the parent's absolute rectangle, which keeps the tiles well shaped at
/// whatever zoom level they are shown.
#[derive(Clone, Copy, Debug)]
pub struct LayoutEngine {
    bounds: Rect,
    ratio: f64,
}

impl LayoutEngine {
    /// The aspect bias is fixed from the display size here and never updated.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            ratio: height / width * 0.5 * (1.0 + 5f64.sqrt()),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Rectangle of the tree root.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn tile(&self, tree: &Tree, id: NodeId, bounds: Rect) -> Vec<(NodeId, Rect)> {
        let weights: Vec<(NodeId, f64)> = tree
            .node(id)
            .children()
            .iter()
            .map(|&c| (c, tree.weight(c)))
            .collect();
        squarify(&weights, Rect::UNIT, self.ratio)
            .into_iter()
            .map(|item| (item.id, bounds.scale_local(item.rect)))
            .collect()
    }

    /// Lay out the whole subtree under `node`, which occupies `bounds`.
    pub fn layout(&self, tree: &Tree, node: NodeId, bounds: Rect) -> Layout {
        let mut out = Layout {
            root: node,
            placements: HashMap::new(),
            order: Vec::new(),
        };
        out.placements.insert(
            node,
            Placement {
                rect: bounds,
                depth: 0,
                parent: tree.parent(node),
            },
        );

        let mut stack = vec![(node, bounds, 0)];
        while let Some((parent, rect, depth)) = stack.pop() {
            out.order.push(parent);
            let tiles = self.tile(tree, parent, rect);
            for &(child, rect) in &tiles {
                out.placements.insert(
                    child,
                    Placement {
                        rect,
                        depth: depth + 1,
                        parent: Some(parent),
                    },
                );
            }
            // Reversed so siblings are visited in tiling order.
            stack.extend(tiles.into_iter().rev().map(|(child, rect)| (child, rect, depth + 1)));
        }
        tracing::trace!(root = node.0, nodes = out.order.len(), "layout pass");
        out
    }

    /// Absolute rectangle of any node, tiling only its ancestor chain.
    pub fn bounds_of(&self, tree: &Tree, node: NodeId) -> Rect {
        let mut chain = tree.ancestors(node);
        chain.reverse();
        chain.push(node);
        let mut rect = self.bounds;
        for pair in chain.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            rect = self
                .tile(tree, parent, rect)
                .into_iter()
                .find(|(id, _)| *id == child)
                .map_or(rect, |(_, r)| r);
        }
        rect
    }
}
