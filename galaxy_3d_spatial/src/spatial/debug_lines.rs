/// Wireframe output for visualizing the tree.
///
/// Every node contributes the 12 edges of its region. The renderer
/// either pulls them lazily through [`DebugLines`] or receives them
/// through a [`DebugLineSink`].

use glam::Vec3;
use super::spatial_node::SpatialNode;

/// Corner pairs forming the 12 edges of a box, in drawing order.
///
/// Indices refer to `AABB::corner` (bit2 = X, bit1 = Y, bit0 = Z).
pub const WIREFRAME_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0),
    (3, 7), (7, 5), (5, 1),
    (7, 6), (6, 4), (4, 5),
    (2, 6), (4, 0),
];

/// One wireframe segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    /// Depth of the node the edge belongs to (lets the renderer color by level)
    pub depth: u32,
}

/// Receiver for wireframe segments (e.g. an immediate-mode line batch).
pub trait DebugLineSink {
    fn draw_line(&mut self, start: Vec3, end: Vec3, depth: u32);
}

impl DebugLineSink for Vec<DebugLine> {
    fn draw_line(&mut self, start: Vec3, end: Vec3, depth: u32) {
        self.push(DebugLine { start, end, depth });
    }
}

/// Lazy pre-order walk producing the edges of every node.
///
/// Same order as `SpatialNode::debug_draw`: a node's 12 edges, then its
/// children from octant 0 to 7.
pub struct DebugLines<'a, K> {
    stack: Vec<&'a SpatialNode<K>>,
    current: Option<(&'a SpatialNode<K>, [Vec3; 8], usize)>,
}

impl<'a, K> DebugLines<'a, K> {
    pub(crate) fn new(root: Option<&'a SpatialNode<K>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
            current: None,
        }
    }
}

impl<'a, K> Iterator for DebugLines<'a, K> {
    type Item = DebugLine;

    fn next(&mut self) -> Option<DebugLine> {
        loop {
            if let Some((node, corners, edge)) = &mut self.current {
                let node: &'a SpatialNode<K> = *node;
                if let Some(&(a, b)) = WIREFRAME_EDGES.get(*edge) {
                    *edge += 1;
                    return Some(DebugLine {
                        start: corners[a],
                        end: corners[b],
                        depth: node.depth(),
                    });
                }

                // Reverse so octant 0 is popped first
                if let Some(children) = node.children() {
                    self.stack.extend(children.iter().rev());
                }
                self.current = None;
            }

            let node = self.stack.pop()?;
            self.current = Some((node, node.region().corners(), 0));
        }
    }
}
