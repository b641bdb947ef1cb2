/// SpatialNode — one cuboid region of the octree.
///
/// A node is either a leaf (members only) or internal (members plus
/// exactly eight children). Objects are pushed down on overflow and may
/// end up in several children when they straddle a split plane, so a
/// single entity can appear in more than one node.
///
/// Placement rule, shared by insertion and rearrangement: an object that
/// touches all eight children of a node, or none of them, stays in the
/// node itself. Anything in between is handed to each child it touches.
/// The root also keeps every object that is not fully inside its region,
/// so the part outside the world stays reachable by queries.

use std::hash::Hash;
use glam::Vec3;
use rustc_hash::FxHashSet;
use crate::geometry::{AABB, Frustum, FrustumTest, Ray};
use super::debug_lines::{DebugLineSink, WIREFRAME_EDGES};
use super::entity_provider::SpatialEntry;
use super::spatial_index_config::SpatialIndexConfig;

/// Octant region inside `parent`.
///
/// Each octant halves every axis. Octants 0, 3, 4, 7 take the lower X
/// half; 0, 1, 4, 5 take the lower Y half; 0..=3 take the upper Z half
/// and 4..=7 the lower one (front face counter-clockwise from bottom
/// left, then the back face).
pub(crate) fn octant_region(parent: &AABB, octant: usize) -> AABB {
    debug_assert!(octant < 8, "octant index out of range: {}", octant);

    let center = parent.center();
    let lower_x = matches!(octant, 0 | 3 | 4 | 7);
    let lower_y = matches!(octant, 0 | 1 | 4 | 5);
    let lower_z = octant > 3;

    AABB {
        min: Vec3::new(
            if lower_x { parent.min.x } else { center.x },
            if lower_y { parent.min.y } else { center.y },
            if lower_z { parent.min.z } else { center.z },
        ),
        max: Vec3::new(
            if lower_x { center.x } else { parent.max.x },
            if lower_y { center.y } else { parent.max.y },
            if lower_z { center.z } else { parent.max.z },
        ),
    }
}

/// Deduplicating result buffer for tree queries.
///
/// Keeps first-seen order; an entity stored under several nodes is
/// reported once.
pub(crate) struct Candidates<K> {
    keys: Vec<K>,
    seen: FxHashSet<K>,
}

impl<K: Copy + Eq + Hash> Candidates<K> {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    fn push(&mut self, key: K) {
        if self.seen.insert(key) {
            self.keys.push(key);
        }
    }

    pub(crate) fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

/// A single node in the octree.
#[derive(Debug, Clone)]
pub struct SpatialNode<K> {
    /// World-space region, fixed at construction
    region: AABB,
    /// Root = 0, children = parent + 1
    depth: u32,
    /// Entries attributed to this node
    members: Vec<SpatialEntry<K>>,
    /// Exactly 8 children once split, never merged back
    children: Option<Box<[SpatialNode<K>; 8]>>,
}

// ===== ACCESSORS =====

impl<K> SpatialNode<K> {
    /// Create the root node covering `region`.
    pub(crate) fn new_root(region: AABB) -> Self {
        Self::new(region, 0)
    }

    fn new(region: AABB, depth: u32) -> Self {
        Self {
            region,
            depth,
            members: Vec::new(),
            children: None,
        }
    }

    /// Child node for `octant` of `parent`.
    fn new_child(parent: &SpatialNode<K>, octant: usize) -> Self {
        Self::new(octant_region(&parent.region, octant), parent.depth + 1)
    }

    pub fn region(&self) -> &AABB {
        &self.region
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Entries stored directly in this node (not in its children).
    pub fn members(&self) -> &[SpatialEntry<K>] {
        &self.members
    }

    /// The 8 children, or `None` for a leaf.
    pub fn children(&self) -> Option<&[SpatialNode<K>; 8]> {
        self.children.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Emit the 12 edges of this region, then recurse into the children.
    pub fn debug_draw(&self, sink: &mut dyn DebugLineSink) {
        let corners = self.region.corners();
        for &(a, b) in &WIREFRAME_EDGES {
            sink.draw_line(corners[a], corners[b], self.depth);
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.debug_draw(sink);
            }
        }
    }

    /// Clear members and release all descendants.
    ///
    /// Calling it on an already empty node is a no-op.
    pub fn teardown(&mut self) {
        self.members.clear();

        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                child.teardown();
            }
        }
    }

    // ===== STATISTICS =====

    /// Number of nodes in this subtree (including this one).
    pub fn node_count(&self) -> usize {
        1 + self.children.as_ref()
            .map_or(0, |children| children.iter().map(SpatialNode::node_count).sum())
    }

    /// Number of member entries in this subtree, counting duplicates.
    pub fn member_count(&self) -> usize {
        self.members.len() + self.children.as_ref()
            .map_or(0, |children| children.iter().map(SpatialNode::member_count).sum())
    }

    /// Depth of the deepest node in this subtree.
    pub fn deepest_depth(&self) -> u32 {
        self.children.as_ref()
            .and_then(|children| children.iter().map(SpatialNode::deepest_depth).max())
            .unwrap_or(self.depth)
    }

    /// Number of nodes in this subtree holding at least `count` members.
    pub fn nodes_with_at_least(&self, count: usize) -> usize {
        let own = usize::from(self.members.len() >= count);
        own + self.children.as_ref()
            .map_or(0, |children| children.iter().map(|c| c.nodes_with_at_least(count)).sum())
    }
}

// ===== INSERT / DELETE =====

impl<K: Copy + Eq + Hash> SpatialNode<K> {
    /// Insert an entry into this node or its subtree.
    ///
    /// - internal: hand it to the children (see [`Self::send_to_children`]),
    ///   keeping it here if no child takes it
    /// - leaf at `max_depth`: keep it, whatever the member count
    /// - leaf below capacity: keep it
    /// - full leaf: split, then redistribute every member
    pub fn insert_object(&mut self, entry: SpatialEntry<K>, config: &SpatialIndexConfig) {
        if !self.is_leaf() {
            if !self.send_to_children(&entry, config) {
                self.members.push(entry);
            }
            return;
        }

        // Depth ceiling takes precedence over the object count
        if self.depth >= config.max_depth {
            self.members.push(entry);
            return;
        }

        if self.members.len() < config.max_objects {
            self.members.push(entry);
            return;
        }

        self.split();
        self.members.push(entry);
        self.rearrange_objects_in_children(config);
    }

    /// Push an entry into every child whose region it intersects.
    ///
    /// Returns `true` iff at least one child took it. An entry touching
    /// all eight children is not sent (it belongs to this node), and
    /// neither is one touching none. The root never sends an entry that
    /// extends past its region.
    pub fn send_to_children(&mut self, entry: &SpatialEntry<K>, config: &SpatialIndexConfig) -> bool {
        if self.depth == 0 && !self.region.contains(&entry.bounds) {
            return false;
        }
        let Some(hits) = self.child_hits(&entry.bounds) else {
            return false;
        };
        if Self::stays_in_parent(&hits) {
            return false;
        }

        if let Some(children) = self.children.as_mut() {
            for (child, hit) in children.iter_mut().zip(hits) {
                if hit {
                    child.insert_object(*entry, config);
                }
            }
        }
        true
    }

    /// Materialize the 8 children. No-op on an internal node.
    fn split(&mut self) {
        if self.children.is_some() {
            return;
        }

        let children: [SpatialNode<K>; 8] = std::array::from_fn(|octant| Self::new_child(self, octant));
        self.children = Some(Box::new(children));

        crate::engine_trace!("galaxy3d::SpatialNode",
            "Split node at depth {} ({} members)", self.depth, self.members.len());
    }

    /// Move every member that partially overlaps the children down into them.
    fn rearrange_objects_in_children(&mut self, config: &SpatialIndexConfig) {
        let members = std::mem::take(&mut self.members);

        for entry in members {
            if !self.send_to_children(&entry, config) {
                self.members.push(entry);
            }
        }
    }

    /// Remove every entry for `key` reachable from this node.
    ///
    /// Stops at the first node that holds it in its own member list;
    /// otherwise searches all children. Returns how many entries were removed.
    pub fn delete_object(&mut self, key: K) -> usize {
        if let Some(index) = self.members.iter().position(|e| e.key == key) {
            self.members.swap_remove(index);
            return 1;
        }

        match self.children.as_mut() {
            Some(children) => children.iter_mut().map(|child| child.delete_object(key)).sum(),
            None => 0,
        }
    }

    /// Which children intersect `bounds` (`None` for a leaf).
    fn child_hits(&self, bounds: &AABB) -> Option<[bool; 8]> {
        self.children.as_ref()
            .map(|children| std::array::from_fn(|i| children[i].region.intersects(bounds)))
    }

    fn stays_in_parent(hits: &[bool; 8]) -> bool {
        hits.iter().all(|&hit| hit) || !hits.iter().any(|&hit| hit)
    }
}

// ===== QUERIES =====

impl<K: Copy + Eq + Hash> SpatialNode<K> {
    /// Collect members whose bounds intersect `volume`.
    ///
    /// Members of this node are always tested; children are only visited
    /// when their region intersects the volume.
    pub(crate) fn collect_in_aabb(&self, volume: &AABB, results: &mut Candidates<K>) {
        for entry in &self.members {
            if entry.bounds.intersects(volume) {
                results.push(entry.key);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.region.intersects(volume) {
                    child.collect_in_aabb(volume, results);
                }
            }
        }
    }

    /// Collect members whose bounds are hit by `ray`.
    pub(crate) fn collect_on_ray(&self, ray: &Ray, results: &mut Candidates<K>) {
        for entry in &self.members {
            if ray.intersects_aabb(&entry.bounds) {
                results.push(entry.key);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                if ray.intersects_aabb(&child.region) {
                    child.collect_on_ray(ray, results);
                }
            }
        }
    }

    /// Collect members visible in `frustum`.
    ///
    /// `classification` is this node's region against the frustum:
    /// - `Outside` → nothing
    /// - `Inside` → the whole subtree, untested
    /// - `Partial` → members tested individually, children classified
    pub(crate) fn collect_in_frustum(
        &self,
        frustum: &Frustum,
        classification: FrustumTest,
        results: &mut Candidates<K>,
    ) {
        match classification {
            FrustumTest::Outside => {}

            FrustumTest::Inside => self.collect_all(results),

            FrustumTest::Partial => {
                for entry in &self.members {
                    if frustum.intersects_aabb(&entry.bounds) {
                        results.push(entry.key);
                    }
                }

                if let Some(children) = &self.children {
                    for child in children.iter() {
                        let child_class = frustum.classify_aabb(&child.region);
                        child.collect_in_frustum(frustum, child_class, results);
                    }
                }
            }
        }
    }

    /// Collect every member of this subtree without testing.
    pub(crate) fn collect_all(&self, results: &mut Candidates<K>) {
        for entry in &self.members {
            results.push(entry.key);
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_all(results);
            }
        }
    }
}

#[cfg(test)]
#[path = "spatial_node_tests.rs"]
mod tests;
