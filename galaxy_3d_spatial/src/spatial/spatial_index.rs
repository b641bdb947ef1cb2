/// SpatialIndex — owner of the octree built over static entities.
///
/// The tree is created from an `EntityProvider` walk and then kept in sync
/// through staticity notifications. Nodes split on overflow (up to
/// `max_depth`) and never merge back; objects straddling a split plane are
/// stored under every child they touch, so queries de-duplicate by identity.
///
/// Alongside the node tree, the index keeps an identity table
/// (`key → bounds at insertion`). It answers `contains`/`len` in O(1) and
/// lets removal skip the tree scan for keys that were never inserted.

use std::fmt::Debug;
use std::hash::Hash;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::geometry::{AABB, Frustum, FrustumTest, Ray};
use super::debug_lines::{DebugLineSink, DebugLines};
use super::entity_provider::{EntityProvider, SpatialEntry};
use super::spatial_index_config::SpatialIndexConfig;
use super::spatial_node::{Candidates, SpatialNode};

const SOURCE: &str = "galaxy3d::SpatialIndex";

/// Snapshot of the tree shape, as shown by an editor panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialIndexStats {
    /// Number of nodes, root included
    pub node_count: usize,
    /// Member entries across all nodes (an object stored in 3 children counts 3)
    pub inside_count: usize,
    /// Distinct entities in the index
    pub entity_count: usize,
    /// Configured depth ceiling
    pub max_depth: u32,
    /// Depth of the deepest existing node
    pub deepest_node: u32,
    /// Configured node capacity
    pub max_objects: usize,
    /// Nodes holding at least `max_objects` members
    pub nodes_with_max_objects: usize,
}

/// Octree over static entities identified by `K`.
///
/// # Example
///
/// ```
/// use galaxy_3d_spatial::galaxy3d::{AABB, SpatialIndex, SpatialIndexConfig};
/// use galaxy_3d_spatial::galaxy3d::scene::SceneGraph;
/// use glam::Vec3;
///
/// let mut scene = SceneGraph::new();
/// let crate_key = scene
///     .create_object("crate", Some(AABB::new(Vec3::splat(1.0), Vec3::splat(2.0))), None)
///     .unwrap();
///
/// let mut index = SpatialIndex::new();
/// index.create_or_rebuild(SpatialIndexConfig::default(), &scene).unwrap();
///
/// let hits = index.query_aabb(&AABB::new(Vec3::ZERO, Vec3::splat(5.0))).unwrap();
/// assert_eq!(hits, vec![crate_key]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex<K> {
    /// `None` until `create_or_rebuild`, and again after `teardown`
    root: Option<SpatialNode<K>>,
    config: SpatialIndexConfig,
    /// Identity table: every indexed key with the bounds it was inserted with
    tracked: FxHashMap<K, AABB>,
}

impl<K: Copy + Eq + Hash + Debug> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> SpatialIndex<K> {
    /// Create an uninitialized index. Every tree operation fails with
    /// `Error::UninitializedIndex` until `create_or_rebuild` is called.
    pub fn new() -> Self {
        Self {
            root: None,
            config: SpatialIndexConfig::default(),
            tracked: FxHashMap::default(),
        }
    }

    // ===== LIFECYCLE =====

    /// Build the tree from scratch out of every static entity of `provider`.
    ///
    /// The provider is walked depth-first from its roots, in hierarchy
    /// order. Dynamic entities are skipped but their children are still
    /// visited; entities without bounds are skipped. Any previous tree is
    /// discarded, so calling this twice yields the same tree as calling it
    /// once.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidConfig` if `config.validate()` fails
    /// - `Error::InvalidBounds` if a static entity has an inverted AABB
    ///
    /// On error the previous tree (if any) is left untouched.
    pub fn create_or_rebuild<P>(&mut self, config: SpatialIndexConfig, provider: &P) -> Result<()>
    where
        P: EntityProvider<Key = K>,
    {
        if let Err(err) = config.validate() {
            crate::engine_bail!(SOURCE, err);
        }

        let entries = Self::collect_static_entries(provider)?;

        self.teardown_tree();

        let mut root = SpatialNode::new_root(config.world_bounds);
        for entry in &entries {
            root.insert_object(*entry, &config);
        }

        self.tracked = entries.iter().map(|entry| (entry.key, entry.bounds)).collect();
        self.root = Some(root);
        self.config = config;

        crate::engine_info!(SOURCE,
            "Spatial index built: {} entities, {} nodes (max_depth={}, max_objects={})",
            self.tracked.len(), self.node_count(), config.max_depth, config.max_objects);

        Ok(())
    }

    /// Walk the provider and gather validated entries, before any mutation.
    fn collect_static_entries<P>(provider: &P) -> Result<Vec<SpatialEntry<K>>>
    where
        P: EntityProvider<Key = K>,
    {
        let mut entries = Vec::new();
        let mut seen: FxHashSet<K> = FxHashSet::default();

        // Reverse so the first root is visited first
        let mut stack: Vec<K> = provider.roots().iter().rev().copied().collect();

        while let Some(key) = stack.pop() {
            if !seen.insert(key) {
                continue;
            }

            if provider.is_static(key) {
                if let Some(bounds) = provider.bounds(key) {
                    if !bounds.is_valid() {
                        crate::engine_bail!(SOURCE, Error::InvalidBounds {
                            min: bounds.min,
                            max: bounds.max,
                        });
                    }
                    entries.push(SpatialEntry::new(key, bounds));
                }
            }

            stack.extend(provider.children(key).iter().rev().copied());
        }

        Ok(entries)
    }

    /// React to an entity switching between static and dynamic.
    ///
    /// - `became_static = true`: the entity is inserted with its current
    ///   bounds (if it was already indexed, its old entries are replaced)
    /// - `became_static = false`: the entity is removed; a key that was
    ///   not indexed is ignored
    ///
    /// # Errors
    ///
    /// - `Error::UninitializedIndex` before `create_or_rebuild`
    /// - `Error::UnknownEntity` if the provider has no bounds for `key`
    ///   (only when becoming static)
    /// - `Error::InvalidBounds` if those bounds are inverted
    pub fn on_staticity_changed<P>(&mut self, provider: &P, key: K, became_static: bool) -> Result<()>
    where
        P: EntityProvider<Key = K>,
    {
        self.ensure_initialized()?;

        if became_static {
            let Some(bounds) = provider.bounds(key) else {
                crate::engine_bail!(SOURCE, Error::UnknownEntity(format!("{:?}", key)));
            };
            self.insert(key, bounds)
        } else {
            self.remove(key).map(|_| ())
        }
    }

    /// Release the whole tree. The index returns to the uninitialized state.
    ///
    /// Calling it again (or on a never-built index) does nothing.
    pub fn teardown(&mut self) {
        if self.teardown_tree() {
            crate::engine_info!(SOURCE, "Spatial index torn down");
        }
    }

    /// Drop the root and the identity table. Returns `true` if a tree existed.
    fn teardown_tree(&mut self) -> bool {
        self.tracked.clear();
        match self.root.take() {
            Some(mut root) => {
                root.teardown();
                true
            }
            None => false,
        }
    }

    // ===== INSERT / REMOVE =====

    /// Insert (or re-insert) a single entity.
    ///
    /// An entity already in the index is removed first, so its stored
    /// bounds are replaced rather than duplicated. Bounds outside the
    /// world region are accepted and kept at the root.
    ///
    /// # Errors
    ///
    /// - `Error::UninitializedIndex` before `create_or_rebuild`
    /// - `Error::InvalidBounds` if `bounds.min > bounds.max` on any axis
    pub fn insert(&mut self, key: K, bounds: AABB) -> Result<()> {
        self.ensure_initialized()?;

        if !bounds.is_valid() {
            crate::engine_bail!(SOURCE, Error::InvalidBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        if !self.config.world_bounds.contains(&bounds) {
            crate::engine_warn!(SOURCE,
                "Entity {:?} extends outside the world bounds {:?}", key, self.config.world_bounds);
        }

        let config = self.config;
        if let Some(root) = self.root.as_mut() {
            if self.tracked.contains_key(&key) {
                root.delete_object(key);
            }
            root.insert_object(SpatialEntry::new(key, bounds), &config);
        }
        self.tracked.insert(key, bounds);

        crate::engine_debug!(SOURCE, "Inserted entity {:?}", key);
        Ok(())
    }

    /// Remove every entry of an entity.
    ///
    /// Returns `Ok(false)` if the entity was not in the index. Nodes are
    /// never merged back after removal.
    ///
    /// # Errors
    ///
    /// `Error::UninitializedIndex` before `create_or_rebuild`.
    pub fn remove(&mut self, key: K) -> Result<bool> {
        self.ensure_initialized()?;

        if self.tracked.remove(&key).is_none() {
            return Ok(false);
        }

        let removed = self.root.as_mut().map_or(0, |root| root.delete_object(key));
        crate::engine_debug!(SOURCE, "Removed entity {:?} ({} entries)", key, removed);
        Ok(true)
    }

    // ===== QUERIES =====

    /// Entities whose bounds intersect `volume`, each reported once.
    pub fn query_aabb(&self, volume: &AABB) -> Result<Vec<K>> {
        let root = self.root_or_err()?;
        let mut results = Candidates::new();
        root.collect_in_aabb(volume, &mut results);
        Ok(results.into_keys())
    }

    /// Entities whose bounds are hit by `ray`, each reported once.
    ///
    /// Results follow tree order, not distance along the ray.
    pub fn query_ray(&self, ray: &Ray) -> Result<Vec<K>> {
        let root = self.root_or_err()?;
        let mut results = Candidates::new();
        root.collect_on_ray(ray, &mut results);
        Ok(results.into_keys())
    }

    /// Entities potentially visible in `frustum`, each reported once.
    ///
    /// Subtrees fully inside the frustum are collected without testing
    /// their members; subtrees fully outside are skipped.
    pub fn query_frustum(&self, frustum: &Frustum) -> Result<Vec<K>> {
        let root = self.root_or_err()?;
        let mut results = Candidates::new();
        // Root members may lie outside the world region: always test them
        root.collect_in_frustum(frustum, FrustumTest::Partial, &mut results);
        Ok(results.into_keys())
    }

    // ===== DEBUG DRAW / STATISTICS =====

    /// Lazy sequence of wireframe segments, 12 per node, pre-order.
    pub fn debug_lines(&self) -> Result<DebugLines<'_, K>> {
        let root = self.root_or_err()?;
        Ok(DebugLines::new(Some(root)))
    }

    /// Push every wireframe segment into `sink` (same order as `debug_lines`).
    pub fn debug_draw(&self, sink: &mut dyn DebugLineSink) -> Result<()> {
        self.root_or_err()?.debug_draw(sink);
        Ok(())
    }

    /// Current tree statistics.
    pub fn stats(&self) -> Result<SpatialIndexStats> {
        let root = self.root_or_err()?;
        Ok(SpatialIndexStats {
            node_count: root.node_count(),
            inside_count: root.member_count(),
            entity_count: self.tracked.len(),
            max_depth: self.config.max_depth,
            deepest_node: root.deepest_depth(),
            max_objects: self.config.max_objects,
            nodes_with_max_objects: root.nodes_with_at_least(self.config.max_objects),
        })
    }

    // ===== ACCESSORS =====

    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Config of the current tree (the default config before the first build).
    pub fn config(&self) -> &SpatialIndexConfig {
        &self.config
    }

    /// Root node, for custom traversals.
    pub fn root(&self) -> Option<&SpatialNode<K>> {
        self.root.as_ref()
    }

    /// Whether `key` is indexed.
    pub fn contains(&self, key: K) -> bool {
        self.tracked.contains_key(&key)
    }

    /// Bounds `key` was last inserted with.
    pub fn bounds_of(&self, key: K) -> Option<&AABB> {
        self.tracked.get(&key)
    }

    /// Number of distinct indexed entities.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, SpatialNode::node_count)
    }

    fn ensure_initialized(&self) -> Result<()> {
        self.root_or_err().map(|_| ())
    }

    fn root_or_err(&self) -> Result<&SpatialNode<K>> {
        self.root.as_ref()
            .ok_or_else(|| crate::engine_err!(SOURCE, Error::UninitializedIndex))
    }
}

#[cfg(test)]
#[path = "spatial_index_tests.rs"]
mod tests;
