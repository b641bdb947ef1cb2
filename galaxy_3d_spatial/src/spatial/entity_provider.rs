/// Entity provider — the object graph the spatial index is built from.
///
/// The index never owns entities. It walks the caller's hierarchy
/// through this trait, copies out identities and world AABBs, and keeps
/// only those. Entity lifetime stays with the caller.

use std::fmt::Debug;
use std::hash::Hash;
use crate::geometry::AABB;

/// Read-only view over an external object hierarchy.
///
/// Used by `SpatialIndex::create_or_rebuild` (full walk from the roots)
/// and `SpatialIndex::on_staticity_changed` (single entity lookup).
pub trait EntityProvider {
    /// Stable entity identity, compared for removal and de-duplication.
    type Key: Copy + Eq + Hash + Debug;

    /// Top-level entities the walk starts from.
    fn roots(&self) -> &[Self::Key];

    /// Current world-space AABB.
    ///
    /// `None` for unknown keys and for entities without a spatial
    /// extent (e.g. empty grouping nodes), which the walk skips.
    fn bounds(&self, key: Self::Key) -> Option<AABB>;

    /// Static entities are indexed; dynamic ones are culled by other means.
    fn is_static(&self, key: Self::Key) -> bool;

    /// Immediate children, in hierarchy order.
    fn children(&self, key: Self::Key) -> &[Self::Key];
}

/// A single tree member: identity plus the bounds seen at insertion time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry<K> {
    pub key: K,
    pub bounds: AABB,
}

impl<K> SpatialEntry<K> {
    pub fn new(key: K, bounds: AABB) -> Self {
        Self { key, bounds }
    }
}
