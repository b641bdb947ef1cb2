/// Configuration for a SpatialIndex.
///
/// Fixed at tree-creation time. Changing any field means calling
/// `SpatialIndex::create_or_rebuild` again, which rebuilds the whole
/// tree rather than adjusting it incrementally.

use glam::Vec3;
use crate::error::{Error, Result};
use crate::geometry::AABB;

/// Tree configuration: world extent, depth ceiling and node capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialIndexConfig {
    /// Extent of the root region
    pub world_bounds: AABB,

    /// Hard ceiling on subdivision (root = depth 0).
    /// A leaf at this depth keeps every object it receives.
    pub max_depth: u32,

    /// Objects a leaf holds before a split is attempted (at least 1)
    pub max_objects: usize,
}

impl Default for SpatialIndexConfig {
    fn default() -> Self {
        Self {
            world_bounds: AABB::from_center_half_extents(Vec3::ZERO, Vec3::splat(100.0)),
            max_depth: 4,
            max_objects: 4,
        }
    }
}

impl SpatialIndexConfig {
    /// Create a config from explicit values (not validated until used).
    pub fn new(world_bounds: AABB, max_depth: u32, max_objects: usize) -> Self {
        Self { world_bounds, max_depth, max_objects }
    }

    pub fn with_world_bounds(mut self, world_bounds: AABB) -> Self {
        self.world_bounds = world_bounds;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Check the config before a tree is built from it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if:
    /// - `world_bounds` is inverted, infinite or contains NaN
    /// - `max_objects` is 0
    pub fn validate(&self) -> Result<()> {
        if !self.world_bounds.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "world bounds min {} is not <= max {}",
                self.world_bounds.min, self.world_bounds.max
            )));
        }
        if !self.world_bounds.min.is_finite() || !self.world_bounds.max.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "world bounds min {} / max {} must be finite",
                self.world_bounds.min, self.world_bounds.max
            )));
        }
        if self.max_objects == 0 {
            return Err(Error::InvalidConfig("max_objects must be at least 1".to_string()));
        }
        Ok(())
    }
}
