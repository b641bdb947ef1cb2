/// AABB — axis-aligned bounding box in world space.
///
/// Used both for entity bounds (supplied by the caller) and for the
/// regions owned by spatial nodes. Intersection is inclusive:
/// boxes that merely touch on a face, edge or corner intersect.

use glam::Vec3;
use crate::error::{Error, Result};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create an AABB from its two corners (not validated).
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a center point and half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Cube centered on the origin with the given half size.
    pub fn cube(half_size: f32) -> Self {
        Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(half_size))
    }

    /// `min <= max` on every axis. NaN components make a box invalid.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Return `self` if valid, `Error::InvalidBounds` otherwise.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidBounds { min: self.min, max: self.max })
        }
    }

    /// Compute the center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the size along each axis.
    pub fn half_size(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// One of the 8 corners.
    ///
    /// Bit layout of `index`: bit2 = X, bit1 = Y, bit0 = Z (0 = min, 1 = max).
    /// Corner 0 is `min`, corner 7 is `max`.
    pub fn corner(&self, index: usize) -> Vec3 {
        Vec3::new(
            if index & 4 == 0 { self.min.x } else { self.max.x },
            if index & 2 == 0 { self.min.y } else { self.max.y },
            if index & 1 == 0 { self.min.z } else { self.max.z },
        )
    }

    /// All 8 corners, ordered as in [`AABB::corner`].
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| self.corner(i))
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
