/// Ray — half-line used for picking.
///
/// The caller builds the ray (typically camera position + unprojected
/// mouse direction). The index only needs the slab test against node
/// regions and entity bounds.

use glam::Vec3;
use super::aabb::AABB;

/// A ray starting at `origin` and extending along `direction`.
///
/// `direction` does not need to be normalized; distances returned by
/// [`Ray::intersect_aabb`] are expressed in multiples of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Direction (not necessarily unit length)
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `from` towards `to`, normalized.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self {
            origin: from,
            direction: (to - from).normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against an AABB.
    ///
    /// Returns the entry parameter (0 if the origin is inside the box),
    /// or `None` if the ray misses or the box lies entirely behind the origin.
    pub fn intersect_aabb(&self, aabb: &AABB) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if dir == 0.0 {
                // Parallel to this slab: must already be within it
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));

            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    /// `true` if the ray hits the AABB.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.intersect_aabb(aabb).is_some()
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
