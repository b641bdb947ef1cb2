/// Frustum — six inward-facing planes bounding a camera's view volume.
///
/// The caller builds it (usually from the camera's view-projection matrix)
/// and hands it to `SpatialIndex::query_frustum`. Clip-space depth is
/// expected in `0..=1`, the convention of glam's `perspective_rh` and
/// `orthographic_rh`.

use glam::{Mat4, Vec3, Vec4};
use super::aabb::AABB;

/// Result of a 3-way frustum/AABB classification.
///
/// Drives hierarchical culling in the spatial tree:
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect every member of the subtree without further testing
/// - `Partial` → test members individually and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    Outside,
    Inside,
    Partial,
}

/// Plane `dot(normal, p) + distance = 0`, normal pointing into the frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Build from `(a, b, c, d)` coefficients, normalizing the normal.
    ///
    /// Degenerate coefficients (zero normal) are kept as they are.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length > 0.0 {
            Self { normal: normal / length, distance: coefficients.w / length }
        } else {
            Self { normal, distance: coefficients.w }
        }
    }

    /// Positive on the inner side.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Corner of `aabb` furthest along the normal.
    fn farthest_corner(&self, aabb: &AABB) -> Vec3 {
        Vec3::select(self.normal.cmpge(Vec3::ZERO), aabb.max, aabb.min)
    }

    /// Corner of `aabb` furthest against the normal.
    fn nearest_corner(&self, aabb: &AABB) -> Vec3 {
        Vec3::select(self.normal.cmpge(Vec3::ZERO), aabb.min, aabb.max)
    }
}

/// View volume as six planes, in order: left, right, bottom, top, near, far.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the planes of a view-projection matrix (Gribb & Hartmann).
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let [x, y, z, w] = [0, 1, 2, 3].map(|i| view_projection.row(i));

        Self {
            planes: [
                w + x,  // left
                w - x,  // right
                w + y,  // bottom
                w - y,  // top
                z,      // near (depth 0)
                w - z,  // far  (depth 1)
            ]
            .map(Plane::from_coefficients),
        }
    }

    /// `true` if `point` is inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(point) >= 0.0)
    }

    /// Conservative overlap test: may report boxes near a frustum corner
    /// as visible, never misses a visible one.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) != FrustumTest::Outside
    }

    /// Classify an AABB against the frustum.
    ///
    /// Outside as soon as the farthest corner is behind one plane; Inside
    /// only if the nearest corner is in front of every plane.
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut result = FrustumTest::Inside;

        for plane in &self.planes {
            if plane.signed_distance(plane.farthest_corner(aabb)) < 0.0 {
                return FrustumTest::Outside;
            }
            if plane.signed_distance(plane.nearest_corner(aabb)) < 0.0 {
                result = FrustumTest::Partial;
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
