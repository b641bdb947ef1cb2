//! Geometry module — bounding boxes, rays and frustums.
//!
//! Passive value types shared by the spatial tree and its callers.
//! Nothing here allocates or holds state.

mod aabb;
mod frustum;
mod ray;

pub use aabb::AABB;
pub use frustum::{Frustum, FrustumTest, Plane};
pub use ray::Ray;
