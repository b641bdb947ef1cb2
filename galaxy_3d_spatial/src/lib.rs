/*!
# Galaxy 3D Spatial

Octree spatial index for static scene objects.

The index partitions a world-space region into nested octants, splitting a
node once it holds more than `max_objects` entities and stopping at
`max_depth`. Objects straddling a split plane are stored under every child
they touch; queries report each entity once.

## Architecture

- **SpatialNode**: One cuboid region, either a leaf or split into 8 children
- **SpatialIndex**: Owns the root node, builds it from an `EntityProvider`
  and keeps it in sync with staticity changes
- **EntityProvider**: Read-only view of the caller's object hierarchy
- **SceneGraph**: Slot-map hierarchy implementing `EntityProvider`
- **Geometry**: `AABB`, `Ray` and `Frustum` value types

Operations on an index that has not been built fail with
`Error::UninitializedIndex` rather than silently doing nothing.
*/

// Internal modules
mod error;
pub mod log;
pub mod geometry;
pub mod spatial;
pub mod scene;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Core spatial types
    pub use crate::geometry::AABB;
    pub use crate::spatial::{SpatialIndex, SpatialIndexConfig, SpatialIndexStats};

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Spatial sub-module
    pub mod spatial {
        pub use crate::spatial::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
