//! Spatial module
//!
//! Provides the octree (`SpatialNode`) and its owner (`SpatialIndex`),
//! the entity provider seam it is populated through, and wireframe output
//! for visualizing the tree.

mod debug_lines;
mod entity_provider;
mod spatial_index;
mod spatial_index_config;
mod spatial_node;

pub use debug_lines::{DebugLine, DebugLineSink, DebugLines, WIREFRAME_EDGES};
pub use entity_provider::{EntityProvider, SpatialEntry};
pub use spatial_index::{SpatialIndex, SpatialIndexStats};
pub use spatial_index_config::SpatialIndexConfig;
pub use spatial_node::SpatialNode;
