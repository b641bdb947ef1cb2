//! Scene module
//!
//! A minimal object hierarchy that feeds the spatial index through
//! `EntityProvider`.

mod scene_graph;

pub use scene_graph::{SceneGraph, SceneObject, SceneObjectKey};
