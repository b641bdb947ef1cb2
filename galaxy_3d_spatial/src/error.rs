//! Error types for the Galaxy3D spatial index
//!
//! This module defines the error types returned by the spatial index,
//! covering malformed entity bounds, invalid configuration and
//! operations invoked on a tree that does not exist yet.

use std::fmt;
use glam::Vec3;

/// Result type for Galaxy3D spatial operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D spatial index errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Entity AABB has `min > max` on at least one axis (or a NaN component)
    InvalidBounds {
        /// Minimum corner as supplied by the caller
        min: Vec3,
        /// Maximum corner as supplied by the caller
        max: Vec3,
    },

    /// Tree operation invoked before `create_or_rebuild` (or after `teardown`)
    UninitializedIndex,

    /// Configuration rejected (zero `max_objects`, invalid world bounds, ...)
    InvalidConfig(String),

    /// The entity provider does not know the given entity
    UnknownEntity(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBounds { min, max } => {
                write!(f, "Invalid bounds: min {} is not <= max {}", min, max)
            }
            Error::UninitializedIndex => {
                write!(f, "Spatial index not initialized. Call create_or_rebuild() first")
            }
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::UnknownEntity(msg) => write!(f, "Unknown entity: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error at ERROR severity (with file:line) and evaluate to it
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy3d::SpatialIndex", Error::UninitializedIndex);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $err:expr) => {{
        let err: $crate::galaxy3d::Error = $err;
        $crate::engine_error!($source, "{}", err);
        err
    }};
}

/// Log an error and return it from the enclosing function
///
/// # Example
///
/// ```ignore
/// engine_bail!("galaxy3d::SpatialIndex", Error::InvalidConfig("max_objects is 0".to_string()));
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $err:expr) => {
        return Err($crate::engine_err!($source, $err))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
