//! Error types for voxmerge-core
//!
//! Provides a unified error type for the geometry and mask operations in the
//! core crate.

use crate::{BoundingBox, Point3i};
use thiserror::Error;

/// voxmerge-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Empty input where at least one element is required
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Voxel lies outside the bounding box of a mask
    #[error("voxel {point} lies outside {bbox}")]
    OutOfBounds { point: Point3i, bbox: BoundingBox },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
