//! Error types for voxmerge-merge

use thiserror::Error;

/// Errors that can occur while building or merging the object graph
///
/// Every variant aborts the agglomeration run. The graph is left in an
/// unspecified state and must be discarded.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxmerge_core::Error),

    /// A payload or priority could not be computed
    #[error("feature calculation failed: {0}")]
    FeatureCalculationFailed(String),

    /// An adjacency or resolution computation was impossible
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// A merge candidate offered for merging has no on voxel
    #[error("merge candidate has no on voxel")]
    EmptyCandidate,
}

/// Result type for merge operations
pub type MergeResult<T> = Result<T, MergeError>;
