//! Error types for the test support crate

use thiserror::Error;

/// Errors that can occur while building fixtures or checking results
#[derive(Debug, Error)]
pub enum TestError {
    /// A fixture could not be built
    #[error("failed to build fixture '{name}': {source}")]
    Fixture {
        name: &'static str,
        #[source]
        source: voxmerge_core::Error,
    },

    /// A regression test recorded failures
    #[error("{test}_reg failed with {count} failure(s)")]
    Failed { test: String, count: usize },
}

/// Result type for test support operations
pub type TestResult<T> = Result<T, TestError>;
