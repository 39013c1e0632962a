//! voxmerge - Merging of adjacent segmented objects for Rust
//!
//! # Overview
//!
//! voxmerge takes the objects produced by a segmentation (voxel masks in a
//! 3D image) and merges adjacent ones in priority order:
//!
//! - Object masks, bounding boxes and voxel geometry
//! - A region-adjacency graph with stable vertex ids
//! - Pluggable adjacency conditions, payloads and priorities
//! - Best-first merging with deterministic tie-breaking
//! - An event stream for logging and inspecting merge decisions
//!
//! # Example
//!
//! ```
//! use voxmerge::merge::{agglomerate, MergeOptions, MergedPayload, Touching, VoxelCount};
//! use voxmerge::{BoundingBox, ObjectMask};
//!
//! // Two touching cubes and one far away
//! let regions = vec![
//!     ObjectMask::filled(BoundingBox::new(0, 0, 0, 2, 2, 2).unwrap()).unwrap(),
//!     ObjectMask::filled(BoundingBox::new(2, 0, 0, 2, 2, 2).unwrap()).unwrap(),
//!     ObjectMask::filled(BoundingBox::new(10, 10, 10, 2, 2, 2).unwrap()).unwrap(),
//! ];
//! let outcome = agglomerate(
//!     regions,
//!     VoxelCount,
//!     Touching::default(),
//!     MergedPayload,
//!     &MergeOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(outcome.objects.len(), 2);
//! assert_eq!(outcome.merges, 1);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use voxmerge_core::*;

// Re-export the merge engine as a module
pub use voxmerge_merge as merge;
