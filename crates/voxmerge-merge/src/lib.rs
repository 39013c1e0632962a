//! voxmerge-merge - Priority-driven agglomeration of segmented objects
//!
//! This crate merges adjacent object masks best-first:
//!
//! - **Neighbor graph** - A region-adjacency graph with stable vertex ids
//! - **Adjacency conditions** - Which regions become neighbors
//! - **Payloads and priorities** - How desirable each candidate merge is
//! - **Merge graph** - Repeatedly merges the highest-priority pair
//! - **Events** - A stream of merge records for logging and inspection
//!
//! # Examples
//!
//! ## Merging a row of voxels
//!
//! ```
//! use voxmerge_core::{ObjectMask, Point3i};
//! use voxmerge_merge::{MergeGraph, MergedPayload, VoxelCount, WithinDistance};
//!
//! let regions: Vec<ObjectMask> = (0..3)
//!     .map(|x| ObjectMask::from_voxels(&[Point3i::new(x, 0, 0)]).unwrap())
//!     .collect();
//!
//! let mut graph = MergeGraph::new(VoxelCount, WithinDistance::voxels(1.5), MergedPayload);
//! graph.add_objects_to_graph(regions).unwrap();
//! while let Some(best) = graph.find_max_priority() {
//!     graph.merge(best).unwrap();
//! }
//! let objects = graph.into_objects();
//! assert_eq!(objects.len(), 1);
//! assert_eq!(objects[0].count_on(), 3);
//! ```
//!
//! ## Logging merge decisions
//!
//! ```
//! use voxmerge_core::{ObjectMask, Point3i};
//! use voxmerge_merge::{LogObserver, MergeGraph, MergedPayload, Touching, VoxelCount};
//!
//! let mut graph = MergeGraph::new(VoxelCount, Touching::default(), MergedPayload);
//! graph.subscribe(LogObserver::new(log::Level::Info));
//! graph
//!     .add_objects_to_graph(vec![ObjectMask::from_voxels(&[Point3i::new(0, 0, 0)]).unwrap()])
//!     .unwrap();
//! ```

pub mod agglomerate;
pub mod condition;
pub mod describe;
pub mod error;
pub mod event;
pub mod merge_graph;
pub mod neighbor_graph;
pub mod payload;
pub mod priority;
pub mod vertex;

// Re-export core types
pub use voxmerge_core;

// Re-export error types
pub use error::{MergeError, MergeResult};

// Re-export graph types
pub use merge_graph::MergeGraph;
pub use neighbor_graph::{EdgeId, EdgeRef, NeighborGraph, VertexId};
pub use vertex::ObjectVertex;

// Re-export collaborator traits and implementations
pub use condition::{
    AdjacencyCondition, AlwaysAdjacent, BothAdjacent, BoxesIntersect, DistanceUnits, Touching,
    WithinDistance,
};
pub use payload::{FillRatio, PayloadCalculator, VoxelCount};
pub use priority::{
    Limited, MergedPayload, PayloadImprovement, PrioritisedEdge, PriorityAssigner,
    PriorityContext, PriorityLimits,
};

// Re-export events, description and driver
pub use agglomerate::{MergeOptions, MergeOutcome, agglomerate, agglomerate_observed};
pub use describe::describe_graph;
pub use event::{EventRecorder, LogObserver, MergeEvent, MergeObserver, VertexSummary};
