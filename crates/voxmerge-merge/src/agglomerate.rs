//! One-call agglomeration driver

use crate::condition::AdjacencyCondition;
use crate::error::MergeResult;
use crate::event::MergeObserver;
use crate::merge_graph::MergeGraph;
use crate::payload::PayloadCalculator;
use crate::priority::PriorityAssigner;
use voxmerge_core::{Region, Resolution};

/// Options for [`agglomerate`]
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Physical voxel size passed to conditions and priorities
    pub resolution: Option<Resolution>,
    /// Stop after this many merges
    pub max_merges: Option<usize>,
}

impl MergeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image resolution
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Set the maximum number of merges
    pub fn with_max_merges(mut self, max_merges: usize) -> Self {
        self.max_merges = Some(max_merges);
        self
    }
}

/// Result of an agglomeration run
#[derive(Debug, Clone)]
pub struct MergeOutcome<R> {
    /// Surviving regions, merged or untouched
    pub objects: Vec<R>,
    /// Number of merges performed
    pub merges: usize,
}

/// Merge adjacent regions best-first until no pair qualifies
///
/// Builds a [`MergeGraph`] over `regions` (in order), runs the merge loop
/// and returns the survivors. On error nothing is returned; the partially
/// merged graph is discarded.
///
/// # Example
///
/// ```
/// use voxmerge_core::{ObjectMask, Point3i};
/// use voxmerge_merge::{agglomerate, MergeOptions, MergedPayload, VoxelCount, WithinDistance};
///
/// let regions: Vec<ObjectMask> = (0..3)
///     .map(|x| ObjectMask::from_voxels(&[Point3i::new(x, 0, 0)]).unwrap())
///     .collect();
/// let outcome = agglomerate(
///     regions,
///     VoxelCount,
///     WithinDistance::voxels(1.5),
///     MergedPayload,
///     &MergeOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(outcome.objects.len(), 1);
/// assert_eq!(outcome.merges, 2);
/// ```
pub fn agglomerate<R, P, C, A>(
    regions: Vec<R>,
    payload: P,
    condition: C,
    prioritizer: A,
    options: &MergeOptions,
) -> MergeResult<MergeOutcome<R>>
where
    R: Region,
    P: PayloadCalculator<R> + 'static,
    C: AdjacencyCondition<R> + 'static,
    A: PriorityAssigner<R> + 'static,
{
    agglomerate_observed(regions, payload, condition, prioritizer, options, Vec::new())
}

/// [`agglomerate`] with observers subscribed to the event stream
pub fn agglomerate_observed<R, P, C, A>(
    regions: Vec<R>,
    payload: P,
    condition: C,
    prioritizer: A,
    options: &MergeOptions,
    observers: Vec<Box<dyn MergeObserver>>,
) -> MergeResult<MergeOutcome<R>>
where
    R: Region,
    P: PayloadCalculator<R> + 'static,
    C: AdjacencyCondition<R> + 'static,
    A: PriorityAssigner<R> + 'static,
{
    let mut graph =
        MergeGraph::new(payload, condition, prioritizer).with_resolution(options.resolution);
    for observer in observers {
        graph.subscribe_boxed(observer);
    }
    graph.add_objects_to_graph(regions)?;
    let merges = graph.merge_all(options.max_merges)?;
    Ok(MergeOutcome {
        objects: graph.into_objects(),
        merges,
    })
}
