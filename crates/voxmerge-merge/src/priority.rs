//! Priority assignment for candidate merges
//!
//! When two vertices are connected, a [`PriorityAssigner`] decides what the
//! merged region would be, how desirable the merge is, and whether it should
//! be considered at all. The result is cached on the edge as a
//! [`PrioritisedEdge`] and never recomputed.

use crate::condition::DistanceUnits;
use crate::error::{MergeError, MergeResult};
use crate::payload::PayloadCalculator;
use crate::vertex::ObjectVertex;
use voxmerge_core::{Region, Resolution};

/// Edge payload: the prospective merge of the two endpoints
///
/// Only edges offered for merging carry a candidate. Rejected edges keep
/// the graph topology but never build the merged region.
#[derive(Debug)]
pub struct PrioritisedEdge<R> {
    candidate: Option<ObjectVertex<R>>,
    priority: f64,
}

impl<R: Region> PrioritisedEdge<R> {
    /// An edge offered for merging
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::FeatureCalculationFailed`] if the priority is
    /// not finite, and [`MergeError::EmptyCandidate`] if the merged region
    /// has no on voxel.
    pub fn considered(candidate: ObjectVertex<R>, priority: f64) -> MergeResult<Self> {
        if !priority.is_finite() {
            return Err(MergeError::FeatureCalculationFailed(format!(
                "priority is not finite: {}",
                priority
            )));
        }
        if candidate.region().find_arbitrary_on_voxel().is_none() {
            return Err(MergeError::EmptyCandidate);
        }
        Ok(Self {
            candidate: Some(candidate),
            priority,
        })
    }

    /// An edge kept for topology but never merged
    pub fn rejected() -> Self {
        Self {
            candidate: None,
            priority: f64::NEG_INFINITY,
        }
    }

    /// The merged vertex that would replace both endpoints, if considered
    #[inline]
    pub fn candidate(&self) -> Option<&ObjectVertex<R>> {
        self.candidate.as_ref()
    }

    /// Merge priority; higher merges first, `-inf` when rejected
    #[inline]
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Whether the edge takes part in the maximum-priority search
    #[inline]
    pub fn consider_for_merge(&self) -> bool {
        self.candidate.is_some()
    }

    /// Unwrap the cached candidate
    pub fn into_candidate(self) -> Option<ObjectVertex<R>> {
        self.candidate
    }
}

/// What a priority assigner may use besides the two vertices
pub struct PriorityContext<'a, R> {
    /// Payload of a merged candidate
    pub payload: &'a dyn PayloadCalculator<R>,
    /// Physical voxel size, when known
    pub resolution: Option<&'a Resolution>,
}

impl<R: Region> PriorityContext<'_, R> {
    /// Wrap a region in a vertex, computing its payload
    ///
    /// # Errors
    ///
    /// Propagates payload failures, and returns
    /// [`MergeError::FeatureCalculationFailed`] for a non-finite payload.
    pub fn create_vertex(&self, region: R) -> MergeResult<ObjectVertex<R>> {
        let payload = self.payload.calculate(&region)?;
        if !payload.is_finite() {
            return Err(MergeError::FeatureCalculationFailed(format!(
                "payload is not finite: {}",
                payload
            )));
        }
        Ok(ObjectVertex::new(region, payload))
    }
}

/// Computes the prospective merge of two adjacent vertices
pub trait PriorityAssigner<R> {
    /// Compute the edge payload for connecting `from` (the vertex being
    /// inserted) with `to` (an existing neighbor)
    ///
    /// The default builds the merged region and hands it to
    /// [`prioritise_merged`](Self::prioritise_merged). Assigners that can
    /// reject a pair without the merged region override this.
    ///
    /// # Errors
    ///
    /// Payload failures on the merged candidate abort the run.
    fn assign_priority(
        &self,
        from: &ObjectVertex<R>,
        to: &ObjectVertex<R>,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<PrioritisedEdge<R>>
    where
        R: Region,
    {
        let merged = from.region().merge(to.region());
        self.prioritise_merged(from, to, merged, ctx)
    }

    /// Compute the edge payload when the merged region is already built
    ///
    /// # Errors
    ///
    /// Payload failures on the merged candidate abort the run.
    fn prioritise_merged(
        &self,
        from: &ObjectVertex<R>,
        to: &ObjectVertex<R>,
        merged: R,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<PrioritisedEdge<R>>;
}

/// Priority = payload of the merged region
///
/// Every edge is considered, so agglomeration continues until a single
/// region remains in each connected component of the graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergedPayload;

impl<R: Region> PriorityAssigner<R> for MergedPayload {
    fn prioritise_merged(
        &self,
        _from: &ObjectVertex<R>,
        _to: &ObjectVertex<R>,
        merged: R,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<PrioritisedEdge<R>> {
        let candidate = ctx.create_vertex(merged)?;
        let priority = candidate.payload();
        PrioritisedEdge::considered(candidate, priority)
    }
}

/// Priority = gain of the merged payload over the two separate payloads
///
/// The baseline is the mean of both payloads weighted by voxel count. The
/// edge is considered only when the gain reaches `min_improvement`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadImprovement {
    pub min_improvement: f64,
}

impl PayloadImprovement {
    pub fn new(min_improvement: f64) -> Self {
        Self { min_improvement }
    }
}

impl<R: Region> PriorityAssigner<R> for PayloadImprovement {
    fn prioritise_merged(
        &self,
        from: &ObjectVertex<R>,
        to: &ObjectVertex<R>,
        merged: R,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<PrioritisedEdge<R>> {
        let candidate = ctx.create_vertex(merged)?;

        let (n_from, n_to) = (from.voxel_count() as f64, to.voxel_count() as f64);
        let baseline = if n_from + n_to > 0.0 {
            (from.payload() * n_from + to.payload() * n_to) / (n_from + n_to)
        } else {
            (from.payload() + to.payload()) / 2.0
        };
        let improvement = candidate.payload() - baseline;

        if improvement >= self.min_improvement {
            PrioritisedEdge::considered(candidate, improvement)
        } else {
            Ok(PrioritisedEdge::rejected())
        }
    }
}

/// Geometric limits applied before a priority is computed
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityLimits {
    /// Largest bounding-box distance between the two vertices
    pub max_distance: Option<f64>,
    /// Units of `max_distance`
    pub units: DistanceUnits,
    /// Largest voxel count of the merged region
    pub max_merged_voxels: Option<usize>,
}

impl PriorityLimits {
    /// Create limits with nothing restricted
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum distance in voxels
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Set the units of the maximum distance
    pub fn with_units(mut self, units: DistanceUnits) -> Self {
        self.units = units;
        self
    }

    /// Set the maximum voxel count of a merged region
    pub fn with_max_merged_voxels(mut self, max_voxels: usize) -> Self {
        self.max_merged_voxels = Some(max_voxels);
        self
    }
}

/// Rejects pairs outside [`PriorityLimits`] without evaluating the payload,
/// and otherwise delegates to `inner`
///
/// The distance limit is checked on the bounding boxes alone, so far pairs
/// never build a merged region. The merged region is built at most once.
#[derive(Debug, Clone, Copy)]
pub struct Limited<P> {
    pub inner: P,
    pub limits: PriorityLimits,
}

impl<P> Limited<P> {
    pub fn new(inner: P, limits: PriorityLimits) -> Self {
        Self { inner, limits }
    }

    fn too_far<R: Region>(
        &self,
        from: &ObjectVertex<R>,
        to: &ObjectVertex<R>,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<bool> {
        let Some(max_distance) = self.limits.max_distance else {
            return Ok(false);
        };
        let resolution = self.limits.units.resolve(ctx.resolution)?;
        let distance = from
            .region()
            .bounding_box()
            .distance(&to.region().bounding_box(), resolution);
        Ok(distance > max_distance)
    }

    fn too_large<R: Region>(&self, merged: &R) -> bool {
        self.limits
            .max_merged_voxels
            .is_some_and(|max_voxels| merged.number_on_voxels() > max_voxels)
    }
}

impl<R, P> PriorityAssigner<R> for Limited<P>
where
    R: Region,
    P: PriorityAssigner<R>,
{
    fn assign_priority(
        &self,
        from: &ObjectVertex<R>,
        to: &ObjectVertex<R>,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<PrioritisedEdge<R>> {
        if self.too_far(from, to, ctx)? {
            return Ok(PrioritisedEdge::rejected());
        }
        let merged = from.region().merge(to.region());
        if self.too_large(&merged) {
            return Ok(PrioritisedEdge::rejected());
        }
        self.inner.prioritise_merged(from, to, merged, ctx)
    }

    fn prioritise_merged(
        &self,
        from: &ObjectVertex<R>,
        to: &ObjectVertex<R>,
        merged: R,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<PrioritisedEdge<R>> {
        if self.too_far(from, to, ctx)? || self.too_large(&merged) {
            return Ok(PrioritisedEdge::rejected());
        }
        self.inner.prioritise_merged(from, to, merged, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{FillRatio, VoxelCount};
    use std::cell::Cell;
    use std::rc::Rc;
    use voxmerge_core::{BoundingBox, ObjectMask, Point3d, Point3i};

    fn vertex(
        points: &[(i32, i32, i32)],
        payload: &dyn PayloadCalculator<ObjectMask>,
    ) -> ObjectVertex<ObjectMask> {
        let points: Vec<Point3i> = points
            .iter()
            .map(|&(x, y, z)| Point3i::new(x, y, z))
            .collect();
        let mask = ObjectMask::from_voxels(&points).unwrap();
        let payload = payload.calculate(&mask).unwrap();
        ObjectVertex::new(mask, payload)
    }

    #[test]
    fn test_merged_payload() {
        let ctx = PriorityContext {
            payload: &VoxelCount,
            resolution: None,
        };
        let a = vertex(&[(0, 0, 0)], &VoxelCount);
        let b = vertex(&[(1, 0, 0), (2, 0, 0)], &VoxelCount);
        let edge = MergedPayload.assign_priority(&a, &b, &ctx).unwrap();
        assert!(edge.consider_for_merge());
        assert_eq!(edge.priority(), 3.0);
        assert_eq!(edge.candidate().unwrap().voxel_count(), 3);
    }

    #[test]
    fn test_payload_improvement() {
        let ctx = PriorityContext {
            payload: &FillRatio,
            resolution: None,
        };
        // Two halves of a 2x1x1 bar: merging keeps the fill ratio at 1.0
        let a = vertex(&[(0, 0, 0)], &FillRatio);
        let b = vertex(&[(1, 0, 0)], &FillRatio);
        let edge = PayloadImprovement::new(0.0).assign_priority(&a, &b, &ctx).unwrap();
        assert!(edge.consider_for_merge());
        assert_eq!(edge.priority(), 0.0);

        // Distant voxels: the merged box is mostly empty
        let c = vertex(&[(3, 0, 0)], &FillRatio);
        let edge = PayloadImprovement::new(0.0).assign_priority(&a, &c, &ctx).unwrap();
        assert!(!edge.consider_for_merge());
        assert!(edge.candidate().is_none());
    }

    #[test]
    fn test_limited_distance() {
        let ctx = PriorityContext {
            payload: &VoxelCount,
            resolution: None,
        };
        let limited = Limited::new(MergedPayload, PriorityLimits::new().with_max_distance(1.0));
        let a = vertex(&[(0, 0, 0)], &VoxelCount);
        let near = vertex(&[(1, 0, 0)], &VoxelCount);
        let far = vertex(&[(3, 0, 0)], &VoxelCount);

        assert!(limited.assign_priority(&a, &near, &ctx).unwrap().consider_for_merge());

        let edge = limited.assign_priority(&a, &far, &ctx).unwrap();
        assert!(!edge.consider_for_merge());
        assert!(edge.candidate().is_none());
        assert_eq!(edge.priority(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_limited_physical_distance_without_resolution() {
        let ctx = PriorityContext {
            payload: &VoxelCount,
            resolution: None,
        };
        let limits = PriorityLimits::new()
            .with_max_distance(1.0)
            .with_units(DistanceUnits::Physical);
        let a = vertex(&[(0, 0, 0)], &VoxelCount);
        let b = vertex(&[(1, 0, 0)], &VoxelCount);
        let result = Limited::new(MergedPayload, limits).assign_priority(&a, &b, &ctx);
        assert!(matches!(result, Err(MergeError::OperationFailed(_))));
    }

    #[test]
    fn test_limited_voxel_count() {
        let ctx = PriorityContext {
            payload: &VoxelCount,
            resolution: None,
        };
        let limited = Limited::new(MergedPayload, PriorityLimits::new().with_max_merged_voxels(2));
        let a = vertex(&[(0, 0, 0)], &VoxelCount);
        let b = vertex(&[(1, 0, 0)], &VoxelCount);
        let c = vertex(&[(1, 0, 0), (2, 0, 0)], &VoxelCount);
        assert!(limited.assign_priority(&a, &b, &ctx).unwrap().consider_for_merge());
        assert!(!limited.assign_priority(&a, &c, &ctx).unwrap().consider_for_merge());
    }

    /// Mask that counts how often it is merged
    #[derive(Clone)]
    struct CountedMask {
        mask: ObjectMask,
        merges: Rc<Cell<usize>>,
    }

    impl Region for CountedMask {
        fn bounding_box(&self) -> BoundingBox {
            self.mask.bounding_box()
        }

        fn number_on_voxels(&self) -> usize {
            self.mask.number_on_voxels()
        }

        fn centroid(&self) -> Point3d {
            self.mask.centroid()
        }

        fn find_arbitrary_on_voxel(&self) -> Option<Point3i> {
            self.mask.find_arbitrary_on_voxel()
        }

        fn intersect(&self, other: &Self) -> Option<Self> {
            self.mask.intersect(&other.mask).map(|mask| CountedMask {
                mask,
                merges: self.merges.clone(),
            })
        }

        fn merge(&self, other: &Self) -> Self {
            self.merges.set(self.merges.get() + 1);
            CountedMask {
                mask: self.mask.merge(&other.mask),
                merges: self.merges.clone(),
            }
        }
    }

    fn counted(p: Point3i, merges: &Rc<Cell<usize>>) -> ObjectVertex<CountedMask> {
        let mask = ObjectMask::from_voxels(&[p]).unwrap();
        ObjectVertex::new(
            CountedMask {
                mask,
                merges: merges.clone(),
            },
            1.0,
        )
    }

    #[test]
    fn test_limited_distance_skips_merge_of_far_pairs() {
        let merges = Rc::new(Cell::new(0));
        let ctx = PriorityContext {
            payload: &VoxelCount,
            resolution: None,
        };
        let limits = PriorityLimits::new()
            .with_max_distance(1.0)
            .with_max_merged_voxels(10);
        let limited = Limited::new(MergedPayload, limits);

        // The union box of these two would hold 10^8 voxels
        let a = counted(Point3i::new(0, 0, 0), &merges);
        let far = counted(Point3i::new(999, 999, 99), &merges);
        let edge = limited.assign_priority(&a, &far, &ctx).unwrap();
        assert!(!edge.consider_for_merge());
        assert!(edge.candidate().is_none());
        assert_eq!(merges.get(), 0);
    }

    #[test]
    fn test_limited_builds_merge_once() {
        let merges = Rc::new(Cell::new(0));
        let ctx = PriorityContext {
            payload: &VoxelCount,
            resolution: None,
        };
        let limits = PriorityLimits::new()
            .with_max_distance(1.0)
            .with_max_merged_voxels(10);
        let limited = Limited::new(MergedPayload, limits);

        let a = counted(Point3i::new(0, 0, 0), &merges);
        let b = counted(Point3i::new(1, 0, 0), &merges);
        let edge = limited.assign_priority(&a, &b, &ctx).unwrap();
        assert!(edge.consider_for_merge());
        assert_eq!(edge.priority(), 2.0);
        assert_eq!(merges.get(), 1);

        // Nested limits still share the single merge
        let nested = Limited::new(limited, PriorityLimits::new().with_max_merged_voxels(5));
        let edge = nested.assign_priority(&a, &b, &ctx).unwrap();
        assert!(edge.consider_for_merge());
        assert_eq!(merges.get(), 2);
    }

    #[test]
    fn test_non_finite_payload_fails() {
        let nan = |_: &ObjectMask| -> MergeResult<f64> { Ok(f64::NAN) };
        let ctx = PriorityContext {
            payload: &nan,
            resolution: None,
        };
        let a = vertex(&[(0, 0, 0)], &VoxelCount);
        let b = vertex(&[(1, 0, 0)], &VoxelCount);
        let result = MergedPayload.assign_priority(&a, &b, &ctx);
        assert!(matches!(result, Err(MergeError::FeatureCalculationFailed(_))));
    }
}
