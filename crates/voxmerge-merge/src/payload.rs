//! Payload calculators: the scalar feature attached to every vertex

use crate::error::MergeResult;
use voxmerge_core::{ObjectMask, Region};

/// Computes the scalar payload of a region
///
/// This is the feature-evaluation collaborator of the merge engine. Any
/// closure `Fn(&R) -> MergeResult<f64>` is a payload calculator.
pub trait PayloadCalculator<R> {
    /// Compute the payload of `region`
    ///
    /// # Errors
    ///
    /// Implementations return
    /// [`MergeError::FeatureCalculationFailed`](crate::MergeError::FeatureCalculationFailed)
    /// when the feature cannot be evaluated.
    fn calculate(&self, region: &R) -> MergeResult<f64>;
}

impl<R, F> PayloadCalculator<R> for F
where
    F: Fn(&R) -> MergeResult<f64>,
{
    fn calculate(&self, region: &R) -> MergeResult<f64> {
        self(region)
    }
}

/// Payload = number of on voxels
#[derive(Debug, Clone, Copy, Default)]
pub struct VoxelCount;

impl<R: Region> PayloadCalculator<R> for VoxelCount {
    fn calculate(&self, region: &R) -> MergeResult<f64> {
        Ok(region.number_on_voxels() as f64)
    }
}

/// Payload = fraction of the bounding box covered by the mask
///
/// Compact objects score close to 1.0; merging two distant fragments
/// lowers the score, which makes this a natural payload for
/// [`PayloadImprovement`](crate::PayloadImprovement).
#[derive(Debug, Clone, Copy, Default)]
pub struct FillRatio;

impl PayloadCalculator<ObjectMask> for FillRatio {
    fn calculate(&self, region: &ObjectMask) -> MergeResult<f64> {
        Ok(region.fill_ratio())
    }
}
