//! Adjacency conditions: which regions become graph neighbors
//!
//! An adjacency condition is a pure predicate over a *source* region (the
//! vertex being inserted) and a *candidate* region (one of its possible
//! neighbors). Both regions are passed explicitly, so there is no stored
//! source object to forget to update between insertions.

use crate::error::{MergeError, MergeResult};
use voxmerge_core::{ConnectivityType, ObjectMask, Region, Resolution};

/// Decides whether two regions are connected in the neighbor graph
pub trait AdjacencyCondition<R> {
    /// Check whether `candidate` is a neighbor of `source`
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::OperationFailed`] if the test needs information
    /// that is missing, such as a physical resolution.
    fn accept(
        &self,
        source: &R,
        candidate: &R,
        resolution: Option<&Resolution>,
    ) -> MergeResult<bool>;
}

/// Units in which a distance limit is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnits {
    /// Voxel units; the resolution is ignored
    #[default]
    Voxels,
    /// Physical units of the image resolution; a resolution is required
    Physical,
}

impl DistanceUnits {
    /// Resolution to measure with, or an error if one is required but absent
    pub(crate) fn resolve<'a>(
        &self,
        resolution: Option<&'a Resolution>,
    ) -> MergeResult<Option<&'a Resolution>> {
        match self {
            DistanceUnits::Voxels => Ok(None),
            DistanceUnits::Physical => resolution.map(Some).ok_or_else(|| {
                MergeError::OperationFailed(
                    "a physical distance requires an image resolution".into(),
                )
            }),
        }
    }
}

/// Every pair of regions is adjacent
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAdjacent;

impl<R> AdjacencyCondition<R> for AlwaysAdjacent {
    fn accept(
        &self,
        _source: &R,
        _candidate: &R,
        _resolution: Option<&Resolution>,
    ) -> MergeResult<bool> {
        Ok(true)
    }
}

/// Adjacent when the bounding boxes lie within a maximum distance
///
/// The distance is measured between the nearest voxel centres of the two
/// bounding boxes (see [`BoundingBox::distance`](voxmerge_core::BoundingBox::distance)).
#[derive(Debug, Clone, Copy)]
pub struct WithinDistance {
    /// Largest accepted distance (inclusive)
    pub max_distance: f64,
    /// Units of `max_distance`
    pub units: DistanceUnits,
}

impl WithinDistance {
    /// Distance limit in voxels
    pub fn voxels(max_distance: f64) -> Self {
        Self {
            max_distance,
            units: DistanceUnits::Voxels,
        }
    }

    /// Distance limit in physical units
    pub fn physical(max_distance: f64) -> Self {
        Self {
            max_distance,
            units: DistanceUnits::Physical,
        }
    }
}

impl<R: Region> AdjacencyCondition<R> for WithinDistance {
    fn accept(
        &self,
        source: &R,
        candidate: &R,
        resolution: Option<&Resolution>,
    ) -> MergeResult<bool> {
        let resolution = self.units.resolve(resolution)?;
        let distance = source
            .bounding_box()
            .distance(&candidate.bounding_box(), resolution);
        Ok(distance <= self.max_distance)
    }
}

/// Adjacent when the source box, grown by `margin` voxels, overlaps the
/// candidate box
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxesIntersect {
    pub margin: i32,
}

impl<R: Region> AdjacencyCondition<R> for BoxesIntersect {
    fn accept(
        &self,
        source: &R,
        candidate: &R,
        _resolution: Option<&Resolution>,
    ) -> MergeResult<bool> {
        Ok(source
            .bounding_box()
            .expand(self.margin)
            .overlaps(&candidate.bounding_box()))
    }
}

/// Adjacent when the masks overlap or touch
#[derive(Debug, Clone, Copy, Default)]
pub struct Touching {
    pub connectivity: ConnectivityType,
}

impl AdjacencyCondition<ObjectMask> for Touching {
    fn accept(
        &self,
        source: &ObjectMask,
        candidate: &ObjectMask,
        _resolution: Option<&Resolution>,
    ) -> MergeResult<bool> {
        Ok(source.touches(candidate, self.connectivity))
    }
}

/// Adjacent when both conditions accept
///
/// The second condition is not evaluated when the first rejects, so put the
/// cheaper test first.
#[derive(Debug, Clone, Copy)]
pub struct BothAdjacent<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> BothAdjacent<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<R, A, B> AdjacencyCondition<R> for BothAdjacent<A, B>
where
    A: AdjacencyCondition<R>,
    B: AdjacencyCondition<R>,
{
    fn accept(
        &self,
        source: &R,
        candidate: &R,
        resolution: Option<&Resolution>,
    ) -> MergeResult<bool> {
        Ok(self.first.accept(source, candidate, resolution)?
            && self.second.accept(source, candidate, resolution)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmerge_core::Point3i;

    fn voxel(x: i32, y: i32, z: i32) -> ObjectMask {
        ObjectMask::from_voxels(&[Point3i::new(x, y, z)]).unwrap()
    }

    #[test]
    fn test_within_distance_voxels() {
        let cond = WithinDistance::voxels(1.5);
        let a = voxel(0, 0, 0);
        assert!(cond.accept(&a, &voxel(1, 0, 0), None).unwrap());
        assert!(cond.accept(&a, &voxel(1, 1, 0), None).unwrap());
        assert!(!cond.accept(&a, &voxel(2, 0, 0), None).unwrap());
    }

    #[test]
    fn test_within_distance_physical() {
        let cond = WithinDistance::physical(1.0);
        let a = voxel(0, 0, 0);
        let b = voxel(0, 0, 1);

        let fine_z = Resolution::new(1.0, 1.0, 0.5).unwrap();
        let coarse_z = Resolution::new(1.0, 1.0, 2.0).unwrap();
        assert!(cond.accept(&a, &b, Some(&fine_z)).unwrap());
        assert!(!cond.accept(&a, &b, Some(&coarse_z)).unwrap());
    }

    #[test]
    fn test_within_distance_physical_requires_resolution() {
        let cond = WithinDistance::physical(1.0);
        let result = cond.accept(&voxel(0, 0, 0), &voxel(1, 0, 0), None);
        assert!(matches!(result, Err(MergeError::OperationFailed(_))));
    }

    #[test]
    fn test_boxes_intersect() {
        let a = voxel(0, 0, 0);
        let b = voxel(2, 0, 0);
        assert!(!BoxesIntersect { margin: 0 }.accept(&a, &b, None).unwrap());
        assert!(!BoxesIntersect { margin: 1 }.accept(&a, &b, None).unwrap());
        assert!(BoxesIntersect { margin: 2 }.accept(&a, &b, None).unwrap());
    }

    #[test]
    fn test_touching_and_combinator() {
        let a = voxel(0, 0, 0);
        let diagonal = voxel(1, 1, 0);
        let six = Touching {
            connectivity: ConnectivityType::SixWay,
        };
        let twenty_six = Touching {
            connectivity: ConnectivityType::TwentySixWay,
        };
        assert!(!six.accept(&a, &diagonal, None).unwrap());
        assert!(twenty_six.accept(&a, &diagonal, None).unwrap());

        let both = BothAdjacent::new(WithinDistance::voxels(10.0), six);
        assert!(!both.accept(&a, &diagonal, None).unwrap());
        assert!(both.accept(&a, &voxel(0, 1, 0), None).unwrap());
    }

    #[test]
    fn test_always_adjacent() {
        assert!(AlwaysAdjacent.accept(&voxel(0, 0, 0), &voxel(50, 50, 50), None).unwrap());
    }
}
