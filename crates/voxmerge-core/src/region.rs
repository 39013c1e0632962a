//! Region - the geometry capability consumed by the merge engine

use crate::{BoundingBox, Point3d, Point3i};

/// Connectivity used when deciding whether two voxels are neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 6-way connectivity (shared faces only)
    #[default]
    SixWay,
    /// 26-way connectivity (faces, edges and corners)
    TwentySixWay,
}

impl ConnectivityType {
    /// Offsets of all neighbors of a voxel under this connectivity
    pub fn offsets(&self) -> Vec<Point3i> {
        let mut offsets = Vec::with_capacity(26);
        for dz in -1i32..=1 {
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let manhattan = dx.abs() + dy.abs() + dz.abs();
                    let keep = match self {
                        ConnectivityType::SixWay => manhattan == 1,
                        ConnectivityType::TwentySixWay => manhattan > 0,
                    };
                    if keep {
                        offsets.push(Point3i::new(dx, dy, dz));
                    }
                }
            }
        }
        offsets
    }
}

/// A labeled set of voxels with a bounding box
///
/// Regions are treated as immutable values: `merge` and `intersect` always
/// produce new instances and duplication is `Clone`.
pub trait Region: Clone {
    /// Bounding box enclosing every on voxel
    fn bounding_box(&self) -> BoundingBox;

    /// Number of on voxels
    fn number_on_voxels(&self) -> usize;

    /// Mean position of the on voxels
    ///
    /// Implementations return the bounding box centre for an empty region.
    fn centroid(&self) -> Point3d;

    /// Some on voxel of the region, or `None` if the region is empty
    ///
    /// The choice must be deterministic for a given region, since the merge
    /// engine orders tied candidates by it.
    fn find_arbitrary_on_voxel(&self) -> Option<Point3i>;

    /// Voxels on in both regions, or `None` if there are none
    fn intersect(&self, other: &Self) -> Option<Self>;

    /// Union of both regions
    fn merge(&self, other: &Self) -> Self;
}
