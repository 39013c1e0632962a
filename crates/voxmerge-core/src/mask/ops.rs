//! Set operations on object masks and the `Region` implementation

use super::ObjectMask;
use crate::{BoundingBox, ConnectivityType, Point3d, Point3i, Region};

impl ObjectMask {
    /// Union of two masks, spanning the union of both boxes
    pub fn union(&self, other: &ObjectMask) -> ObjectMask {
        let bbox = self.bbox.union(&other.bbox);
        let mut voxels = vec![false; bbox.volume()];
        for p in self.on_voxels().chain(other.on_voxels()) {
            // Both inputs lie inside the union box by construction
            if let Some(i) = index_in(&bbox, p) {
                voxels[i] = true;
            }
        }
        ObjectMask { bbox, voxels }
    }

    /// Voxels on in both masks, cropped to the overlap of the boxes
    ///
    /// Returns `None` if the boxes are disjoint or no voxel is on in both.
    pub fn intersection(&self, other: &ObjectMask) -> Option<ObjectMask> {
        let bbox = self.bbox.intersect(&other.bbox)?;
        let mut voxels = vec![false; bbox.volume()];
        let mut any = false;
        for z in bbox.z..bbox.back() {
            for y in bbox.y..bbox.bottom() {
                for x in bbox.x..bbox.right() {
                    let p = Point3i::new(x, y, z);
                    if self.get(p) && other.get(p) {
                        if let Some(i) = index_in(&bbox, p) {
                            voxels[i] = true;
                            any = true;
                        }
                    }
                }
            }
        }
        any.then_some(ObjectMask { bbox, voxels })
    }

    /// Check whether two masks overlap or touch
    ///
    /// Two masks touch when some on voxel of one is a neighbor, under
    /// `connectivity`, of an on voxel of the other.
    pub fn touches(&self, other: &ObjectMask, connectivity: ConnectivityType) -> bool {
        // Anything further than one voxel apart along an axis cannot touch
        if !self.bbox.expand(1).overlaps(&other.bbox) {
            return false;
        }
        let offsets = connectivity.offsets();
        self.on_voxels().any(|p| {
            other.get(p)
                || offsets
                    .iter()
                    .any(|o| other.get(p.offset(o.x, o.y, o.z)))
        })
    }
}

#[inline]
fn index_in(bbox: &BoundingBox, p: Point3i) -> Option<usize> {
    if !bbox.contains_point(p) {
        return None;
    }
    let rx = (p.x - bbox.x) as usize;
    let ry = (p.y - bbox.y) as usize;
    let rz = (p.z - bbox.z) as usize;
    Some((rz * bbox.h as usize + ry) * bbox.w as usize + rx)
}

impl Region for ObjectMask {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    fn number_on_voxels(&self) -> usize {
        self.count_on()
    }

    fn centroid(&self) -> Point3d {
        self.mean_position().unwrap_or_else(|| self.bbox.center())
    }

    fn find_arbitrary_on_voxel(&self) -> Option<Point3i> {
        self.first_on_voxel()
    }

    fn intersect(&self, other: &Self) -> Option<Self> {
        self.intersection(other)
    }

    fn merge(&self, other: &Self) -> Self {
        self.union(other)
    }
}
