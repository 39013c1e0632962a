//! ObjectMask - a dense binary voxel mask
//!
//! An object mask is a bounding box plus one on/off flag per voxel inside
//! it. Flags are stored in z-major raster order: the voxel at
//! `(x, y, z)` relative to the box origin lives at index
//! `(z * h + y) * w + x`.
//!
//! Set operations and the [`Region`](crate::Region) implementation live in
//! the `ops` submodule.

mod ops;

use crate::error::{Error, Result};
use crate::{BoundingBox, Point3d, Point3i};

/// A binary voxel mask with its bounding box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMask {
    bbox: BoundingBox,
    voxels: Vec<bool>,
}

impl ObjectMask {
    /// Create a mask with every voxel off
    ///
    /// # Errors
    ///
    /// Returns an error if the box has a negative extent.
    pub fn new(bbox: BoundingBox) -> Result<Self> {
        let bbox = BoundingBox::new(bbox.x, bbox.y, bbox.z, bbox.w, bbox.h, bbox.d)?;
        Ok(Self {
            bbox,
            voxels: vec![false; bbox.volume()],
        })
    }

    /// Create a mask with every voxel in the box on
    pub fn filled(bbox: BoundingBox) -> Result<Self> {
        let mut mask = Self::new(bbox)?;
        mask.voxels.fill(true);
        Ok(mask)
    }

    /// Create a mask from a list of on voxels, using the tightest box
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if `points` is empty.
    pub fn from_voxels(points: &[Point3i]) -> Result<Self> {
        let bbox = BoundingBox::from_points(points).ok_or(Error::EmptyInput("voxel list"))?;
        let mut mask = Self::new(bbox)?;
        for &p in points {
            mask.set(p, true)?;
        }
        Ok(mask)
    }

    /// The bounding box of the mask
    #[inline]
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    #[inline]
    fn index_of(&self, p: Point3i) -> Option<usize> {
        if !self.bbox.contains_point(p) {
            return None;
        }
        let rx = (p.x - self.bbox.x) as usize;
        let ry = (p.y - self.bbox.y) as usize;
        let rz = (p.z - self.bbox.z) as usize;
        let (w, h) = (self.bbox.w as usize, self.bbox.h as usize);
        Some((rz * h + ry) * w + rx)
    }

    #[inline]
    fn point_at(&self, index: usize) -> Point3i {
        let (w, h) = (self.bbox.w as usize, self.bbox.h as usize);
        let rx = index % w;
        let ry = (index / w) % h;
        let rz = index / (w * h);
        Point3i::new(
            self.bbox.x + rx as i32,
            self.bbox.y + ry as i32,
            self.bbox.z + rz as i32,
        )
    }

    /// Check whether a voxel is on. Voxels outside the box are off.
    #[inline]
    pub fn get(&self, p: Point3i) -> bool {
        self.index_of(p).is_some_and(|i| self.voxels[i])
    }

    /// Switch a voxel on or off
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the voxel is outside the box.
    pub fn set(&mut self, p: Point3i, on: bool) -> Result<()> {
        let index = self.index_of(p).ok_or(Error::OutOfBounds {
            point: p,
            bbox: self.bbox,
        })?;
        self.voxels[index] = on;
        Ok(())
    }

    /// Iterate over the on voxels in raster order (z, then y, then x)
    pub fn on_voxels(&self) -> impl Iterator<Item = Point3i> + '_ {
        self.voxels
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| self.point_at(i))
    }

    /// Count the on voxels
    pub fn count_on(&self) -> usize {
        self.voxels.iter().filter(|on| **on).count()
    }

    /// Check if no voxel is on
    pub fn is_empty(&self) -> bool {
        !self.voxels.iter().any(|on| *on)
    }

    /// First on voxel in raster order
    pub fn first_on_voxel(&self) -> Option<Point3i> {
        self.voxels.iter().position(|on| *on).map(|i| self.point_at(i))
    }

    /// Mean position of the on voxels
    ///
    /// Returns `None` for an empty mask.
    pub fn mean_position(&self) -> Option<Point3d> {
        let mut count = 0usize;
        let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
        for p in self.on_voxels() {
            count += 1;
            sx += p.x as f64;
            sy += p.y as f64;
            sz += p.z as f64;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Point3d::new(sx / n, sy / n, sz / n))
    }

    /// Fraction of the bounding box covered by on voxels
    ///
    /// Returns 0.0 for an empty box.
    pub fn fill_ratio(&self) -> f64 {
        let volume = self.bbox.volume();
        if volume == 0 {
            return 0.0;
        }
        self.count_on() as f64 / volume as f64
    }
}
