//! BoundingBox - axis-aligned 3D voxel extents

use crate::error::{Error, Result};
use crate::{Point3d, Point3i, Resolution};
use std::fmt;

/// An axis-aligned box of voxels
///
/// The origin `(x, y, z)` is inclusive and the far corner
/// `(right, bottom, back)` is exclusive. This is a simple Copy type since it
/// is small and frequently copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Front z coordinate
    pub z: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
    /// Depth (number of z-slices)
    pub d: i32,
}

impl BoundingBox {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is negative.
    pub fn new(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> Result<Self> {
        if w < 0 || h < 0 || d < 0 {
            return Err(Error::InvalidParameter(format!(
                "box extents must be non-negative: w={}, h={}, d={}",
                w, h, d
            )));
        }
        Ok(Self { x, y, z, w, h, d })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> Self {
        Self { x, y, z, w, h, d }
    }

    /// Create the 1x1x1 box covering a single voxel
    pub const fn from_voxel(p: Point3i) -> Self {
        Self::new_unchecked(p.x, p.y, p.z, 1, 1, 1)
    }

    /// Create the tightest box containing all points
    ///
    /// Returns `None` if `points` is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3i>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Point3i::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3i::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some(Self {
            x: min.x,
            y: min.y,
            z: min.z,
            w: max.x - min.x + 1,
            h: max.y - min.y + 1,
            d: max.z - min.z + 1,
        })
    }

    /// Inclusive origin corner
    #[inline]
    pub fn origin(&self) -> Point3i {
        Point3i::new(self.x, self.y, self.z)
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the back z coordinate (exclusive)
    #[inline]
    pub fn back(&self) -> i32 {
        self.z + self.d
    }

    /// Geometric centre, in voxel-centre coordinates
    pub fn center(&self) -> Point3d {
        Point3d::new(
            self.x as f64 + (self.w as f64 - 1.0) / 2.0,
            self.y as f64 + (self.h as f64 - 1.0) / 2.0,
            self.z as f64 + (self.d as f64 - 1.0) / 2.0,
        )
    }

    /// Number of voxels covered
    #[inline]
    pub fn volume(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.w as usize * self.h as usize * self.d as usize
        }
    }

    /// Check if the box is empty (zero volume)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0 || self.d <= 0
    }

    /// Check if a voxel is inside the box
    #[inline]
    pub fn contains_point(&self, p: Point3i) -> bool {
        p.x >= self.x
            && p.x < self.right()
            && p.y >= self.y
            && p.y < self.bottom()
            && p.z >= self.z
            && p.z < self.back()
    }

    /// Check if this box contains another box
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.z >= self.z
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
            && other.back() <= self.back()
    }

    /// Check if this box overlaps with another
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
            && self.z < other.back()
            && self.back() > other.z
    }

    /// Compute the intersection of two boxes
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let z = self.z.max(other.z);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let back = self.back().min(other.back());

        if x < right && y < bottom && z < back {
            Some(BoundingBox {
                x,
                y,
                z,
                w: right - x,
                h: bottom - y,
                d: back - z,
            })
        } else {
            None
        }
    }

    /// Compute the union (bounding box) of two boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let z = self.z.min(other.z);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        let back = self.back().max(other.back());

        BoundingBox {
            x,
            y,
            z,
            w: right - x,
            h: bottom - y,
            d: back - z,
        }
    }

    /// Translate the box by (dx, dy, dz)
    pub fn translate(&self, dx: i32, dy: i32, dz: i32) -> BoundingBox {
        BoundingBox {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
            ..*self
        }
    }

    /// Expand the box by a margin on all sides
    pub fn expand(&self, margin: i32) -> BoundingBox {
        BoundingBox {
            x: self.x - margin,
            y: self.y - margin,
            z: self.z - margin,
            w: self.w + 2 * margin,
            h: self.h + 2 * margin,
            d: self.d + 2 * margin,
        }
    }

    /// Per-axis distance between the nearest voxel centres of two boxes
    ///
    /// Each component is 0 where the boxes overlap along that axis and 1
    /// where their faces touch.
    pub fn gap(&self, other: &BoundingBox) -> Point3i {
        fn axis(lo1: i32, hi1: i32, lo2: i32, hi2: i32) -> i32 {
            // hi is exclusive; the last voxel of a span is hi - 1
            (lo2 - (hi1 - 1)).max(lo1 - (hi2 - 1)).max(0)
        }
        Point3i::new(
            axis(self.x, self.right(), other.x, other.right()),
            axis(self.y, self.bottom(), other.y, other.bottom()),
            axis(self.z, self.back(), other.z, other.back()),
        )
    }

    /// Euclidean distance between the nearest voxel centres of two boxes
    ///
    /// Measured in voxels when `resolution` is `None`, otherwise in the
    /// physical units of the resolution.
    pub fn distance(&self, other: &BoundingBox, resolution: Option<&Resolution>) -> f64 {
        let gap = self.gap(other);
        match resolution {
            Some(res) => res.scale(gap),
            None => {
                let (gx, gy, gz) = (gap.x as f64, gap.y as f64, gap.z as f64);
                (gx * gx + gy * gy + gz * gz).sqrt()
            }
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "box {} extent {}x{}x{}",
            self.origin(),
            self.w,
            self.h,
            self.d
        )
    }
}
