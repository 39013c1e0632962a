//! Resolution - physical size of a voxel

use crate::error::{Error, Result};
use crate::Point3i;

/// Physical extent of a single voxel along each axis.
///
/// Used to turn voxel distances into physical distances. All three
/// components are strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    x: f64,
    y: f64,
    z: f64,
}

impl Resolution {
    /// Create a new resolution
    ///
    /// # Errors
    ///
    /// Returns an error if any component is not strictly positive and finite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        for (axis, value) in [("x", x), ("y", y), ("z", z)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "resolution {} must be positive and finite: {}",
                    axis, value
                )));
            }
        }
        Ok(Self { x, y, z })
    }

    /// Create a resolution with the same voxel size along every axis
    pub fn isotropic(size: f64) -> Result<Self> {
        Self::new(size, size, size)
    }

    /// Voxel size along x
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Voxel size along y
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Voxel size along z
    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Physical length of a voxel offset
    pub fn scale(&self, offset: Point3i) -> f64 {
        let dx = offset.x as f64 * self.x;
        let dy = offset.y as f64 * self.y;
        let dz = offset.z as f64 * self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_validation() {
        assert!(Resolution::new(1.0, 1.0, 2.0).is_ok());
        assert!(Resolution::new(0.0, 1.0, 1.0).is_err());
        assert!(Resolution::new(1.0, -1.0, 1.0).is_err());
        assert!(Resolution::new(1.0, 1.0, f64::NAN).is_err());
        assert!(Resolution::isotropic(f64::INFINITY).is_err());
    }

    #[test]
    fn test_resolution_scale() {
        let res = Resolution::new(0.5, 0.5, 2.0).unwrap();
        assert_eq!(res.scale(Point3i::new(0, 0, 3)), 6.0);
        assert_eq!(res.scale(Point3i::new(6, 8, 0)), 5.0);
    }
}
