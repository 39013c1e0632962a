//! Point3i, Point3d - Voxel and real-valued 3D points

use std::fmt;

/// Integer voxel coordinate.
///
/// Ordering is lexicographic by `x`, then `y`, then `z`. The merge engine
/// relies on this ordering to break ties between equal priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3i {
    /// Create a new point
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Translate the point by (dx, dy, dz)
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Point3i {
        Point3i::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Convert to a real-valued point at the voxel centre
    #[inline]
    pub fn to_f64(&self) -> Point3d {
        Point3d::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl fmt::Display for Point3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Real-valued 3D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    /// Create a new point
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point3d) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Point3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1},{:.1},{:.1})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ordering_is_x_then_y_then_z() {
        let a = Point3i::new(0, 5, 5);
        let b = Point3i::new(1, 0, 0);
        let c = Point3i::new(1, 0, 1);
        assert!(a < b);
        assert!(b < c);

        let mut points = vec![c, a, b];
        points.sort();
        assert_eq!(points, vec![a, b, c]);
    }

    #[test]
    fn test_point_distance() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_point_display() {
        assert_eq!(Point3i::new(1, -2, 3).to_string(), "(1,-2,3)");
        assert_eq!(Point3d::new(0.5, 1.0, 2.0).to_string(), "(0.5,1.0,2.0)");
    }
}
