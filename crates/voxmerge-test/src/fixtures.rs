//! Synthetic object masks for tests

use crate::error::{TestError, TestResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxmerge_core::{BoundingBox, ObjectMask, Point3i};

/// A mask with a single on voxel
pub fn voxel(x: i32, y: i32, z: i32) -> TestResult<ObjectMask> {
    from_points("voxel", &[Point3i::new(x, y, z)])
}

/// A mask with every voxel of the box on
pub fn cuboid(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> TestResult<ObjectMask> {
    BoundingBox::new(x, y, z, w, h, d)
        .and_then(ObjectMask::filled)
        .map_err(|source| TestError::Fixture {
            name: "cuboid",
            source,
        })
}

/// A mask from a list of (x, y, z) voxels
pub fn mask(points: &[(i32, i32, i32)]) -> TestResult<ObjectMask> {
    let points: Vec<Point3i> = points
        .iter()
        .map(|&(x, y, z)| Point3i::new(x, y, z))
        .collect();
    from_points("mask", &points)
}

fn from_points(name: &'static str, points: &[Point3i]) -> TestResult<ObjectMask> {
    ObjectMask::from_voxels(points).map_err(|source| TestError::Fixture { name, source })
}

/// `n` single voxels along the x axis, `spacing` voxels apart
pub fn voxel_row(n: i32, spacing: i32) -> TestResult<Vec<ObjectMask>> {
    (0..n).map(|i| voxel(i * spacing, 0, 0)).collect()
}

/// `count` cubes of side `size` at random positions inside `[0, extent)^3`
///
/// The same seed always produces the same cubes in the same order. Cubes
/// may overlap.
pub fn scattered_cubes(
    seed: u64,
    count: usize,
    extent: i32,
    size: i32,
) -> TestResult<Vec<ObjectMask>> {
    if size <= 0 || extent < size {
        return Err(TestError::Fixture {
            name: "scattered_cubes",
            source: voxmerge_core::Error::InvalidParameter(format!(
                "cube size {} does not fit extent {}",
                size, extent
            )),
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let limit = extent - size + 1;
    (0..count)
        .map(|_| {
            let x = rng.random_range(0..limit);
            let y = rng.random_range(0..limit);
            let z = rng.random_range(0..limit);
            cuboid(x, y, z, size, size, size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmerge_core::Region;

    #[test]
    fn test_fixtures() {
        assert_eq!(voxel(1, 2, 3).unwrap().count_on(), 1);
        assert_eq!(cuboid(0, 0, 0, 2, 2, 2).unwrap().count_on(), 8);
        assert!(cuboid(0, 0, 0, -2, 2, 2).is_err());
        assert_eq!(mask(&[(0, 0, 0), (0, 0, 1)]).unwrap().count_on(), 2);

        let row = voxel_row(3, 2).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row[2].find_arbitrary_on_voxel(), Some(Point3i::new(4, 0, 0)));
    }

    #[test]
    fn test_scattered_cubes_are_reproducible() {
        let a = scattered_cubes(7, 10, 20, 3).unwrap();
        let b = scattered_cubes(7, 10, 20, 3).unwrap();
        assert_eq!(a, b);
        for cube in &a {
            let bbox = cube.bounding_box();
            assert!(bbox.x >= 0 && bbox.right() <= 20);
            assert_eq!(cube.count_on(), 27);
        }
        assert!(scattered_cubes(7, 1, 2, 3).is_err());
    }
}
