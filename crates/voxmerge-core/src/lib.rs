//! voxmerge-core - Geometry for the voxmerge object-merging engine
//!
//! This crate provides the data structures the merge engine operates on:
//!
//! - [`Point3i`] / [`Point3d`] - Voxel and real-valued points
//! - [`BoundingBox`] - Axis-aligned voxel extents
//! - [`Resolution`] - Physical voxel size
//! - [`Region`] - The geometry capability the engine consumes
//! - [`ObjectMask`] - A dense binary mask implementing [`Region`]
//!
//! # Example
//!
//! ```
//! use voxmerge_core::{ObjectMask, Point3i, Region};
//!
//! let a = ObjectMask::from_voxels(&[Point3i::new(0, 0, 0)]).unwrap();
//! let b = ObjectMask::from_voxels(&[Point3i::new(1, 0, 0)]).unwrap();
//! let merged = a.merge(&b);
//! assert_eq!(merged.number_on_voxels(), 2);
//! ```

pub mod bbox;
pub mod error;
pub mod mask;
pub mod point;
pub mod region;
pub mod resolution;

pub use bbox::BoundingBox;
pub use error::{Error, Result};
pub use mask::ObjectMask;
pub use point::{Point3d, Point3i};
pub use region::{ConnectivityType, Region};
pub use resolution::Resolution;
