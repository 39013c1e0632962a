//! voxmerge-test - Regression test support for voxmerge
//!
//! This crate provides the bookkeeping used by the `*_reg` regression tests
//! and a set of synthetic object-mask fixtures.
//!
//! # Usage
//!
//! ```
//! use voxmerge_test::{RegParams, voxel_row};
//!
//! let mut rp = RegParams::new("example");
//! let row = voxel_row(3, 1).unwrap();
//! rp.compare_values(3.0, row.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use fixtures::{cuboid, mask, scattered_cubes, voxel, voxel_row};
pub use params::RegParams;
