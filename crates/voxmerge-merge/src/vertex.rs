//! Graph vertices: a region plus its precomputed payload

use std::cell::OnceCell;
use voxmerge_core::Region;

/// A region wrapped for insertion into the neighbor graph
///
/// The payload is computed once, when the vertex is created. The voxel count
/// is computed on first use and memoized. Vertices are not
/// `PartialEq`: inside the graph a vertex is identified by its
/// [`VertexId`](crate::VertexId), never by its payload.
#[derive(Debug)]
pub struct ObjectVertex<R> {
    region: R,
    payload: f64,
    voxel_count: OnceCell<usize>,
}

impl<R: Region> ObjectVertex<R> {
    /// Wrap a region and its payload
    pub fn new(region: R, payload: f64) -> Self {
        Self {
            region,
            payload,
            voxel_count: OnceCell::new(),
        }
    }

    /// The wrapped region
    #[inline]
    pub fn region(&self) -> &R {
        &self.region
    }

    /// The precomputed payload
    #[inline]
    pub fn payload(&self) -> f64 {
        self.payload
    }

    /// Number of on voxels in the region, computed once
    pub fn voxel_count(&self) -> usize {
        *self
            .voxel_count
            .get_or_init(|| self.region.number_on_voxels())
    }

    /// Unwrap the region
    pub fn into_region(self) -> R {
        self.region
    }
}
