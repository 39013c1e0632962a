//! Text rendering of a neighbor graph, for diagnostics

use crate::event::VertexSummary;
use crate::neighbor_graph::NeighborGraph;
use std::fmt::Write;
use voxmerge_core::Region;

/// Describe every vertex and edge of a graph
///
/// The first line gives the vertex and edge counts, followed by one line per
/// vertex and one line per edge, both in ascending id order.
pub fn describe_graph<R: Region>(graph: &NeighborGraph<R>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    for id in graph.vertex_ids() {
        let _ = writeln!(out, "  {}", VertexSummary::of(Some(id), graph.vertex(id)));
    }
    for edge in graph.edges_unique() {
        let merge = if edge.payload.consider_for_merge() {
            format!("priority={:.3}", edge.payload.priority())
        } else {
            "not considered".to_string()
        };
        let _ = writeln!(out, "  {} -- {}: {}", edge.source, edge.target, merge);
    }
    out
}
