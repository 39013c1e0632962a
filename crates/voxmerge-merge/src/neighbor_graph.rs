//! NeighborGraph - undirected region-adjacency graph
//!
//! Vertex and edge ids are issued from counters and never reused: once a
//! vertex or edge is removed, its id stays absent for the lifetime of the
//! graph, and a lower edge id always means an earlier insertion. Removing a
//! vertex removes every incident edge. Edges carry the [`PrioritisedEdge`]
//! computed when they were added.

use crate::condition::AdjacencyCondition;
use crate::error::MergeResult;
use crate::priority::{PrioritisedEdge, PriorityAssigner, PriorityContext};
use crate::vertex::ObjectVertex;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef as _;
use std::collections::BTreeMap;
use std::fmt;
use voxmerge_core::Region;

/// Identifier of a vertex in a [`NeighborGraph`], never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    /// Numeric value of the id
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Identifier of an edge in a [`NeighborGraph`], never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Numeric value of the id
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An edge as seen by [`NeighborGraph::edges_unique`]
#[derive(Debug)]
pub struct EdgeRef<'a, R> {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub payload: &'a PrioritisedEdge<R>,
}

#[derive(Debug)]
struct Node<R> {
    id: VertexId,
    vertex: ObjectVertex<R>,
}

#[derive(Debug)]
struct Link<R> {
    id: EdgeId,
    payload: PrioritisedEdge<R>,
}

/// Undirected graph of object vertices
pub struct NeighborGraph<R> {
    graph: StableUnGraph<Node<R>, Link<R>>,
    vertices: BTreeMap<VertexId, NodeIndex>,
    edges: BTreeMap<EdgeId, EdgeIndex>,
    next_vertex: usize,
    next_edge: usize,
}

impl<R: Region> Default for NeighborGraph<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Region> NeighborGraph<R> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            next_vertex: 0,
            next_edge: 0,
        }
    }

    fn node_index(&self, id: VertexId) -> NodeIndex {
        match self.vertices.get(&id) {
            Some(&n) => n,
            None => panic!("vertex {} is not in the graph", id),
        }
    }

    fn edge_index(&self, id: EdgeId) -> EdgeIndex {
        match self.edges.get(&id) {
            Some(&e) => e,
            None => panic!("edge {} is not in the graph", id.index()),
        }
    }

    fn id_at(&self, n: NodeIndex) -> Option<VertexId> {
        self.graph.node_weight(n).map(|node| node.id)
    }

    /// Insert a vertex and connect it to the accepted candidates
    ///
    /// Each candidate in `possible_neighbors` is tested, in order, with
    /// `condition.accept(vertex, candidate)`; every accepted candidate gets
    /// an edge whose payload comes from `prioritizer`. All evaluations
    /// happen before the graph is touched, so an error leaves the graph
    /// unchanged.
    ///
    /// Returns the id of the new vertex and the ids of its new edges, in
    /// candidate order.
    ///
    /// # Panics
    ///
    /// Panics if a candidate is not in the graph.
    pub fn add_vertex(
        &mut self,
        vertex: ObjectVertex<R>,
        possible_neighbors: &[VertexId],
        condition: &dyn AdjacencyCondition<R>,
        prioritizer: &dyn PriorityAssigner<R>,
        ctx: &PriorityContext<'_, R>,
    ) -> MergeResult<(VertexId, Vec<EdgeId>)> {
        let mut accepted = Vec::new();
        for &candidate in possible_neighbors {
            let other = self.vertex(candidate);
            if condition.accept(vertex.region(), other.region(), ctx.resolution)? {
                let edge = prioritizer.assign_priority(&vertex, other, ctx)?;
                accepted.push((self.node_index(candidate), edge));
            }
        }

        let id = VertexId(self.next_vertex);
        self.next_vertex += 1;
        let n = self.graph.add_node(Node { id, vertex });
        self.vertices.insert(id, n);

        let mut edges = Vec::with_capacity(accepted.len());
        for (other, payload) in accepted {
            let edge_id = EdgeId(self.next_edge);
            self.next_edge += 1;
            let e = self.graph.add_edge(n, other, Link { id: edge_id, payload });
            self.edges.insert(edge_id, e);
            edges.push(edge_id);
        }
        Ok((id, edges))
    }

    /// Remove a vertex and every incident edge
    ///
    /// # Panics
    ///
    /// Panics if the vertex is not in the graph, including when it was
    /// already removed.
    pub fn remove_vertex(&mut self, id: VertexId) -> ObjectVertex<R> {
        let n = self.node_index(id);
        let incident: Vec<EdgeId> = self.graph.edges(n).map(|e| e.weight().id).collect();
        for edge in incident {
            self.edges.remove(&edge);
        }
        self.vertices.remove(&id);
        match self.graph.remove_node(n) {
            Some(node) => node.vertex,
            None => panic!("vertex {} is not in the graph", id),
        }
    }

    /// Detach an edge and return its payload
    ///
    /// # Panics
    ///
    /// Panics if the edge is not in the graph.
    pub fn remove_edge(&mut self, id: EdgeId) -> PrioritisedEdge<R> {
        let e = self.edge_index(id);
        self.edges.remove(&id);
        match self.graph.remove_edge(e) {
            Some(link) => link.payload,
            None => panic!("edge {} is not in the graph", id.index()),
        }
    }

    /// Neighbors of either endpoint of `edge`, excluding both endpoints
    ///
    /// The result is sorted by id and free of duplicates.
    pub fn neighbor_nodes_for(&self, edge: EdgeId) -> Vec<VertexId> {
        let (a, b) = self.endpoints(edge);
        let mut nodes: Vec<VertexId> = self
            .neighbors(a)
            .into_iter()
            .chain(self.neighbors(b))
            .filter(|&n| n != a && n != b)
            .collect();
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// Neighbors of a vertex, sorted by id
    ///
    /// # Panics
    ///
    /// Panics if the vertex is not in the graph.
    pub fn neighbors(&self, id: VertexId) -> Vec<VertexId> {
        let mut nodes: Vec<VertexId> = self
            .graph
            .neighbors(self.node_index(id))
            .filter_map(|n| self.id_at(n))
            .collect();
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// The two endpoints of an edge: the vertex that was inserted with it,
    /// then the existing neighbor
    ///
    /// # Panics
    ///
    /// Panics if the edge is not in the graph.
    pub fn endpoints(&self, edge: EdgeId) -> (VertexId, VertexId) {
        let ends = self
            .graph
            .edge_endpoints(self.edge_index(edge))
            .and_then(|(a, b)| Some((self.id_at(a)?, self.id_at(b)?)));
        match ends {
            Some(ends) => ends,
            None => panic!("edge {} is not in the graph", edge.index()),
        }
    }

    /// Vertex by id
    ///
    /// # Panics
    ///
    /// Panics if the vertex is not in the graph.
    pub fn vertex(&self, id: VertexId) -> &ObjectVertex<R> {
        match self.graph.node_weight(self.node_index(id)) {
            Some(node) => &node.vertex,
            None => panic!("vertex {} is not in the graph", id),
        }
    }

    /// Edge payload by id, if the edge exists
    pub fn edge(&self, id: EdgeId) -> Option<&PrioritisedEdge<R>> {
        let e = *self.edges.get(&id)?;
        self.graph.edge_weight(e).map(|link| &link.payload)
    }

    /// Check whether a vertex is in the graph
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Check whether an edge is in the graph
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Ids of all vertices, in ascending order
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Every edge exactly once, in ascending id order
    pub fn edges_unique(&self) -> impl Iterator<Item = EdgeRef<'_, R>> + '_ {
        self.edges.iter().filter_map(move |(&id, &e)| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            let link = self.graph.edge_weight(e)?;
            Some(EdgeRef {
                id,
                source: self.id_at(a)?,
                target: self.id_at(b)?,
                payload: &link.payload,
            })
        })
    }

    /// The region of every vertex, in ascending id order
    pub fn vertices_as_objects(&self) -> Vec<&R> {
        self.vertices
            .values()
            .filter_map(|&n| self.graph.node_weight(n))
            .map(|node| node.vertex.region())
            .collect()
    }

    /// Consume the graph, returning the region of every vertex in ascending
    /// id order
    pub fn into_objects(self) -> Vec<R> {
        let NeighborGraph {
            mut graph,
            vertices,
            ..
        } = self;
        vertices
            .into_values()
            .filter_map(|n| graph.remove_node(n))
            .map(|node| node.vertex.into_region())
            .collect()
    }
}
