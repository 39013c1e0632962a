//! MergeGraph - best-first agglomeration of adjacent objects
//!
//! The merge graph builds a [`NeighborGraph`] from an ordered collection of
//! regions and then repeatedly merges the pair with the highest priority:
//!
//! 1. **Build**: every region becomes a vertex and is tested against all
//!    previously added vertices with the adjacency condition. Accepted
//!    pairs get an edge carrying the prospective merge.
//! 2. **Select**: the considered edge with the strictly highest priority
//!    wins. Exact ties go to the candidate whose first on voxel is smaller
//!    in (x, y, z) order.
//! 3. **Merge**: both endpoints are removed and the cached candidate is
//!    inserted, with fresh edges to every former neighbor of either
//!    endpoint.
//!
//! Each merge removes two vertices and adds one, so the loop performs at
//! most `n - 1` merges.

use crate::condition::AdjacencyCondition;
use crate::describe::describe_graph;
use crate::error::MergeResult;
use crate::event::{MergeEvent, MergeObserver, VertexSummary};
use crate::neighbor_graph::{EdgeId, NeighborGraph, VertexId};
use crate::payload::PayloadCalculator;
use crate::priority::{PrioritisedEdge, PriorityAssigner, PriorityContext};
use crate::vertex::ObjectVertex;
use std::cmp::Ordering;
use voxmerge_core::{Region, Resolution};

/// Agglomerates adjacent regions in priority order
pub struct MergeGraph<R> {
    graph: NeighborGraph<R>,
    payload: Box<dyn PayloadCalculator<R>>,
    condition: Box<dyn AdjacencyCondition<R>>,
    prioritizer: Box<dyn PriorityAssigner<R>>,
    resolution: Option<Resolution>,
    observers: Vec<Box<dyn MergeObserver>>,
}

impl<R: Region> MergeGraph<R> {
    /// Create an empty merge graph from its three collaborators
    pub fn new<P, C, A>(payload: P, condition: C, prioritizer: A) -> Self
    where
        P: PayloadCalculator<R> + 'static,
        C: AdjacencyCondition<R> + 'static,
        A: PriorityAssigner<R> + 'static,
    {
        Self {
            graph: NeighborGraph::new(),
            payload: Box::new(payload),
            condition: Box::new(condition),
            prioritizer: Box::new(prioritizer),
            resolution: None,
            observers: Vec::new(),
        }
    }

    /// Set the physical voxel size passed to conditions and priorities
    pub fn with_resolution(mut self, resolution: Option<Resolution>) -> Self {
        self.resolution = resolution;
        self
    }

    /// Subscribe an observer to the event stream
    pub fn subscribe(&mut self, observer: impl MergeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Subscribe an already boxed observer
    pub fn subscribe_boxed(&mut self, observer: Box<dyn MergeObserver>) {
        self.observers.push(observer);
    }

    /// The underlying neighbor graph
    pub fn graph(&self) -> &NeighborGraph<R> {
        &self.graph
    }

    /// The configured resolution
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    fn emit(&mut self, event: MergeEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    /// Wrap a region in a vertex, computing its payload
    ///
    /// # Errors
    ///
    /// Propagates payload failures; a non-finite payload is
    /// [`MergeError::FeatureCalculationFailed`](crate::MergeError::FeatureCalculationFailed).
    pub fn create_vertex(&self, region: R) -> MergeResult<ObjectVertex<R>> {
        let ctx = PriorityContext {
            payload: self.payload.as_ref(),
            resolution: self.resolution.as_ref(),
        };
        ctx.create_vertex(region)
    }

    /// Insert a vertex against the given candidate neighbors and report it
    fn insert(
        &mut self,
        vertex: ObjectVertex<R>,
        possible_neighbors: &[VertexId],
    ) -> MergeResult<VertexId> {
        let ctx = PriorityContext {
            payload: self.payload.as_ref(),
            resolution: self.resolution.as_ref(),
        };
        let (id, edges) = self.graph.add_vertex(
            vertex,
            possible_neighbors,
            self.condition.as_ref(),
            self.prioritizer.as_ref(),
            &ctx,
        )?;

        if !self.observers.is_empty() {
            let from = VertexSummary::of(Some(id), self.graph.vertex(id));
            let mut events = Vec::with_capacity(edges.len() + 1);
            events.push(MergeEvent::VertexAdded {
                vertex: from,
                edges_added: edges.len(),
            });
            for edge_id in edges {
                let (a, b) = self.graph.endpoints(edge_id);
                let other = if a == id { b } else { a };
                if let Some(edge) = self.graph.edge(edge_id) {
                    events.push(MergeEvent::EdgeEvaluated {
                        from,
                        to: VertexSummary::of(Some(other), self.graph.vertex(other)),
                        candidate: edge.candidate().map(|c| VertexSummary::of(None, c)),
                        priority: edge.priority(),
                    });
                }
            }
            for event in events {
                self.emit(event);
            }
        }
        Ok(id)
    }

    /// Add regions to the graph, in order
    ///
    /// Each region is tested against every vertex added before it, including
    /// vertices from earlier calls.
    ///
    /// # Errors
    ///
    /// Payload, adjacency and priority failures abort the whole run.
    pub fn add_objects_to_graph<I>(&mut self, regions: I) -> MergeResult<()>
    where
        I: IntoIterator<Item = R>,
    {
        let mut added = self.graph.vertex_ids();
        for region in regions {
            let vertex = self.create_vertex(region)?;
            let id = self.insert(vertex, &added)?;
            added.push(id);
        }
        Ok(())
    }

    /// The considered edge with the highest priority, if any
    ///
    /// Exactly equal priorities are broken by the first on voxel of each
    /// candidate: the smaller point in (x, y, z) order wins. If that ties
    /// too, the edge with the lower id (the one inserted first) wins.
    pub fn find_max_priority(&self) -> Option<EdgeId> {
        let mut best: Option<(EdgeId, &PrioritisedEdge<R>)> = None;
        for edge in self.graph.edges_unique() {
            if !edge.payload.consider_for_merge() {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, current)) => prefer(edge.payload, current) == Ordering::Greater,
            };
            if better {
                best = Some((edge.id, edge.payload));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Merge the endpoints of `edge` into its cached candidate
    ///
    /// Returns the id of the merged vertex.
    ///
    /// # Errors
    ///
    /// Errors from re-inserting the merged vertex abort the run.
    ///
    /// # Panics
    ///
    /// Panics if the edge is not in the graph or is not considered for
    /// merging.
    pub fn merge(&mut self, edge: EdgeId) -> MergeResult<VertexId> {
        let possible_neighbors = self.graph.neighbor_nodes_for(edge);
        let (source_id, target_id) = self.graph.endpoints(edge);

        let considered = self
            .graph
            .edge(edge)
            .is_some_and(PrioritisedEdge::consider_for_merge);
        assert!(
            considered,
            "edge {} is not considered for merging",
            edge.index()
        );

        let payload = self.graph.remove_edge(edge);
        let priority = payload.priority();
        let Some(candidate) = payload.into_candidate() else {
            panic!("edge {} is not considered for merging", edge.index());
        };

        let source = self.graph.remove_vertex(source_id);
        let target = self.graph.remove_vertex(target_id);

        let merged_id = self.insert(candidate, &possible_neighbors)?;

        let event = MergeEvent::Merged {
            source: VertexSummary::of(Some(source_id), &source),
            target: VertexSummary::of(Some(target_id), &target),
            merged: VertexSummary::of(Some(merged_id), self.graph.vertex(merged_id)),
            priority,
            vertex_count: self.graph.vertex_count(),
        };
        self.emit(event);

        Ok(merged_id)
    }

    /// Merge until no considered edge remains, or `max_merges` is reached
    ///
    /// Returns the number of merges performed.
    pub fn merge_all(&mut self, max_merges: Option<usize>) -> MergeResult<usize> {
        let mut merges = 0;
        while max_merges.is_none_or(|max| merges < max) {
            let Some(best) = self.find_max_priority() else {
                break;
            };
            self.merge(best)?;
            merges += 1;
        }
        log::debug!(
            "agglomeration finished after {} merges, {} objects remain",
            merges,
            self.graph.vertex_count()
        );
        Ok(merges)
    }

    /// The region of every current vertex
    pub fn vertices_as_objects(&self) -> Vec<&R> {
        self.graph.vertices_as_objects()
    }

    /// Consume the merge graph, returning the surviving regions
    pub fn into_objects(self) -> Vec<R> {
        self.graph.into_objects()
    }

    /// Text description of the current graph
    pub fn describe(&self) -> String {
        describe_graph(&self.graph)
    }
}

/// Compare two considered edges; `Greater` means `a` should merge first
fn prefer<R: Region>(a: &PrioritisedEdge<R>, b: &PrioritisedEdge<R>) -> Ordering {
    if a.priority() > b.priority() {
        return Ordering::Greater;
    }
    if a.priority() < b.priority() {
        return Ordering::Less;
    }
    let pa = a.candidate().and_then(|c| c.region().find_arbitrary_on_voxel());
    let pb = b.candidate().and_then(|c| c.region().find_arbitrary_on_voxel());
    // Smaller point wins, so reverse the natural order
    pb.cmp(&pa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{AlwaysAdjacent, WithinDistance};
    use crate::event::EventRecorder;
    use crate::payload::VoxelCount;
    use crate::priority::MergedPayload;
    use crate::MergeError;
    use voxmerge_core::{ObjectMask, Point3i};

    fn voxel(x: i32, y: i32, z: i32) -> ObjectMask {
        ObjectMask::from_voxels(&[Point3i::new(x, y, z)]).unwrap()
    }

    fn voxel_graph() -> MergeGraph<ObjectMask> {
        MergeGraph::new(VoxelCount, WithinDistance::voxels(1.5), MergedPayload)
    }

    #[test]
    fn test_add_objects_builds_edges() {
        let mut graph = voxel_graph();
        graph
            .add_objects_to_graph(vec![voxel(0, 0, 0), voxel(1, 0, 0), voxel(2, 0, 0)])
            .unwrap();
        assert_eq!(graph.graph().vertex_count(), 3);
        assert_eq!(graph.graph().edge_count(), 2);
    }

    #[test]
    fn test_tie_break_prefers_smaller_point() {
        let mut graph = voxel_graph();
        graph
            .add_objects_to_graph(vec![voxel(2, 0, 0), voxel(1, 0, 0), voxel(0, 0, 0)])
            .unwrap();
        let best = graph.find_max_priority().unwrap();
        let candidate = graph.graph().edge(best).unwrap().candidate().unwrap();
        assert_eq!(
            candidate.region().find_arbitrary_on_voxel(),
            Some(Point3i::new(0, 0, 0))
        );
    }

    #[test]
    fn test_merge_replaces_endpoints() {
        let mut graph = voxel_graph();
        graph
            .add_objects_to_graph(vec![voxel(0, 0, 0), voxel(1, 0, 0), voxel(2, 0, 0)])
            .unwrap();
        let best = graph.find_max_priority().unwrap();
        let (a, b) = graph.graph().endpoints(best);
        let merged = graph.merge(best).unwrap();

        assert!(!graph.graph().contains_vertex(a));
        assert!(!graph.graph().contains_vertex(b));
        assert!(merged != a && merged != b);
        assert_eq!(merged.index(), 3);
        assert_eq!(graph.graph().vertex(merged).voxel_count(), 2);
        assert_eq!(graph.graph().vertex_count(), 2);
        assert_eq!(graph.graph().edge_count(), 1);
    }

    #[test]
    fn test_equal_candidates_prefer_earlier_edge() {
        // Inserted as z, y, x: edges y-z, x-z, x-y. Both x-z and x-y have
        // priority 2 and first voxel (0,0,0); x-z was inserted first.
        let mut graph = MergeGraph::new(VoxelCount, AlwaysAdjacent, MergedPayload);
        graph
            .add_objects_to_graph(vec![voxel(0, 1, 0), voxel(1, 0, 0), voxel(0, 0, 0)])
            .unwrap();
        let ids = graph.graph().vertex_ids();
        let (z, x) = (ids[0], ids[2]);

        let best = graph.find_max_priority().unwrap();
        assert_eq!(best.index(), 1);
        assert_eq!(graph.graph().endpoints(best), (x, z));
    }

    #[test]
    #[should_panic(expected = "is not in the graph")]
    fn test_stale_vertex_after_merge_panics() {
        let mut graph = voxel_graph();
        graph
            .add_objects_to_graph(vec![voxel(0, 0, 0), voxel(1, 0, 0), voxel(2, 0, 0)])
            .unwrap();
        let best = graph.find_max_priority().unwrap();
        let (a, _) = graph.graph().endpoints(best);
        graph.merge(best).unwrap();
        graph.graph().vertex(a);
    }

    #[test]
    #[should_panic(expected = "is not considered for merging")]
    fn test_merge_rejected_edge_panics() {
        let never = crate::priority::Limited::new(
            MergedPayload,
            crate::priority::PriorityLimits::new().with_max_merged_voxels(1),
        );
        let mut graph = MergeGraph::new(VoxelCount, AlwaysAdjacent, never);
        graph
            .add_objects_to_graph(vec![voxel(0, 0, 0), voxel(1, 0, 0)])
            .unwrap();
        let edge = graph.graph().edges_unique().next().unwrap().id;
        let _ = graph.merge(edge);
    }

    #[test]
    fn test_merge_all_three_voxel_chain() {
        let mut graph = voxel_graph();
        graph
            .add_objects_to_graph(vec![voxel(0, 0, 0), voxel(1, 0, 0), voxel(2, 0, 0)])
            .unwrap();
        assert_eq!(graph.merge_all(None).unwrap(), 2);
        let objects = graph.into_objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].count_on(), 3);
    }

    #[test]
    fn test_merge_all_respects_cap() {
        let mut graph = MergeGraph::new(VoxelCount, AlwaysAdjacent, MergedPayload);
        graph
            .add_objects_to_graph((0..5).map(|x| voxel(x * 3, 0, 0)))
            .unwrap();
        assert_eq!(graph.merge_all(Some(2)).unwrap(), 2);
        assert_eq!(graph.graph().vertex_count(), 3);
    }

    #[test]
    fn test_events_are_emitted() {
        let recorder = EventRecorder::new();
        let mut graph = voxel_graph();
        graph.subscribe(recorder.clone());
        graph
            .add_objects_to_graph(vec![voxel(0, 0, 0), voxel(1, 0, 0)])
            .unwrap();
        // Two vertex insertions and one edge
        assert_eq!(recorder.len(), 3);

        graph.merge_all(None).unwrap();
        let merges = recorder.merges();
        assert_eq!(merges.len(), 1);
        match &merges[0] {
            MergeEvent::Merged {
                merged,
                vertex_count,
                priority,
                ..
            } => {
                assert_eq!(merged.voxel_count, 2);
                assert_eq!(*vertex_count, 1);
                assert_eq!(*priority, 2.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_payload_failure_aborts() {
        let failing = |_: &ObjectMask| -> MergeResult<f64> {
            Err(MergeError::FeatureCalculationFailed("histogram unavailable".into()))
        };
        let mut graph = MergeGraph::new(failing, AlwaysAdjacent, MergedPayload);
        let result = graph.add_objects_to_graph(vec![voxel(0, 0, 0)]);
        assert!(matches!(
            result,
            Err(MergeError::FeatureCalculationFailed(_))
        ));
    }

    #[test]
    fn test_empty_candidate_is_rejected() {
        let empty = ObjectMask::new(voxmerge_core::BoundingBox::new_unchecked(0, 0, 0, 1, 1, 1))
            .unwrap();
        let mut graph = MergeGraph::new(VoxelCount, AlwaysAdjacent, MergedPayload);
        let result = graph.add_objects_to_graph(vec![empty.clone(), empty]);
        assert!(matches!(result, Err(MergeError::EmptyCandidate)));
    }
}
