//! Merge events and their observers
//!
//! The merge graph reports what it does as a stream of [`MergeEvent`]
//! records. Observers subscribe to the stream; logging is one such observer
//! and never influences the algorithm.

use crate::neighbor_graph::VertexId;
use crate::vertex::ObjectVertex;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use voxmerge_core::{Point3d, Region};

/// Snapshot of a vertex for reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSummary {
    /// Graph id, or `None` for a candidate that is not in the graph
    pub id: Option<VertexId>,
    pub centroid: Point3d,
    pub payload: f64,
    pub voxel_count: usize,
}

impl VertexSummary {
    /// Summarize a vertex
    pub fn of<R: Region>(id: Option<VertexId>, vertex: &ObjectVertex<R>) -> Self {
        Self {
            id,
            centroid: vertex.region().centroid(),
            payload: vertex.payload(),
            voxel_count: vertex.voxel_count(),
        }
    }
}

impl fmt::Display for VertexSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.id {
            write!(f, "{} ", id)?;
        }
        write!(
            f,
            "{} payload={:.3} voxels={}",
            self.centroid, self.payload, self.voxel_count
        )
    }
}

/// Something the merge graph did
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    /// A vertex was inserted with `edges_added` new edges
    VertexAdded {
        vertex: VertexSummary,
        edges_added: usize,
    },
    /// An edge was created between `from` (the inserted vertex) and `to`
    ///
    /// `candidate` is `None` when the edge is not considered for merging.
    EdgeEvaluated {
        from: VertexSummary,
        to: VertexSummary,
        candidate: Option<VertexSummary>,
        priority: f64,
    },
    /// `source` and `target` were replaced by `merged`
    Merged {
        source: VertexSummary,
        target: VertexSummary,
        merged: VertexSummary,
        priority: f64,
        vertex_count: usize,
    },
}

impl fmt::Display for MergeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeEvent::VertexAdded {
                vertex,
                edges_added,
            } => write!(f, "added {} with {} edges", vertex, edges_added),
            MergeEvent::EdgeEvaluated {
                from,
                to,
                candidate,
                priority,
            } => match candidate {
                Some(candidate) => write!(
                    f,
                    "edge {} -- {}: priority={:.3} merged {}",
                    from, to, priority, candidate
                ),
                None => write!(f, "edge {} -- {}: not considered", from, to),
            },
            MergeEvent::Merged {
                source,
                target,
                merged,
                priority,
                vertex_count,
            } => write!(
                f,
                "merged {} and {} into {} (priority={:.3}, {} vertices remain)",
                source, target, merged, priority, vertex_count
            ),
        }
    }
}

/// Receives merge events
pub trait MergeObserver {
    fn on_event(&mut self, event: &MergeEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    level: log::Level,
}

impl LogObserver {
    /// Log every event at `level`
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(log::Level::Debug)
    }
}

impl MergeObserver for LogObserver {
    fn on_event(&mut self, event: &MergeEvent) {
        log::log!(target: "voxmerge::merge", self.level, "{}", event);
    }
}

/// Records every event; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<MergeEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events recorded so far
    pub fn events(&self) -> Vec<MergeEvent> {
        self.events.borrow().clone()
    }

    /// Only the merge events recorded so far
    pub fn merges(&self) -> Vec<MergeEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, MergeEvent::Merged { .. }))
            .cloned()
            .collect()
    }

    /// Number of events recorded so far
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl MergeObserver for EventRecorder {
    fn on_event(&mut self, event: &MergeEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
