use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};

/// Identifier for an intersection (a node of the road network).
pub type IntersectionId = String;

/// Travel time carried by a road, in whole minutes.
pub type TravelTime = u64;

/// Largest travel time a single road may carry. Keeping road weights within
/// 32 bits leaves route totals far from `u64` overflow.
pub const MAX_TRAVEL_TIME: TravelTime = u32::MAX as TravelTime;

/// Directed edge owned by its source intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub target: IntersectionId,
    pub travel_time: TravelTime,
}

/// Undirected road as persisted in the road network file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Road {
    pub source: IntersectionId,
    pub destination: IntersectionId,
    pub travel_time: TravelTime,
}

/// Adjacency store for the road network.
///
/// Each intersection owns an ordered list of outgoing edges. New edges are
/// prepended, so callers that need a reproducible order should use
/// [`Graph::sort_edges`] or [`Graph::sorted_neighbours`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<IntersectionId, Vec<Edge>>,
    max_intersections: Option<usize>,
}

impl Graph {
    /// Create an empty graph bounded to `max_intersections` distinct nodes.
    pub fn with_limit(max_intersections: Option<usize>) -> Self {
        Self {
            adjacency: HashMap::new(),
            max_intersections,
        }
    }

    /// Number of known intersections.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// All intersection identifiers in ascending order.
    pub fn intersections(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adjacency.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Return the outgoing edges of an intersection in storage order.
    pub fn neighbours(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Return the outgoing edges of an intersection ordered by target.
    ///
    /// The sort is stable, so parallel edges to the same target keep their
    /// storage order.
    pub fn sorted_neighbours(&self, id: &str) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.neighbours(id).iter().collect();
        edges.sort_by(|a, b| a.target.cmp(&b.target));
        edges
    }

    /// Register an intersection without adding any edges.
    ///
    /// Returns `true` when the intersection was not known before.
    pub fn ensure_intersection(&mut self, id: &str) -> Result<bool> {
        if self.adjacency.contains_key(id) {
            return Ok(false);
        }
        self.check_capacity(1)?;
        self.adjacency.insert(id.to_string(), Vec::new());
        Ok(true)
    }

    /// Insert a directed edge unless an identical (target, travel time) edge
    /// already exists under `source`.
    ///
    /// Unseen endpoints are allocated first; the capacity check covers both
    /// of them before anything is mutated. Returns `true` when an edge was
    /// inserted.
    pub fn add_edge(&mut self, source: &str, target: &str, travel_time: TravelTime) -> Result<bool> {
        let mut unseen = usize::from(!self.contains(source));
        if target != source && !self.contains(target) {
            unseen += 1;
        }
        self.check_capacity(unseen)?;

        self.adjacency.entry(target.to_string()).or_default();
        let edges = self.adjacency.entry(source.to_string()).or_default();
        if edges
            .iter()
            .any(|edge| edge.target == target && edge.travel_time == travel_time)
        {
            return Ok(false);
        }

        edges.insert(
            0,
            Edge {
                target: target.to_string(),
                travel_time,
            },
        );
        Ok(true)
    }

    /// Remove the first edge from `source` to `target`, whatever its travel
    /// time. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        let Some(edges) = self.adjacency.get_mut(source) else {
            return false;
        };
        match edges.iter().position(|edge| edge.target == target) {
            Some(index) => {
                edges.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether any edge from `source` to `target` exists.
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.neighbours(source)
            .iter()
            .any(|edge| edge.target == target)
    }

    /// Sort the outgoing edges of one intersection by target identifier.
    pub fn sort_edges(&mut self, id: &str) {
        if let Some(edges) = self.adjacency.get_mut(id) {
            edges.sort_by(|a, b| a.target.cmp(&b.target));
        }
    }

    /// Sort the outgoing edges of every intersection.
    pub fn sort_all_edges(&mut self) {
        for edges in self.adjacency.values_mut() {
            edges.sort_by(|a, b| a.target.cmp(&b.target));
        }
    }

    /// Collapse the directed edges into undirected roads.
    ///
    /// Each road is reported once, from the endpoint whose identifier sorts
    /// first, ordered by source then target. A loop road is stored as a
    /// single edge and reported once.
    pub fn roads(&self) -> Vec<Road> {
        let mut roads = Vec::new();
        for source in self.intersections() {
            for edge in self.sorted_neighbours(source) {
                if source <= edge.target.as_str() {
                    roads.push(Road {
                        source: source.to_string(),
                        destination: edge.target.clone(),
                        travel_time: edge.travel_time,
                    });
                }
            }
        }
        roads
    }

    fn check_capacity(&self, additional: usize) -> Result<()> {
        if let Some(limit) = self.max_intersections {
            if self.adjacency.len() + additional > limit {
                return Err(Error::CapacityExceeded {
                    what: "intersection",
                    limit,
                });
            }
        }
        Ok(())
    }
}
