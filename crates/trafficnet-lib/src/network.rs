//! The road network facade.
//!
//! [`RoadNetwork`] owns the edge store, the closure registry, and the signal
//! board, and exposes the operations the CLI uses. When bound to a
//! [`NetworkStore`], every mutation is written through before the call
//! returns. Mutations are staged on a copy and only applied once the write
//! succeeds, so a failed write leaves the network unchanged.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::closures::{ClosureRegistry, RoadClosure};
use crate::dataset::NetworkStore;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, IntersectionId, TravelTime, MAX_TRAVEL_TIME};
use crate::matrix::{find_route_a_star, CostMatrix, HeuristicTable};
use crate::path::{find_all_routes, find_route_dijkstra, reachable_from, PathResult};
use crate::records::{ClosureRecord, RoadRecord, SignalRecord};
use crate::signals::{SignalBoard, Vehicle};

/// Minimum Jaro-Winkler similarity for an identifier to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.7;
const MAX_SUGGESTIONS: usize = 3;

/// Vehicles on a road at which the road counts as congested.
pub const CONGESTION_THRESHOLD: usize = 3;

/// Capacity bounds for a network. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkLimits {
    pub max_intersections: Option<usize>,
    pub max_closures: Option<usize>,
    pub max_vehicles: Option<usize>,
    /// Cap on routes returned by [`RoadNetwork::all_paths`].
    pub max_paths: usize,
}

impl Default for NetworkLimits {
    fn default() -> Self {
        Self {
            max_intersections: Some(100),
            max_closures: Some(100),
            max_vehicles: Some(100),
            max_paths: crate::path::DEFAULT_MAX_PATHS,
        }
    }
}

impl NetworkLimits {
    pub fn unbounded() -> Self {
        Self {
            max_intersections: None,
            max_closures: None,
            max_vehicles: None,
            max_paths: usize::MAX,
        }
    }
}

/// Counts of records applied while loading a network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub intersections: usize,
    pub roads: usize,
    pub closures: usize,
    pub signals: usize,
    pub skipped_records: usize,
}

/// Vehicle together with its computed route, if one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRoute {
    pub vehicle: Vehicle,
    pub route: Option<PathResult>,
}

/// Number of vehicles whose shortest route uses a road.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadLoad {
    pub first: IntersectionId,
    pub second: IntersectionId,
    pub vehicles: usize,
    pub congested: bool,
}

/// In-memory road network with optional write-through persistence.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    graph: Graph,
    closures: ClosureRegistry,
    signals: SignalBoard,
    limits: NetworkLimits,
    store: Option<NetworkStore>,
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::new(NetworkLimits::default())
    }
}

impl RoadNetwork {
    /// Create an empty, unpersisted network.
    pub fn new(limits: NetworkLimits) -> Self {
        Self {
            graph: Graph::with_limit(limits.max_intersections),
            closures: ClosureRegistry::with_limit(limits.max_closures),
            signals: SignalBoard::default(),
            limits,
            store: None,
        }
    }

    /// Load a network from `store` and bind it for write-through.
    pub fn open(store: NetworkStore, limits: NetworkLimits) -> Result<Self> {
        let mut network = Self::load(&store, limits)?;
        network.store = Some(store);
        Ok(network)
    }

    /// Load a network from `store` without binding it; mutations stay in
    /// memory.
    pub fn load(store: &NetworkStore, limits: NetworkLimits) -> Result<Self> {
        let mut network = Self::new(limits);

        let (roads, road_report) = store.read_roads()?;
        let (closures, closure_report) = store.read_closures()?;
        let (signals, signal_report) = store.read_signals()?;

        network.load_roads(roads)?;
        network.load_closures(closures)?;
        network.load_signals(signals);

        let summary = NetworkSummary {
            skipped_records: road_report.skipped + closure_report.skipped + signal_report.skipped,
            ..network.summary()
        };
        info!(
            intersections = summary.intersections,
            roads = summary.roads,
            closures = summary.closures,
            signals = summary.signals,
            skipped = summary.skipped_records,
            "road network loaded"
        );
        Ok(network)
    }

    /// Insert road records as undirected roads (both directions).
    pub fn load_roads(&mut self, roads: impl IntoIterator<Item = RoadRecord>) -> Result<()> {
        for road in roads {
            self.graph
                .add_edge(&road.source, &road.destination, road.travel_time)?;
            self.graph
                .add_edge(&road.destination, &road.source, road.travel_time)?;
        }
        self.graph.sort_all_edges();
        Ok(())
    }

    pub fn load_closures(
        &mut self,
        closures: impl IntoIterator<Item = ClosureRecord>,
    ) -> Result<()> {
        for closure in closures {
            self.closures
                .record(&closure.first, &closure.second, closure.status)?;
        }
        Ok(())
    }

    pub fn load_signals(&mut self, signals: impl IntoIterator<Item = SignalRecord>) {
        for signal in signals {
            self.signals
                .set_green_time(&signal.intersection, signal.green_time);
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn closures(&self) -> &ClosureRegistry {
        &self.closures
    }

    pub fn signals(&self) -> &SignalBoard {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalBoard {
        &mut self.signals
    }

    pub fn limits(&self) -> NetworkLimits {
        self.limits
    }

    pub fn store(&self) -> Option<&NetworkStore> {
        self.store.as_ref()
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            intersections: self.graph.len(),
            roads: self.graph.roads().len(),
            closures: self.closures.blocked().count(),
            signals: self.signals.len(),
            skipped_records: 0,
        }
    }

    /// Intersection identifiers in ascending order.
    pub fn intersections(&self) -> Vec<&str> {
        self.graph.intersections()
    }

    /// Each intersection with its outgoing roads sorted by destination.
    pub fn adjacency(&self) -> Vec<(&str, Vec<&Edge>)> {
        self.graph
            .intersections()
            .into_iter()
            .map(|id| (id, self.graph.sorted_neighbours(id)))
            .collect()
    }

    /// Closures currently blocking a road.
    pub fn blocked_roads(&self) -> Vec<&RoadClosure> {
        self.closures.blocked().collect()
    }

    pub fn is_blocked(&self, a: &str, b: &str) -> bool {
        self.closures.is_blocked(a, b)
    }

    /// Add an undirected road. The travel time must lie in
    /// `1..=MAX_TRAVEL_TIME`.
    pub fn add_road(&mut self, source: &str, destination: &str, travel_time: i64) -> Result<()> {
        let source = normalize_identifier(source)?;
        let destination = normalize_identifier(destination)?;
        let weight = TravelTime::try_from(travel_time)
            .ok()
            .filter(|time| (1..=MAX_TRAVEL_TIME).contains(time))
            .ok_or(Error::InvalidWeight {
                weight: travel_time,
            })?;

        let mut graph = self.graph.clone();
        graph.add_edge(source, destination, weight)?;
        graph.add_edge(destination, source, weight)?;
        graph.sort_edges(source);
        graph.sort_edges(destination);
        self.persist_roads(&graph)?;
        self.graph = graph;
        info!(source, destination, travel_time = weight, "road added");
        Ok(())
    }

    /// Remove the undirected road between two intersections.
    ///
    /// Both directions must exist; otherwise nothing changes and
    /// [`Error::RoadNotFound`] is returned.
    pub fn remove_road(&mut self, source: &str, destination: &str) -> Result<()> {
        let source = normalize_identifier(source)?;
        let destination = normalize_identifier(destination)?;
        if !self.graph.has_edge(source, destination) || !self.graph.has_edge(destination, source)
        {
            return Err(Error::RoadNotFound {
                from: source.to_string(),
                to: destination.to_string(),
            });
        }

        let mut graph = self.graph.clone();
        graph.remove_edge(source, destination);
        graph.remove_edge(destination, source);
        self.persist_roads(&graph)?;
        self.graph = graph;
        info!(source, destination, "road removed");
        Ok(())
    }

    /// Block the road between two intersections for every later query.
    pub fn block_road(&mut self, a: &str, b: &str) -> Result<()> {
        let a = normalize_identifier(a)?;
        let b = normalize_identifier(b)?;
        let mut closures = self.closures.clone();
        closures.block(a, b)?;
        if let Some(store) = &self.store {
            store.save_closures(&closures)?;
        }
        self.closures = closures;
        info!(a, b, "road blocked");
        Ok(())
    }

    /// Append a vehicle travelling between two known intersections and write
    /// the updated list through to the store.
    ///
    /// Vehicle identifiers must be unique within `vehicles`.
    pub fn add_vehicle(
        &self,
        vehicles: &mut Vec<Vehicle>,
        id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vehicle> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidVehicleId);
        }
        if vehicles.iter().any(|vehicle| vehicle.id == id) {
            return Err(Error::DuplicateVehicle { id: id.to_string() });
        }
        if let Some(limit) = self.limits.max_vehicles {
            if vehicles.len() >= limit {
                return Err(Error::CapacityExceeded {
                    what: "vehicle",
                    limit,
                });
            }
        }
        let (start, end) = self.resolve_pair(start, end)?;

        let vehicle = Vehicle {
            id: id.to_string(),
            start,
            end,
        };
        let mut updated = vehicles.clone();
        updated.push(vehicle.clone());
        if let Some(store) = &self.store {
            store.save_vehicles(&updated)?;
        }
        *vehicles = updated;
        info!(id = %vehicle.id, start = %vehicle.start, end = %vehicle.end, "vehicle added");
        Ok(vehicle)
    }

    /// Lowest travel-time route, honouring closures.
    pub fn shortest_path(&self, start: &str, goal: &str) -> Result<PathResult> {
        let (start, goal) = self.resolve_pair(start, goal)?;
        find_route_dijkstra(&self.graph, &self.closures, &start, &goal)
            .ok_or(Error::RouteNotFound { start, goal })
    }

    /// Heuristic-guided route using signal green times as the estimate.
    pub fn heuristic_path(&self, start: &str, goal: &str) -> Result<PathResult> {
        self.heuristic_path_with(&self.signals.heuristics(), start, goal)
    }

    /// Heuristic-guided route with an explicit heuristic table.
    pub fn heuristic_path_with(
        &self,
        heuristics: &HeuristicTable,
        start: &str,
        goal: &str,
    ) -> Result<PathResult> {
        let (start, goal) = self.resolve_pair(start, goal)?;
        let matrix = CostMatrix::from_graph(&self.graph);
        find_route_a_star(&matrix, heuristics, &self.closures, &start, &goal)
            .ok_or(Error::RouteNotFound { start, goal })
    }

    /// Every simple route between two intersections, up to the configured cap.
    pub fn all_paths(&self, start: &str, goal: &str) -> Result<Vec<PathResult>> {
        self.all_paths_limited(start, goal, self.limits.max_paths)
    }

    pub fn all_paths_limited(
        &self,
        start: &str,
        goal: &str,
        max_paths: usize,
    ) -> Result<Vec<PathResult>> {
        let (start, goal) = self.resolve_pair(start, goal)?;
        Ok(find_all_routes(
            &self.graph,
            &self.closures,
            &start,
            &goal,
            max_paths,
        ))
    }

    /// Every intersection reachable from `start` with the route used.
    pub fn reachable_from(&self, start: &str) -> Result<Vec<(IntersectionId, Vec<IntersectionId>)>> {
        let start = self.resolve(start)?;
        Ok(reachable_from(&self.graph, &self.closures, &start))
    }

    /// Shortest route for every vehicle; unknown or unreachable endpoints
    /// yield no route.
    pub fn vehicle_routes(&self, vehicles: &[Vehicle]) -> Vec<VehicleRoute> {
        vehicles
            .iter()
            .map(|vehicle| VehicleRoute {
                vehicle: vehicle.clone(),
                route: self.shortest_path(&vehicle.start, &vehicle.end).ok(),
            })
            .collect()
    }

    /// Count the vehicles whose shortest route uses each road, ordered by
    /// road. Roads no vehicle uses are omitted.
    pub fn congestion(&self, vehicles: &[Vehicle]) -> Vec<RoadLoad> {
        let routes = self.vehicle_routes(vehicles);
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for route in routes.iter().filter_map(|entry| entry.route.as_ref()) {
            for pair in route.steps.windows(2) {
                let (a, b) = (pair[0].as_str(), pair[1].as_str());
                let key = if a <= b { (a, b) } else { (b, a) };
                *counts.entry(key).or_default() += 1;
            }
        }

        let mut loads = Vec::with_capacity(counts.len());
        for ((first, second), count) in counts {
            loads.push(RoadLoad {
                first: first.to_string(),
                second: second.to_string(),
                vehicles: count,
                congested: count >= CONGESTION_THRESHOLD,
            });
        }
        debug!(roads = loads.len(), "road congestion counted");
        loads
    }

    /// Resolve a user-supplied identifier to a known intersection.
    pub fn resolve(&self, name: &str) -> Result<IntersectionId> {
        let trimmed = normalize_identifier(name)?;
        if self.graph.contains(trimmed) {
            return Ok(trimmed.to_string());
        }
        Err(Error::UnknownIntersection {
            name: trimmed.to_string(),
            suggestions: self.suggestions(trimmed),
        })
    }

    fn resolve_pair(&self, start: &str, goal: &str) -> Result<(IntersectionId, IntersectionId)> {
        Ok((self.resolve(start)?, self.resolve(goal)?))
    }

    fn suggestions(&self, name: &str) -> Vec<String> {
        let lowered = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .graph
            .intersections()
            .into_iter()
            .map(|id| (strsim::jaro_winkler(&lowered, &id.to_lowercase()), id))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, id)| id.to_string())
            .collect()
    }

    fn persist_roads(&self, graph: &Graph) -> Result<()> {
        match &self.store {
            Some(store) => store.save_roads(graph),
            None => {
                debug!("network not bound to a store; skipping persistence");
                Ok(())
            }
        }
    }
}

fn normalize_identifier(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidIdentifier);
    }
    Ok(trimmed)
}
