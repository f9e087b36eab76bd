//! Route planning over a [`RoadNetwork`].
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported routing algorithms (Dijkstra, A*)
//! - [`RouteRequest`] - High-level route planning request
//! - [`RoutePlan`] - Planned route result
//! - [`plan_route`] - Main entry point for computing routes
//!
//! Each algorithm is wrapped in a [`RoutePlanner`] so the orchestration in
//! [`plan_route`] does not depend on which search runs.
//!
//! # Example
//!
//! ```ignore
//! use trafficnet_lib::{plan_route, NetworkStore, NetworkLimits, RoadNetwork, RouteRequest};
//!
//! let network = RoadNetwork::open(NetworkStore::in_dir(dir), NetworkLimits::default())?;
//! let plan = plan_route(&network, &RouteRequest::dijkstra("A", "C"))?;
//! println!("Route: {} hops, {} units", plan.hop_count(), plan.total_time);
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{IntersectionId, TravelTime};
use crate::network::RoadNetwork;

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm over the adjacency lists.
    #[default]
    Dijkstra,
    /// A* over the dense cost matrix, guided by signal green times.
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a*" => Ok(RouteAlgorithm::AStar),
            other => Err(format!("unknown routing algorithm '{other}'")),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub algorithm: RouteAlgorithm,
}

impl RouteRequest {
    pub fn new(start: impl Into<String>, goal: impl Into<String>, algorithm: RouteAlgorithm) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            algorithm,
        }
    }

    /// Convenience constructor for Dijkstra routes.
    pub fn dijkstra(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self::new(start, goal, RouteAlgorithm::Dijkstra)
    }

    /// Convenience constructor for heuristic-guided routes.
    pub fn a_star(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self::new(start, goal, RouteAlgorithm::AStar)
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub start: IntersectionId,
    pub goal: IntersectionId,
    pub steps: Vec<IntersectionId>,
    pub total_time: TravelTime,
}

impl RoutePlan {
    /// Number of roads in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Compute a route using the requested algorithm.
///
/// This is the main entry point for route planning. It:
/// 1. Resolves intersection identifiers, suggesting close matches for typos
/// 2. Selects the planner for the requested algorithm
/// 3. Runs the search with the network's current closures
pub fn plan_route(network: &RoadNetwork, request: &RouteRequest) -> Result<RoutePlan> {
    // Step 1: Resolve identifiers
    let start = network.resolve(&request.start)?;
    let goal = network.resolve(&request.goal)?;

    // Step 2: Select planner
    let planner = select_planner(request, network);

    // Step 3: Execute pathfinding
    let route = planner
        .find_path(network, &start, &goal)
        .ok_or_else(|| Error::RouteNotFound {
            start: start.clone(),
            goal: goal.clone(),
        })?;

    debug!(
        algorithm = %planner.algorithm(),
        hops = route.hop_count(),
        total_time = route.total_time,
        "route planned"
    );

    Ok(RoutePlan {
        algorithm: planner.algorithm(),
        start,
        goal,
        steps: route.steps,
        total_time: route.total_time,
    })
}
