//! Route planning strategies.
//!
//! Each [`RoutePlanner`] wraps one search algorithm so `plan_route` can run
//! any of them without knowing which.

use crate::matrix::{find_route_a_star, CostMatrix, HeuristicTable};
use crate::network::RoadNetwork;
use crate::path::{find_route_dijkstra, PathResult};

use super::{RouteAlgorithm, RouteRequest};

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search between two resolved intersections.
    ///
    /// Returns `Some(route)` if a route is found, `None` otherwise.
    fn find_path(&self, network: &RoadNetwork, start: &str, goal: &str) -> Option<PathResult>;
}

/// Dijkstra's algorithm planner over the adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(&self, network: &RoadNetwork, start: &str, goal: &str) -> Option<PathResult> {
        find_route_dijkstra(network.graph(), network.closures(), start, goal)
    }
}

/// A* planner over a dense cost matrix.
///
/// The heuristic is a per-intersection table. Green times are not travel
/// time estimates, so routes found this way are not guaranteed shortest.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    heuristics: HeuristicTable,
}

impl AStarPlanner {
    pub fn new(heuristics: HeuristicTable) -> Self {
        Self { heuristics }
    }

    /// Planner using the network's current signal green times.
    pub fn from_network(network: &RoadNetwork) -> Self {
        Self::new(network.signals().heuristics())
    }

    pub fn heuristics(&self) -> &HeuristicTable {
        &self.heuristics
    }
}

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(&self, network: &RoadNetwork, start: &str, goal: &str) -> Option<PathResult> {
        let matrix = CostMatrix::from_graph(network.graph());
        find_route_a_star(&matrix, &self.heuristics, network.closures(), start, goal)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest, network: &RoadNetwork) -> Box<dyn RoutePlanner> {
    match request.algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner::from_network(network)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planners_report_their_algorithm() {
        assert_eq!(DijkstraPlanner.algorithm(), RouteAlgorithm::Dijkstra);
        assert_eq!(AStarPlanner::default().algorithm(), RouteAlgorithm::AStar);
    }

    #[test]
    fn select_planner_chooses_correct_type() {
        let network = RoadNetwork::default();
        let planner = select_planner(&RouteRequest::a_star("A", "B"), &network);
        assert_eq!(planner.algorithm(), RouteAlgorithm::AStar);
        let planner = select_planner(&RouteRequest::dijkstra("A", "B"), &network);
        assert_eq!(planner.algorithm(), RouteAlgorithm::Dijkstra);
    }
}
