use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::closures::ClosureRegistry;
use crate::frontier::Frontier;
use crate::graph::{Graph, IntersectionId, TravelTime};

/// Default cap on the number of routes returned by [`find_all_routes`].
pub const DEFAULT_MAX_PATHS: usize = 100;

/// A route through the network together with its accumulated travel time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    pub steps: Vec<IntersectionId>,
    pub total_time: TravelTime,
}

impl PathResult {
    /// Number of roads travelled.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Run Dijkstra's algorithm from `start` to `goal`, skipping blocked roads.
///
/// Returns `None` when either endpoint is unknown or the goal is unreachable
/// under the current closures.
pub fn find_route_dijkstra(
    graph: &Graph,
    closures: &ClosureRegistry,
    start: &str,
    goal: &str,
) -> Option<PathResult> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }

    let mut distances: HashMap<&str, TravelTime> = HashMap::new();
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut finalized: HashSet<&str> = HashSet::new();
    let mut frontier = Frontier::new();

    distances.insert(start, 0);
    frontier.push(start.to_string(), 0);

    while let Some((node, _)) = frontier.pop_min() {
        let Some((current, &current_distance)) = distances.get_key_value(node.as_str()) else {
            continue;
        };
        let current = *current;
        if !finalized.insert(current) {
            continue;
        }
        if current == goal {
            break;
        }

        for edge in graph.neighbours(current) {
            let next = edge.target.as_str();
            if finalized.contains(next) || closures.is_blocked(current, next) {
                continue;
            }

            let Some(next_distance) = current_distance.checked_add(edge.travel_time) else {
                continue;
            };
            // Nodes without a distance are unreached.
            if distances
                .get(next)
                .map_or(true, |&known| next_distance < known)
            {
                distances.insert(next, next_distance);
                parents.insert(next, current);
                frontier.push(next.to_string(), next_distance);
            }
        }
    }

    debug!(
        start,
        goal,
        pushed = frontier.pushed(),
        finalized = finalized.len(),
        "dijkstra search finished"
    );

    let total_time = *distances.get(goal)?;
    Some(PathResult {
        steps: reconstruct_path(&parents, start, goal),
        total_time,
    })
}

/// Enumerate every simple route from `start` to `goal`, skipping blocked
/// roads.
///
/// Neighbours are explored in ascending identifier order, so the output order
/// is reproducible. Enumeration stops once `max_paths` routes are recorded.
/// The search is exponential on dense graphs with cycles.
pub fn find_all_routes(
    graph: &Graph,
    closures: &ClosureRegistry,
    start: &str,
    goal: &str,
    max_paths: usize,
) -> Vec<PathResult> {
    if !graph.contains(start) || !graph.contains(goal) || max_paths == 0 {
        return Vec::new();
    }

    let mut walker = RouteWalker {
        graph,
        closures,
        goal,
        max_paths,
        visited: HashSet::new(),
        current: Vec::new(),
        routes: Vec::new(),
    };
    walker.visit(start, 0);

    debug!(start, goal, routes = walker.routes.len(), "route enumeration finished");
    walker.routes
}

struct RouteWalker<'a> {
    graph: &'a Graph,
    closures: &'a ClosureRegistry,
    goal: &'a str,
    max_paths: usize,
    visited: HashSet<&'a str>,
    current: Vec<&'a str>,
    routes: Vec<PathResult>,
}

impl<'a> RouteWalker<'a> {
    fn visit(&mut self, node: &'a str, total_time: TravelTime) {
        self.visited.insert(node);
        self.current.push(node);

        if node == self.goal {
            self.routes.push(PathResult {
                steps: self.current.iter().map(|step| step.to_string()).collect(),
                total_time,
            });
        } else {
            let graph = self.graph;
            for edge in graph.sorted_neighbours(node) {
                if self.routes.len() >= self.max_paths {
                    break;
                }
                let next = edge.target.as_str();
                if self.visited.contains(next) || self.closures.is_blocked(node, next) {
                    continue;
                }
                let Some(next_total) = total_time.checked_add(edge.travel_time) else {
                    continue;
                };
                self.visit(next, next_total);
            }
        }

        // Backtrack so sibling branches may pass through this node again.
        self.current.pop();
        self.visited.remove(node);
    }
}

/// Breadth-first reachability from `start`, skipping blocked roads.
///
/// Returns every reachable intersection (including `start`) in discovery
/// order, each with the fewest-hop route used to reach it.
pub fn reachable_from(
    graph: &Graph,
    closures: &ClosureRegistry,
    start: &str,
) -> Vec<(IntersectionId, Vec<IntersectionId>)> {
    if !graph.contains(start) {
        return Vec::new();
    }

    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::from([start]);
    let mut order = vec![start];
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for edge in graph.sorted_neighbours(current) {
            let next = edge.target.as_str();
            if seen.contains(next) || closures.is_blocked(current, next) {
                continue;
            }
            seen.insert(next);
            parents.insert(next, current);
            order.push(next);
            queue.push_back(next);
        }
    }

    order
        .into_iter()
        .map(|node| (node.to_string(), reconstruct_path(&parents, start, node)))
        .collect()
}

fn reconstruct_path<'a>(
    parents: &HashMap<&'a str, &'a str>,
    start: &str,
    goal: &'a str,
) -> Vec<IntersectionId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node.to_string());
        if node == start {
            break;
        }
        current = parents.get(node).copied();
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut graph = Graph::default();
        for (a, b, w) in [("A", "B", 5), ("B", "C", 3), ("A", "C", 20)] {
            graph.add_edge(a, b, w).unwrap();
            graph.add_edge(b, a, w).unwrap();
        }
        graph
    }

    #[test]
    fn dijkstra_prefers_cheaper_detour() {
        let graph = triangle();
        let route = find_route_dijkstra(&graph, &ClosureRegistry::default(), "A", "C").unwrap();
        assert_eq!(route.steps, vec!["A", "B", "C"]);
        assert_eq!(route.total_time, 8);
        assert_eq!(route.hop_count(), 2);
    }

    #[test]
    fn dijkstra_skips_blocked_roads() {
        let graph = triangle();
        let mut closures = ClosureRegistry::default();
        closures.block("B", "A").unwrap();
        let route = find_route_dijkstra(&graph, &closures, "A", "C").unwrap();
        assert_eq!(route.steps, vec!["A", "C"]);
        assert_eq!(route.total_time, 20);
    }

    #[test]
    fn dijkstra_same_node_is_trivial() {
        let graph = triangle();
        let route = find_route_dijkstra(&graph, &ClosureRegistry::default(), "B", "B").unwrap();
        assert_eq!(route.steps, vec!["B"]);
        assert_eq!(route.total_time, 0);
    }

    #[test]
    fn dijkstra_reports_unreachable_goal() {
        let mut graph = triangle();
        graph.ensure_intersection("D").unwrap();
        assert!(find_route_dijkstra(&graph, &ClosureRegistry::default(), "A", "D").is_none());
        assert!(find_route_dijkstra(&graph, &ClosureRegistry::default(), "A", "Q").is_none());
    }

    #[test]
    fn dijkstra_reaches_nodes_at_the_largest_distance() {
        let mut graph = Graph::default();
        for (a, b, w) in [("A", "B", TravelTime::MAX), ("B", "C", 1)] {
            graph.add_edge(a, b, w).unwrap();
            graph.add_edge(b, a, w).unwrap();
        }
        let closures = ClosureRegistry::default();

        let route = find_route_dijkstra(&graph, &closures, "A", "B").unwrap();
        assert_eq!(route.total_time, TravelTime::MAX);
        assert!(find_route_dijkstra(&graph, &closures, "A", "C").is_none());
        assert!(find_all_routes(&graph, &closures, "A", "C", 10).is_empty());
        assert_eq!(find_all_routes(&graph, &closures, "A", "B", 10).len(), 1);
    }

    #[test]
    fn all_routes_enumerates_simple_paths_in_order() {
        let graph = triangle();
        let routes = find_all_routes(&graph, &ClosureRegistry::default(), "A", "C", 10);
        assert_eq!(
            routes,
            vec![
                PathResult {
                    steps: vec!["A".into(), "B".into(), "C".into()],
                    total_time: 8,
                },
                PathResult {
                    steps: vec!["A".into(), "C".into()],
                    total_time: 20,
                },
            ]
        );
    }

    #[test]
    fn all_routes_respects_cap() {
        let graph = triangle();
        let routes = find_all_routes(&graph, &ClosureRegistry::default(), "A", "C", 1);
        assert_eq!(routes.len(), 1);
        assert!(find_all_routes(&graph, &ClosureRegistry::default(), "A", "C", 0).is_empty());
    }

    #[test]
    fn reachability_honours_closures() {
        let mut graph = triangle();
        graph.add_edge("C", "D", 1).unwrap();
        graph.add_edge("D", "C", 1).unwrap();
        let mut closures = ClosureRegistry::default();
        closures.block("A", "C").unwrap();

        let reached = reachable_from(&graph, &closures, "A");
        let nodes: Vec<_> = reached.iter().map(|(node, _)| node.as_str()).collect();
        assert_eq!(nodes, vec!["A", "B", "C", "D"]);
        assert_eq!(reached[3].1, vec!["A", "B", "C", "D"]);
    }
}
