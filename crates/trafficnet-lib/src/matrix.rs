//! Dense cost matrix and the heuristic-guided (A*) search that runs on it.
//!
//! The heuristic comes from traffic signal green times rather than a
//! geometric lower bound, so it is not admissible: the search is a
//! best-effort guided search and may return a costlier route than
//! [`find_route_dijkstra`](crate::path::find_route_dijkstra).

use std::collections::HashMap;

use tracing::debug;

use crate::closures::ClosureRegistry;
use crate::graph::{Graph, IntersectionId, TravelTime};
use crate::path::PathResult;

/// Per-intersection heuristic estimates. Missing entries count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicTable {
    values: HashMap<IntersectionId, TravelTime>,
}

impl HeuristicTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<IntersectionId>, value: TravelTime) {
        self.values.insert(id.into(), value);
    }

    pub fn get(&self, id: &str) -> TravelTime {
        self.values.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(IntersectionId, TravelTime)> for HeuristicTable {
    fn from_iter<T: IntoIterator<Item = (IntersectionId, TravelTime)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Dense adjacency matrix indexed by intersection position.
#[derive(Debug, Clone, Default)]
pub struct CostMatrix {
    ids: Vec<IntersectionId>,
    index: HashMap<IntersectionId, usize>,
    costs: Vec<Option<TravelTime>>,
}

impl CostMatrix {
    /// Build the matrix from an edge store. Intersections are indexed in
    /// ascending identifier order; parallel edges keep the cheapest cost.
    pub fn from_graph(graph: &Graph) -> Self {
        let ids: Vec<IntersectionId> = graph
            .intersections()
            .into_iter()
            .map(str::to_string)
            .collect();
        let index: HashMap<IntersectionId, usize> = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();
        let size = ids.len();
        let mut costs: Vec<Option<TravelTime>> = vec![None; size * size];

        for (row, id) in ids.iter().enumerate() {
            for edge in graph.neighbours(id) {
                let Some(&column) = index.get(&edge.target) else {
                    continue;
                };
                let cell = &mut costs[row * size + column];
                *cell = Some(match *cell {
                    Some(existing) => existing.min(edge.travel_time),
                    None => edge.travel_time,
                });
            }
        }

        Self { ids, index, costs }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Travel time of the direct road between two positions, if any.
    pub fn cost(&self, from: usize, to: usize) -> Option<TravelTime> {
        self.costs[from * self.ids.len() + to]
    }
}

/// Run the heuristic-guided search from `start` to `goal`.
///
/// Candidates are scored by `g + h`. Open and closed membership are flags,
/// and the next candidate is found by a linear scan for the lowest score,
/// with ties going to the lower index. Returns `None` when either endpoint
/// is unknown or no open candidate reaches the goal.
pub fn find_route_a_star(
    matrix: &CostMatrix,
    heuristics: &HeuristicTable,
    closures: &ClosureRegistry,
    start: &str,
    goal: &str,
) -> Option<PathResult> {
    let start_index = matrix.index_of(start)?;
    let goal_index = matrix.index_of(goal)?;
    let size = matrix.len();

    let mut open = vec![false; size];
    let mut closed = vec![false; size];
    let mut g_score = vec![TravelTime::MAX; size];
    let mut f_score = vec![TravelTime::MAX; size];
    let mut parents: Vec<Option<usize>> = vec![None; size];

    g_score[start_index] = 0;
    f_score[start_index] = heuristics.get(start);
    open[start_index] = true;

    let mut expanded = 0usize;
    loop {
        let current = (0..size)
            .filter(|&candidate| open[candidate])
            .min_by_key(|&candidate| f_score[candidate]);
        let Some(current) = current else {
            debug!(start, goal, expanded, "a* search exhausted open set");
            return None;
        };
        if current == goal_index {
            break;
        }

        open[current] = false;
        closed[current] = true;
        expanded += 1;

        for neighbour in 0..size {
            if closed[neighbour] {
                continue;
            }
            let Some(cost) = matrix.cost(current, neighbour) else {
                continue;
            };
            if closures.is_blocked(&matrix.ids[current], &matrix.ids[neighbour]) {
                continue;
            }

            let tentative = g_score[current].saturating_add(cost);
            if tentative < g_score[neighbour] {
                g_score[neighbour] = tentative;
                f_score[neighbour] =
                    tentative.saturating_add(heuristics.get(&matrix.ids[neighbour]));
                parents[neighbour] = Some(current);
                open[neighbour] = true;
            }
        }
    }

    debug!(start, goal, expanded, "a* search reached goal");

    let mut steps = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(position) = cursor {
        steps.push(matrix.ids[position].clone());
        cursor = parents[position];
    }
    steps.reverse();

    Some(PathResult {
        steps,
        total_time: g_score[goal_index],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(roads: &[(&str, &str, TravelTime)]) -> Graph {
        let mut graph = Graph::default();
        for &(a, b, w) in roads {
            graph.add_edge(a, b, w).unwrap();
            graph.add_edge(b, a, w).unwrap();
        }
        graph
    }

    #[test]
    fn matrix_keeps_cheapest_parallel_edge() {
        let mut graph = network(&[("A", "B", 9)]);
        graph.add_edge("A", "B", 4).unwrap();
        let matrix = CostMatrix::from_graph(&graph);
        let a = matrix.index_of("A").unwrap();
        let b = matrix.index_of("B").unwrap();
        assert_eq!(matrix.cost(a, b), Some(4));
        assert_eq!(matrix.cost(b, a), Some(9));
        assert_eq!(matrix.cost(a, a), None);
    }

    #[test]
    fn zero_heuristic_matches_dijkstra() {
        let graph = network(&[("A", "B", 5), ("B", "C", 3), ("A", "C", 20)]);
        let matrix = CostMatrix::from_graph(&graph);
        let route = find_route_a_star(
            &matrix,
            &HeuristicTable::new(),
            &ClosureRegistry::default(),
            "A",
            "C",
        )
        .unwrap();
        assert_eq!(route.steps, vec!["A", "B", "C"]);
        assert_eq!(route.total_time, 8);
    }

    #[test]
    fn inadmissible_heuristic_can_choose_costlier_route() {
        let graph = network(&[("A", "B", 5), ("B", "C", 3), ("A", "C", 20)]);
        let matrix = CostMatrix::from_graph(&graph);
        let heuristics: HeuristicTable = [("B".to_string(), 100)].into_iter().collect();
        let route = find_route_a_star(
            &matrix,
            &heuristics,
            &ClosureRegistry::default(),
            "A",
            "C",
        )
        .unwrap();
        assert_eq!(route.steps, vec!["A", "C"]);
        assert_eq!(route.total_time, 20);
    }

    #[test]
    fn blocked_roads_are_skipped() {
        let graph = network(&[("A", "B", 5)]);
        let matrix = CostMatrix::from_graph(&graph);
        let mut closures = ClosureRegistry::default();
        closures.block("A", "B").unwrap();
        assert!(
            find_route_a_star(&matrix, &HeuristicTable::new(), &closures, "A", "B").is_none()
        );
    }

    #[test]
    fn same_start_and_goal_is_trivial() {
        let graph = network(&[("A", "B", 5)]);
        let matrix = CostMatrix::from_graph(&graph);
        let route = find_route_a_star(
            &matrix,
            &HeuristicTable::new(),
            &ClosureRegistry::default(),
            "A",
            "A",
        )
        .unwrap();
        assert_eq!(route.steps, vec!["A"]);
        assert_eq!(route.total_time, 0);
    }
}
