mod common;

use common::{fixture_network, joined};
use trafficnet_lib::routing::{AStarPlanner, DijkstraPlanner, RoutePlanner};
use trafficnet_lib::{plan_route, Error, HeuristicTable, RouteAlgorithm, RouteRequest};

#[test]
fn dijkstra_route_plan_succeeds() {
    let network = fixture_network();
    let plan = plan_route(&network, &RouteRequest::dijkstra("A", "D")).expect("route exists");

    assert_eq!(plan.algorithm, RouteAlgorithm::Dijkstra);
    assert_eq!(plan.start, "A");
    assert_eq!(plan.goal, "D");
    assert_eq!(joined(&plan.steps), "A-C-E-D");
    assert_eq!(plan.total_time, 9);
    assert_eq!(plan.hop_count(), 3);
}

#[test]
fn a_star_with_green_time_heuristic_may_miss_the_optimum() {
    let network = fixture_network();
    let plan = plan_route(&network, &RouteRequest::a_star("A", "D")).expect("route exists");

    assert_eq!(plan.algorithm, RouteAlgorithm::AStar);
    assert_eq!(joined(&plan.steps), "A-B-D");
    assert_eq!(plan.total_time, 14);
}

#[test]
fn a_star_without_heuristic_matches_dijkstra() {
    let network = fixture_network();
    let planner = AStarPlanner::new(HeuristicTable::default());
    for goal in ["B", "C", "D", "E", "F"] {
        let a_star = planner.find_path(&network, "A", goal).expect("a* route");
        let dijkstra = DijkstraPlanner
            .find_path(&network, "A", goal)
            .expect("dijkstra route");
        assert_eq!(a_star.total_time, dijkstra.total_time, "goal {goal}");
    }
}

#[test]
fn a_star_honours_closures() {
    let mut network = fixture_network();
    network.block_road("A", "B").unwrap();
    let plan = plan_route(&network, &RouteRequest::a_star("A", "D")).expect("route exists");
    assert!(!joined(&plan.steps).starts_with("A-B"));
    assert_eq!(plan.steps.first().map(String::as_str), Some("A"));
    assert_eq!(plan.steps.last().map(String::as_str), Some("D"));
}

#[test]
fn a_star_to_self_is_trivial() {
    let network = fixture_network();
    let plan = plan_route(&network, &RouteRequest::a_star("C", "C")).expect("route exists");
    assert_eq!(plan.steps, vec!["C".to_string()]);
    assert_eq!(plan.total_time, 0);
}

#[test]
fn unknown_intersection_includes_suggestions() {
    let mut network = fixture_network();
    network.add_road("Main", "Market", 3).unwrap();

    let err = plan_route(&network, &RouteRequest::dijkstra("Mian", "A")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("unknown intersection: Mian"));
    assert!(message.contains("Did you mean"), "{message}");
    assert!(message.contains("'Main'"), "{message}");
}

#[test]
fn disconnected_intersections_report_route_not_found() {
    let mut network = fixture_network();
    network.add_road("G", "H", 1).unwrap();

    for request in [RouteRequest::dijkstra("A", "G"), RouteRequest::a_star("A", "G")] {
        let err = plan_route(&network, &request).unwrap_err();
        assert!(
            matches!(err, Error::RouteNotFound { ref start, ref goal } if start == "A" && goal == "G")
        );
    }
}

#[test]
fn identifiers_are_trimmed() {
    let network = fixture_network();
    let plan = plan_route(&network, &RouteRequest::dijkstra(" A ", "B\t")).expect("route exists");
    assert_eq!(joined(&plan.steps), "A-B");
}
