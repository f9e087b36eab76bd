mod common;

use std::fs;

use common::{copy_fixture, fixture_network, joined, open_network};
use trafficnet_lib::{Error, NetworkLimits, RoadNetwork};

#[test]
fn fixture_summary_counts_records() {
    let network = fixture_network();
    let summary = network.summary();
    assert_eq!(summary.intersections, 6);
    assert_eq!(summary.roads, 8);
    assert_eq!(summary.closures, 0, "Open closure records do not block");
    assert_eq!(summary.signals, 6);
    assert_eq!(
        network.intersections(),
        vec!["A", "B", "C", "D", "E", "F"]
    );
}

#[test]
fn adjacency_lists_are_sorted_by_destination() {
    let network = fixture_network();
    let adjacency = network.adjacency();
    let (id, edges) = &adjacency[1];
    assert_eq!(*id, "B");
    let targets: Vec<_> = edges.iter().map(|edge| edge.target.as_str()).collect();
    assert_eq!(targets, vec!["A", "C", "D"]);
}

#[test]
fn shortest_path_prefers_lowest_travel_time() {
    let network = fixture_network();
    let route = network.shortest_path("A", "D").expect("route exists");
    assert_eq!(joined(&route.steps), "A-C-E-D");
    assert_eq!(route.total_time, 9);

    let route = network.shortest_path("A", "F").expect("route exists");
    assert_eq!(joined(&route.steps), "A-C-E-D-F");
    assert_eq!(route.total_time, 20);
}

#[test]
fn shortest_path_to_self_is_trivial() {
    let network = fixture_network();
    let route = network.shortest_path("E", "E").expect("route exists");
    assert_eq!(route.steps, vec!["E".to_string()]);
    assert_eq!(route.total_time, 0);
}

#[test]
fn blocking_never_shortens_a_route() {
    let mut network = fixture_network();
    let before = network.shortest_path("A", "D").expect("route exists");

    network.block_road("E", "C").expect("block succeeds");
    let after = network.shortest_path("A", "D").expect("route exists");

    assert!(after.total_time >= before.total_time);
    assert_eq!(joined(&after.steps), "A-B-D");
    assert_eq!(after.total_time, 14);
}

#[test]
fn blocking_is_symmetric() {
    let mut network = fixture_network();
    network.block_road("C", "E").expect("block succeeds");
    assert!(network.is_blocked("C", "E"));
    assert!(network.is_blocked("E", "C"));

    let route = network.shortest_path("E", "A").expect("route exists");
    assert!(!joined(&route.steps).contains("E-C"));
}

#[test]
fn blocking_every_road_into_a_node_makes_it_unreachable() {
    let mut network = fixture_network();
    network.block_road("D", "F").unwrap();
    network.block_road("E", "F").unwrap();

    let err = network.shortest_path("A", "F").unwrap_err();
    assert!(matches!(err, Error::RouteNotFound { .. }));
    assert!(network.all_paths("A", "F").unwrap().is_empty());

    let reachable = network.reachable_from("A").unwrap();
    assert!(reachable.iter().all(|(id, _)| id != "F"));
    assert_eq!(reachable.len(), 5);
}

#[test]
fn blocking_unknown_intersections_is_allowed() {
    let mut network = fixture_network();
    network.block_road("X", "Y").expect("block succeeds");
    assert!(network.is_blocked("Y", "X"));
    assert_eq!(network.shortest_path("A", "D").unwrap().total_time, 9);
}

#[test]
fn all_paths_are_simple_and_capped() {
    let network = fixture_network();
    let routes = network.all_paths("A", "B").expect("paths");
    assert!(routes.len() > 2);
    assert_eq!(joined(&routes[0].steps), "A-B");
    assert_eq!(routes[0].total_time, 4);
    for route in &routes {
        assert_eq!(route.steps.first().map(String::as_str), Some("A"));
        assert_eq!(route.steps.last().map(String::as_str), Some("B"));
        let mut unique = route.steps.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), route.steps.len(), "route revisits a node");
    }

    let capped = network.all_paths_limited("A", "B", 2).expect("paths");
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[..], routes[..2]);
}

#[test]
fn reachable_reports_fewest_hop_routes() {
    let network = fixture_network();
    let reachable = network.reachable_from("A").expect("reachable");
    assert_eq!(reachable[0].0, "A");
    let (_, to_f) = reachable
        .iter()
        .find(|(id, _)| id == "F")
        .expect("F reachable");
    assert_eq!(to_f.len(), 4);
}

#[test]
fn unknown_intersection_is_reported() {
    let network = fixture_network();
    let err = network.shortest_path("A", "Q").unwrap_err();
    assert!(matches!(err, Error::UnknownIntersection { ref name, .. } if name == "Q"));
}

#[test]
fn capacity_bound_rejects_new_intersections() {
    let mut network = RoadNetwork::new(NetworkLimits {
        max_intersections: Some(2),
        ..NetworkLimits::default()
    });
    network.add_road("A", "B", 3).unwrap();
    network.add_road("B", "A", 7).unwrap();
    let err = network.add_road("A", "C", 1).unwrap_err();
    assert_eq!(err.to_string(), "intersection capacity of 2 exceeded");
    assert!(!network.graph().contains("C"));
}

#[test]
fn closure_capacity_is_enforced() {
    let mut network = RoadNetwork::new(NetworkLimits {
        max_closures: Some(1),
        ..NetworkLimits::default()
    });
    network.block_road("A", "B").unwrap();
    network.block_road("B", "A").expect("existing record is reused");
    let err = network.block_road("B", "C").unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { limit: 1, .. }));
}

#[test]
fn add_road_writes_through() {
    let dir = copy_fixture();
    let mut network = open_network(dir.path());
    network.add_road("A", "F", 1).expect("road added");

    let reopened = open_network(dir.path());
    let route = reopened.shortest_path("A", "F").expect("route exists");
    assert_eq!(joined(&route.steps), "A-F");
    assert_eq!(reopened.summary().roads, 9);
}

#[test]
fn remove_road_writes_through() {
    let dir = copy_fixture();
    let mut network = open_network(dir.path());
    network.remove_road("E", "C").expect("road removed");

    let reopened = open_network(dir.path());
    assert!(!reopened.graph().has_edge("C", "E"));
    assert!(!reopened.graph().has_edge("E", "C"));
    assert_eq!(reopened.shortest_path("A", "D").unwrap().total_time, 14);
}

#[test]
fn failed_remove_leaves_files_untouched() {
    let dir = copy_fixture();
    let path = dir.path().join("road_network.csv");
    let before = fs::read_to_string(&path).unwrap();

    let mut network = open_network(dir.path());
    assert!(network.remove_road("A", "F").is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn block_road_writes_through_and_keeps_inactive_records() {
    let dir = copy_fixture();
    let mut network = open_network(dir.path());
    network.block_road("C", "E").expect("block succeeds");

    let text = fs::read_to_string(dir.path().join("road_closures.csv")).unwrap();
    assert_eq!(
        text,
        "Intersection1,Intersection2,Status\nB,D,Open\nC,E,Blocked\n"
    );

    let reopened = open_network(dir.path());
    assert!(reopened.is_blocked("E", "C"));
    assert!(!reopened.is_blocked("B", "D"));
}

#[test]
fn blocking_an_open_record_updates_it_in_place() {
    let dir = copy_fixture();
    let mut network = open_network(dir.path());
    network.block_road("D", "B").expect("block succeeds");

    let text = fs::read_to_string(dir.path().join("road_closures.csv")).unwrap();
    assert_eq!(text, "Intersection1,Intersection2,Status\nB,D,Blocked\n");
}

#[test]
fn missing_data_directory_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut network = open_network(&dir.path().join("fresh"));
    assert!(network.graph().is_empty());

    network.add_road("Main", "Mill", 2).unwrap();
    assert!(dir.path().join("fresh/road_network.csv").exists());
}

#[test]
fn loop_road_survives_reload() {
    let dir = copy_fixture();
    let mut network = open_network(dir.path());
    network.add_road("X", "X", 5).expect("loop road added");

    let text = fs::read_to_string(dir.path().join("road_network.csv")).unwrap();
    assert!(text.ends_with("X,X,5\n"), "unexpected roads file: {text}");

    let reopened = open_network(dir.path());
    assert!(reopened.graph().contains("X"));
    assert!(reopened.graph().has_edge("X", "X"));
    assert_eq!(reopened.summary().roads, 9);
}

#[test]
fn failed_write_leaves_network_unchanged() {
    let dir = copy_fixture();
    let mut network = open_network(dir.path());

    // A directory in place of a record file makes every save fail.
    for name in ["road_network.csv", "road_closures.csv"] {
        let path = dir.path().join(name);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
    }

    assert!(network.add_road("A", "F", 1).is_err());
    assert!(!network.graph().has_edge("A", "F"));
    assert!(network.remove_road("C", "E").is_err());
    assert!(network.graph().has_edge("C", "E"));
    assert!(network.block_road("C", "E").is_err());
    assert!(!network.is_blocked("C", "E"));
    assert_eq!(network.shortest_path("A", "D").unwrap().total_time, 9);
}
