//! Trafficnet library entry points.
//!
//! This crate loads a city road network from delimited record files, keeps
//! road closures and traffic signals alongside it, and answers routing
//! queries (Dijkstra, A*, all simple paths, reachability). Higher-level
//! consumers such as the CLI should only depend on the items exported here
//! instead of reimplementing behavior.

pub mod closures;
pub mod dataset;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod matrix;
pub mod network;
pub mod path;
pub mod records;
pub mod routing;
pub mod signals;

pub use closures::{ClosureRegistry, ClosureStatus, RoadClosure};
pub use dataset::{default_data_dir, resolve_data_dir, NetworkPaths, NetworkStore, DATA_DIR_ENV};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, IntersectionId, Road, TravelTime, MAX_TRAVEL_TIME};
pub use matrix::{find_route_a_star, CostMatrix, HeuristicTable};
pub use network::{
    NetworkLimits, NetworkSummary, RoadLoad, RoadNetwork, VehicleRoute, CONGESTION_THRESHOLD,
};
pub use path::{find_all_routes, find_route_dijkstra, reachable_from, PathResult};
pub use records::LoadReport;
pub use routing::{plan_route, RouteAlgorithm, RoutePlan, RoutePlanner, RouteRequest};
pub use signals::{SignalBoard, TrafficSignal, Vehicle, DEFAULT_GREEN_TIME_FACTOR};
