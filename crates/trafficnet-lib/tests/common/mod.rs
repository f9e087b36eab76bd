//! Common test utilities and fixture helpers.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trafficnet_lib::{NetworkLimits, NetworkStore, RoadNetwork};

/// Path to the city fixture shared by the workspace tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/city")
}

/// Fixture network loaded without a store, so mutations never touch disk.
#[allow(dead_code)]
pub fn fixture_network() -> RoadNetwork {
    let store = NetworkStore::in_dir(&fixtures_dir());
    RoadNetwork::load(&store, NetworkLimits::default()).expect("fixture loads")
}

/// Copy the fixture files into a fresh temporary directory.
#[allow(dead_code)]
pub fn copy_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for entry in fs::read_dir(fixtures_dir()).expect("read fixtures") {
        let entry = entry.expect("fixture entry");
        fs::copy(entry.path(), dir.path().join(entry.file_name())).expect("copy fixture");
    }
    dir
}

/// Open a write-through network over the files in `dir`.
#[allow(dead_code)]
pub fn open_network(dir: &Path) -> RoadNetwork {
    RoadNetwork::open(NetworkStore::in_dir(dir), NetworkLimits::default())
        .expect("network opens")
}

/// Render a route as `A-B-C` for compact assertions.
#[allow(dead_code)]
pub fn joined(steps: &[String]) -> String {
    steps.join("-")
}
