use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::closures::ClosureRegistry;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::records::{
    read_closures, read_roads, read_signals, read_vehicles, write_closures, write_roads,
    write_vehicles, ClosureRecord, LoadReport, RoadRecord, SignalRecord, VehicleRecord,
};
use crate::signals::Vehicle;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TRAFFICNET_DATA_DIR";

pub const ROADS_FILENAME: &str = "road_network.csv";
pub const CLOSURES_FILENAME: &str = "road_closures.csv";
pub const SIGNALS_FILENAME: &str = "traffic_signals.csv";
pub const VEHICLES_FILENAME: &str = "vehicles.csv";

/// Locations of the record files that make up a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPaths {
    pub roads: PathBuf,
    pub closures: PathBuf,
    pub signals: PathBuf,
    pub vehicles: PathBuf,
}

impl NetworkPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            roads: dir.join(ROADS_FILENAME),
            closures: dir.join(CLOSURES_FILENAME),
            signals: dir.join(SIGNALS_FILENAME),
            vehicles: dir.join(VEHICLES_FILENAME),
        }
    }
}

/// Resolve the default data directory using platform-specific project directories.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "trafficnet", "trafficnet").ok_or(Error::DataDirUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Resolve the data directory.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `TRAFFICNET_DATA_DIR` environment variable.
/// 3. Platform-specific project directories.
pub fn resolve_data_dir(target: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = target {
        return Ok(explicit.to_path_buf());
    }

    if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(env_path));
    }

    default_data_dir()
}

/// File-backed persistence for a network.
///
/// Reads treat a missing file as an empty record set. Writes go to a
/// temporary file in the same directory which then replaces the target.
#[derive(Debug, Clone)]
pub struct NetworkStore {
    paths: NetworkPaths,
}

impl NetworkStore {
    pub fn new(paths: NetworkPaths) -> Self {
        Self { paths }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(NetworkPaths::in_dir(dir))
    }

    pub fn paths(&self) -> &NetworkPaths {
        &self.paths
    }

    pub fn read_roads(&self) -> Result<(Vec<RoadRecord>, LoadReport)> {
        match open_optional(&self.paths.roads)? {
            Some(file) => read_roads(file),
            None => Ok(Default::default()),
        }
    }

    pub fn read_closures(&self) -> Result<(Vec<ClosureRecord>, LoadReport)> {
        match open_optional(&self.paths.closures)? {
            Some(file) => read_closures(file),
            None => Ok(Default::default()),
        }
    }

    pub fn read_signals(&self) -> Result<(Vec<SignalRecord>, LoadReport)> {
        match open_optional(&self.paths.signals)? {
            Some(file) => read_signals(file),
            None => Ok(Default::default()),
        }
    }

    pub fn read_vehicles(&self) -> Result<(Vec<VehicleRecord>, LoadReport)> {
        match open_optional(&self.paths.vehicles)? {
            Some(file) => read_vehicles(file),
            None => Ok(Default::default()),
        }
    }

    pub fn save_roads(&self, graph: &Graph) -> Result<()> {
        replace_file(&self.paths.roads, |writer| write_roads(writer, graph))?;
        info!(path = %self.paths.roads.display(), "road network saved");
        Ok(())
    }

    pub fn save_closures(&self, closures: &ClosureRegistry) -> Result<()> {
        replace_file(&self.paths.closures, |writer| write_closures(writer, closures))?;
        info!(path = %self.paths.closures.display(), "road closures saved");
        Ok(())
    }

    pub fn save_vehicles(&self, vehicles: &[Vehicle]) -> Result<()> {
        replace_file(&self.paths.vehicles, |writer| write_vehicles(writer, vehicles))?;
        info!(path = %self.paths.vehicles.display(), "vehicles saved");
        Ok(())
    }
}

fn open_optional(path: &Path) -> Result<Option<File>> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "record file missing; treating as empty");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn replace_file<F>(destination: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let parent = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(destination).map_err(|err| err.error)?;
    Ok(())
}
