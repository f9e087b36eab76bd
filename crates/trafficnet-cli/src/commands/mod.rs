// Module exports for CLI subcommands
//
// Each module handles a group of subcommands; main.rs parses arguments and
// dispatches here.

pub mod network;
pub mod roads;
pub mod route;
pub mod signals;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use trafficnet_cli::output::{write_json, OutputFormat};
use trafficnet_cli::terminal::ColorPalette;
use trafficnet_lib::{resolve_data_dir, NetworkLimits, NetworkStore, RoadNetwork, Vehicle};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub data_dir: PathBuf,
    pub format: OutputFormat,
    pub palette: ColorPalette,
}

impl CommandContext {
    pub fn new(data_dir: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let data_dir =
            resolve_data_dir(data_dir).context("failed to resolve the road network directory")?;
        Ok(Self {
            data_dir,
            format,
            palette: ColorPalette::detect(),
        })
    }

    pub fn store(&self) -> NetworkStore {
        NetworkStore::in_dir(&self.data_dir)
    }

    /// Load the network and bind it for write-through.
    pub fn open_network(&self) -> Result<RoadNetwork> {
        RoadNetwork::open(self.store(), NetworkLimits::default()).with_context(|| {
            format!(
                "failed to load road network from {}",
                self.data_dir.display()
            )
        })
    }

    pub fn load_vehicles(&self) -> Result<Vec<Vehicle>> {
        let store = self.store();
        let (records, _) = store.read_vehicles().with_context(|| {
            format!(
                "failed to read vehicles from {}",
                store.paths().vehicles.display()
            )
        })?;
        Ok(records.into_iter().map(Vehicle::from).collect())
    }

    /// Render `value` as JSON, or hand stdout to `text` for the text format.
    pub fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&mut io::StdoutLock<'static>, &ColorPalette) -> io::Result<()>,
    {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Json => write_json(&mut stdout, value)?,
            OutputFormat::Text => text(&mut stdout, &self.palette)?,
        }
        stdout.flush()?;
        Ok(())
    }
}
