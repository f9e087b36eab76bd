mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trafficnet_cli::output::OutputFormat;
use trafficnet_lib::{RouteAlgorithm, TravelTime, DEFAULT_GREEN_TIME_FACTOR};

use commands::CommandContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "City road network routing utilities")]
struct Cli {
    /// Override the directory holding the road network files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every intersection with its outgoing roads.
    Network,
    /// Add an undirected road between two intersections.
    AddRoad {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Travel time; must be a positive integer.
        #[arg(long = "time", allow_negative_numbers = true)]
        time: i64,
    },
    /// Remove the road between two intersections.
    RemoveRoad {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
    /// Block the road between two intersections.
    BlockRoad {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
    /// List blocked roads.
    Closures,
    /// Compute a route between two intersections.
    Route {
        /// Starting intersection.
        #[arg(long = "from")]
        from: String,
        /// Destination intersection.
        #[arg(long = "to")]
        to: String,
        /// Algorithm to use when planning the route.
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Dijkstra)]
        algorithm: AlgorithmArg,
    },
    /// Route an emergency vehicle and override the signals along its route.
    Emergency {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
    /// Enumerate simple paths between two intersections.
    AllPaths {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Maximum number of paths to report.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List every intersection reachable from a starting point.
    Reachable {
        #[arg(long = "from")]
        from: String,
    },
    /// Show traffic signals ordered by vehicle density.
    Signals {
        /// Green-time reduction per vehicle.
        #[arg(long, default_value_t = DEFAULT_GREEN_TIME_FACTOR)]
        factor: TravelTime,
    },
    /// Show every vehicle with its shortest route.
    Vehicles,
    /// Add a vehicle and adjust signal green times for the new density.
    AddVehicle {
        #[arg(long)]
        id: String,
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Green-time reduction per vehicle.
        #[arg(long, default_value_t = DEFAULT_GREEN_TIME_FACTOR)]
        factor: TravelTime,
    },
    /// Count vehicles per road and flag congested roads.
    Congestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Dijkstra,
    #[value(name = "a-star")]
    AStar,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = CommandContext::new(cli.data_dir.as_deref(), cli.format)?;

    match cli.command {
        Command::Network => commands::network::handle_network(&ctx),
        Command::AddRoad { from, to, time } => {
            commands::roads::handle_add_road(&ctx, &from, &to, time)
        }
        Command::RemoveRoad { from, to } => commands::roads::handle_remove_road(&ctx, &from, &to),
        Command::BlockRoad { from, to } => commands::roads::handle_block_road(&ctx, &from, &to),
        Command::Closures => commands::network::handle_closures(&ctx),
        Command::Route {
            from,
            to,
            algorithm,
        } => commands::route::handle_route(&ctx, &from, &to, algorithm.into()),
        Command::Emergency { from, to } => commands::route::handle_emergency(&ctx, &from, &to),
        Command::AllPaths { from, to, limit } => {
            commands::route::handle_all_paths(&ctx, &from, &to, limit)
        }
        Command::Reachable { from } => commands::route::handle_reachable(&ctx, &from),
        Command::Signals { factor } => commands::signals::handle_signals(&ctx, factor),
        Command::Vehicles => commands::signals::handle_vehicles(&ctx),
        Command::AddVehicle {
            id,
            from,
            to,
            factor,
        } => commands::signals::handle_add_vehicle(&ctx, &id, &from, &to, factor),
        Command::Congestion => commands::signals::handle_congestion(&ctx),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
