use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use saferoute_cli::commands::listing::{handle_nodes_command, handle_zones_command};
use saferoute_cli::commands::route::{
    handle_route_command, AlgorithmArg, ModeArg, RouteCommandArgs,
};
use saferoute_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Safety-aware pedestrian routing")]
struct Cli {
    /// Override the city dataset path (defaults to $SAFEROUTE_DATASET, then the platform data dir).
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a walking route between two nodes.
    Route {
        /// Starting node id or label.
        #[arg(long = "from")]
        from: String,
        /// Destination node id or label.
        #[arg(long = "to")]
        to: String,
        /// Minimize distance or risk-weighted distance.
        #[arg(long, value_enum, default_value_t = ModeArg::Safest)]
        mode: ModeArg,
        /// Search algorithm.
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Dijkstra)]
        algorithm: AlgorithmArg,
        /// Node id or label the route must not pass through (repeatable).
        #[arg(long)]
        avoid: Vec<String>,
        /// Append safety advice for the computed route.
        #[arg(long)]
        advice: bool,
    },
    /// List the nodes of the dataset.
    Nodes,
    /// List the danger zones of the dataset.
    Zones,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let dataset = cli.dataset.as_deref();

    match cli.command {
        Command::Route {
            from,
            to,
            mode,
            algorithm,
            avoid,
            advice,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                mode,
                algorithm,
                avoid,
                advice,
            };
            handle_route_command(dataset, cli.format, &args)
        }
        Command::Nodes => handle_nodes_command(dataset, cli.format),
        Command::Zones => handle_zones_command(dataset, cli.format),
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
