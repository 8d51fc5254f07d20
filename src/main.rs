mod app;
mod colors;
mod config;
mod coords;
mod error;
mod flow;
mod geo;
mod help;
mod logging;
mod map;
mod render;
mod settings;
mod source;
mod terminal;

use clap::{Args, Parser, Subcommand};
use config::{FlowMapConfig, Overrides, RenderMode, SourceKind};
use error::FlowError;
use settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "flowmap")]
#[command(version)]
#[command(about = "Terminal world map of country-to-country event flows", long_about = None)]
struct Cli {
    /// Settings file (default: <config dir>/flowmap/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the events endpoint and redraw weighted flow lines each cycle
    Live {
        #[command(flatten)]
        source: SourceArgs,

        /// Frame delay in seconds
        #[arg(short, long, default_value = "0.05")]
        time: f32,
    },

    /// Spawn animated arcs for every flow on a short cadence
    Animate {
        #[command(flatten)]
        source: SourceArgs,

        /// Frame delay in seconds
        #[arg(short, long, default_value = "0.03")]
        time: f32,
    },

    /// Run one cycle and print the map view and GeoJSON source to stdout
    Geojson {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Flow source: remote, radar, synthetic
    #[arg(short = 'S', long)]
    source: Option<String>,

    /// Events endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Time window sent as ?dateRange= (e.g. 1h, 7d)
    #[arg(short, long)]
    date_range: Option<String>,

    /// Do not send a dateRange parameter
    #[arg(long, conflicts_with = "date_range")]
    no_date_range: bool,

    /// Refresh interval in seconds
    #[arg(short, long)]
    interval: Option<f64>,

    /// Bulk country coordinates URL ([{cca2, latlng}])
    #[arg(long)]
    coords_url: Option<String>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

impl SourceArgs {
    fn into_overrides(self, frame_time: Option<f32>) -> Result<Overrides, FlowError> {
        let source = match self.source {
            Some(name) => Some(SourceKind::parse(&name).ok_or_else(|| FlowError::Config {
                message: format!("unknown source '{}' (available: remote, radar, synthetic)", name),
            })?),
            None => None,
        };

        Ok(Overrides {
            source,
            endpoint: self.endpoint,
            date_range: self.date_range,
            no_date_range: self.no_date_range,
            interval: self.interval,
            coords_url: self.coords_url,
            seed: self.seed,
            frame_time,
        })
    }
}

fn run(cli: Cli) -> Result<(), FlowError> {
    let (mode, args, frame_time) = match cli.command {
        Commands::Live { source, time } => (RenderMode::Declarative, source, Some(time)),
        Commands::Animate { source, time } => (RenderMode::Animated, source, Some(time)),
        Commands::Geojson { source } => {
            logging::init_stderr_logger(cli.verbose);
            let settings = Settings::load(cli.config.as_deref());
            let config = FlowMapConfig::resolve(RenderMode::Declarative, source.into_overrides(None)?, settings)?;
            let doc = app::snapshot(&config)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
            return Ok(());
        }
    };

    let log_path = logging::init_file_logger(cli.verbose)?;
    tracing::info!(path = %log_path.display(), "flowmap starting");

    let settings = Settings::load(cli.config.as_deref());
    let config = FlowMapConfig::resolve(mode, args.into_overrides(frame_time)?, settings)?;
    let session = app::Session::from_config(&config)?;
    app::run(session, config.frame_time)?;

    tracing::info!("flowmap stopped");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("flowmap: {}", e);
            ExitCode::FAILURE
        }
    }
}
