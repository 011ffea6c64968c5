mod commands;
mod errors;

use clap::{Parser, Subcommand};
use mapbuilder_config::{BuilderConfig, ConfigError};
use std::path::PathBuf;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "mapbuilder", version, about = "Read and write map builder configuration documents")]
struct Cli {
    /// Configuration file, instead of MAPBUILDER_CONFIG or ./config/default.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a JSON document and write it back with the JSON writer.
    Json {
        path: PathBuf,
        /// Indent nested objects and arrays.
        #[arg(long)]
        pretty: bool,
    },
    /// Write a `Map.Layers` XAML document from a JSON list of layers.
    Layers { path: PathBuf },
    /// Read a `Map.Layers` XAML document and print the layers as JSON.
    ReadLayers { path: PathBuf },
    /// Load a ToolPanels document and save it again.
    Toolpanels { path: PathBuf },
    /// Print the popup DataTemplate generated from a web map popupInfo.
    Popup {
        path: PathBuf,
        /// JSON list of the layer's field descriptions.
        #[arg(long)]
        fields: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let (config, config_error) = match BuilderConfig::discover(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (BuilderConfig::default(), Some(err)),
    };
    init_logging(&config);
    if let Some(err) = config_error {
        match &err {
            ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                warn!(path = %path.display(), error = %err, "failed to load configuration, using defaults");
            }
            ConfigError::Context { .. } => {
                warn!(error = %err, "failed to load configuration, using defaults");
            }
        }
    }

    let result = match cli.command {
        Commands::Json { path, pretty } => commands::json(&path, pretty, &config),
        Commands::Layers { path } => commands::layers(&path, &config),
        Commands::ReadLayers { path } => commands::read_layers(&path, &config),
        Commands::Toolpanels { path } => commands::toolpanels(&path, &config),
        Commands::Popup { path, fields } => commands::popup(&path, fields.as_deref(), &config),
    };

    if let Err(err) = result {
        error!(error = %err, "command failed");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &BuilderConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
