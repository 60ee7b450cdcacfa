//! eln2smw: Electronic Lab Notebook to Semantic MediaWiki adapter

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eln2smw::config::{Config, DEFAULT_CONFIG_FILE};
use eln2smw::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eln2smw")]
#[command(about = "Create Semantic MediaWiki pages from Electronic Lab Notebook records")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP adapter endpoint
    Serve {
        /// Listen address (overrides http.listen_addr)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Adapt a single record and print the response
    Adapt {
        /// ELN plugin name (e.g. elabftw)
        eln: String,

        /// Record identifier inside the ELN
        id: String,
    },

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path } = &cli.command {
        return commands::init::init_config(path);
    }

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    init_logging(&config.logging, cli.verbose)?;
    if !cli.config.exists() {
        tracing::warn!(
            "Config file {} not found, using defaults",
            cli.config.display()
        );
    }

    match cli.command {
        Commands::Serve { listen } => commands::serve::serve(config, listen).await,
        Commands::Adapt { eln, id } => commands::adapt::adapt_once(config, eln, id).await,
        Commands::Init { .. } => Ok(()),
    }
}
