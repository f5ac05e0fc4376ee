//! glyphweave CLI
//!
//! Developer tool for generating and bundling icon component packages.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// glyphweave - bucketed React icon package generator
#[derive(Parser)]
#[command(name = "glyphweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "glyphweave.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new glyphweave project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Package name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate configuration and icon metadata without generating
    Validate,

    /// Write the generated sources without bundling
    Emit {
        /// Output directory (defaults to <output>/.generated)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Generate and bundle the package
    Build {
        /// Write untranspiled sources instead of running the bundler
        #[arg(long)]
        passthrough: bool,

        /// Rebuild even if the output is up to date
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config).await?;
        }
        Commands::Emit { out } => {
            commands::emit::run(&cli.config, out.as_deref()).await?;
        }
        Commands::Build { passthrough, force } => {
            commands::build::run(&cli.config, passthrough, force).await?;
        }
    }

    Ok(())
}
