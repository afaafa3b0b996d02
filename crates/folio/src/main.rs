//! Folio CLI - personal portfolio and blog site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Personal portfolio and blog site generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a config file and sample content
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Serve the site, reloading content on change
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,

        /// Do not watch content for changes
        #[arg(long)]
        no_watch: bool,
    },

    /// Freeze the site into static files
    Freeze {
        /// Output directory (defaults to config or "build")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview a frozen site
    Preview {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "build")]
        dir: PathBuf,
    },

    /// Check that every image in a directory has an aspect ratio
    CheckAspectRatio {
        /// Directory containing the images
        #[arg(long)]
        directory: PathBuf,

        /// Target aspect ratio, e.g. "16:9" or "1:1"
        #[arg(long)]
        aspect_ratio: String,
    },

    /// Check a version bump and export NEEDS_UPDATE
    CheckVersion {
        /// Version on the current branch
        #[arg(long)]
        version_current: String,

        /// Version on the main branch
        #[arg(long)]
        version_main: String,

        /// Project kind, for logging
        #[arg(long, default_value = "dbt")]
        project: String,
    },

    /// Export the package version as VERSION_<NAME>
    ExportVersion {
        /// Name appended to the exported variable
        #[arg(long)]
        name: String,

        /// package.json to read the version from
        #[arg(long, default_value = "package.json")]
        package: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Serve {
            port,
            no_open,
            no_watch,
        } => {
            commands::serve::run(&cli.config, port, !no_open, !no_watch).await?;
        }
        Commands::Freeze { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::freeze::run(&cli.config, output, minify).await?;
        }
        Commands::Preview { port, dir } => {
            commands::preview::run(port, dir).await?;
        }
        Commands::CheckAspectRatio {
            directory,
            aspect_ratio,
        } => {
            commands::ci::check_aspect_ratio(&directory, &aspect_ratio)?;
        }
        Commands::CheckVersion {
            version_current,
            version_main,
            project,
        } => {
            commands::ci::check_version(&version_current, &version_main, &project)?;
        }
        Commands::ExportVersion { name, package } => {
            commands::ci::export_version(&name, &package)?;
        }
    }

    Ok(())
}
