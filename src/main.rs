//! sketchsave - local persistence server for a browser-based drawing tool

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sketchsave::config::Config;
use sketchsave::store::DrawingStore;

#[derive(Parser)]
#[command(name = "sketchsave")]
#[command(about = "Local persistence server for a browser-based drawing tool")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Static root; parent of the data directory (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Data directory, relative to the root
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// List saved drawings
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("sketchsave={},tower_http={}", log_level, log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(root) = cli.root {
        config.root = root;
    }

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        data_dir: None,
    }) {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }

            let config = config.resolve_root()?;
            sketchsave::server::run(config).await?;
        }

        Commands::List => {
            let config = config.resolve_root()?;
            let store = DrawingStore::new(config.data_path());
            let files = store.list().await?;

            if files.is_empty() {
                println!("No drawings found in {}", config.data_path().display());
            } else {
                for file in files {
                    println!("• {} ({} bytes)", file.filename, file.size);
                }
            }
        }
    }

    Ok(())
}
