//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod reverse;
pub mod route;
pub mod search;
pub mod serve;

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Accessible transit geocoding and routing
#[derive(Parser)]
#[command(name = "mob-acesso")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a place by name or address
    Search(search::SearchArgs),

    /// Look up the address of a coordinate
    Reverse(reverse::ReverseArgs),

    /// Plan a route between two places
    Route(route::RouteArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Route(args) => route::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging, honouring RUST_LOG over `default_level`
pub(crate) fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Combine optional --lat/--lng flags into a validated coordinate
pub(crate) fn coordinate_arg(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinate>> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let at = Coordinate::new(lat, lng);
            at.validate()?;
            Ok(Some(at))
        }
        (None, None) => Ok(None),
        _ => Err(Error::InvalidCoordinates(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}
