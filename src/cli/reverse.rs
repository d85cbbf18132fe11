//! Reverse command handler

use crate::cli::init_logging;
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::geo::GeoClient;
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let at = Coordinate::new(args.lat, args.lng);
    at.validate()?;

    let client = GeoClient::new(&config)?;
    println!("{}", client.reverse_geocode(at).await);
    Ok(())
}
