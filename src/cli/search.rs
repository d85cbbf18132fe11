//! Search command handler

use crate::cli::{coordinate_arg, init_logging};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::geo::GeoClient;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name or address
    pub query: String,

    /// Latitude to rank results around
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to rank results around
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Output format (json, text, gpx)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let reference = coordinate_arg(args.lat, args.lng)?;
    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let client = GeoClient::new(&config)?;
    let results = client.search(&args.query, reference).await?;

    print!("{}", formatter.format_search(&args.query, &results)?);
    Ok(())
}
