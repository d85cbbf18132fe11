//! Route command handler
//!
//! Each end of the route is either free text (geocoded) or a lat/lng pair.

use crate::cli::{coordinate_arg, init_logging};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::geo::{Endpoint, GeoClient};
use clap::Args;

/// Route command arguments
#[derive(Args)]
pub struct RouteArgs {
    /// Starting place (geocoded)
    #[arg(long, conflicts_with_all = ["from_lat", "from_lng"])]
    pub from: Option<String>,

    /// Starting latitude
    #[arg(long, allow_hyphen_values = true)]
    pub from_lat: Option<f64>,

    /// Starting longitude
    #[arg(long, allow_hyphen_values = true)]
    pub from_lng: Option<f64>,

    /// Destination (geocoded)
    #[arg(long, conflicts_with_all = ["to_lat", "to_lng"])]
    pub to: Option<String>,

    /// Destination latitude
    #[arg(long, allow_hyphen_values = true)]
    pub to_lat: Option<f64>,

    /// Destination longitude
    #[arg(long, allow_hyphen_values = true)]
    pub to_lng: Option<f64>,

    /// Output format (json, text, gpx)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Pick the text or coordinate form of one endpoint
fn endpoint(name: &str, text: Option<String>, lat: Option<f64>, lng: Option<f64>) -> Result<Endpoint> {
    if let Some(text) = text {
        return Ok(Endpoint::Query(text));
    }
    coordinate_arg(lat, lng)?
        .map(Endpoint::At)
        .ok_or_else(|| {
            Error::Config(format!(
                "No {0} given. Use --{0} or --{0}-lat/--{0}-lng",
                name
            ))
        })
}

/// Run the route command
pub async fn run(args: RouteArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let from = endpoint("from", args.from, args.from_lat, args.from_lng)?;
    let to = endpoint("to", args.to, args.to_lat, args.to_lng)?;
    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let client = GeoClient::new(&config)?;
    let route = client.plan_route(from, to, None).await?;

    print!("{}", formatter.format_route(&route)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;

    #[test]
    fn test_endpoint_prefers_text() {
        let parsed = endpoint("from", Some("Sé".to_string()), None, None).unwrap();
        assert_eq!(parsed, Endpoint::Query("Sé".to_string()));
    }

    #[test]
    fn test_endpoint_from_coordinates() {
        let parsed = endpoint("to", None, Some(-23.5), Some(-46.6)).unwrap();
        assert_eq!(parsed, Endpoint::At(Coordinate::new(-23.5, -46.6)));
    }

    #[test]
    fn test_endpoint_missing() {
        let err = endpoint("to", None, None, None).unwrap_err();
        assert!(err.to_string().contains("--to-lat"));
    }
}
