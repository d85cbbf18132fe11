//! Serve command handler
//!
//! Builds the one shared `GeoClient` and exposes it over HTTP until the
//! process is stopped.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::Result;
use crate::server::{self, state::AppState};
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Command-line host and port win over the config file
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    init_logging("info");

    let mut config = Config::load()?;
    args.apply(&mut config);
    let addr = config.server_addr();

    info!(
        nominatim = %config.services.nominatim_url,
        osrm = %config.services.osrm_url,
        min_interval_ms = config.search.min_interval_ms,
        "mob-acesso v{} using upstreams",
        env!("CARGO_PKG_VERSION")
    );

    let state = Arc::new(AppState::new(config)?);
    server::serve(&addr, state).await
}
