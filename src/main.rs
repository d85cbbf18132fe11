//! mob-acesso CLI entry point
//!
//! Geocoding and routing client - CLI + web API

use mob_acesso::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
