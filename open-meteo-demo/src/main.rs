//! Demonstration binary for `open-meteo-core`.
//!
//! Looks up a place, fetches its forecast and prints a short summary. Log
//! verbosity follows `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

mod demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    demo::run("Enschede").await
}
