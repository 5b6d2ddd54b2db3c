use clap::Parser; // for cli
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lead_intake::config::Args;
use lead_intake::rate_limit::{RateLimiter, sweeper};
use lead_intake::{AppState, app};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // parse cli arguments
    let args = Args::parse();

    // one limiter for the whole process
    let limiter = Arc::new(RateLimiter::new(args.rate_limit, args.rate_window()));
    let state = Arc::new(AppState::new(Arc::clone(&limiter)));

    match args.sweep_every() {
        Some(every) => {
            tokio::spawn(sweeper(limiter, every));
        }
        None => info!("rate limit sweeper disabled, records are kept for the process lifetime"),
    }

    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        addr = %addr,
        rate_limit = args.rate_limit,
        rate_window_ms = args.rate_window_ms,
        sweep_interval_secs = args.sweep_interval,
        "lead intake listening"
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
