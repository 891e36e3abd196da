//! Counsel REST API entry point.
//!
//! Binary name: `counseld`
//!
//! Parses CLI arguments, initializes the database and services, then serves
//! the HTTP API and the static front-end.

mod http;
mod state;

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;

/// Legal-advice chatbot server.
#[derive(Debug, Parser)]
#[command(name = "counseld", version, about)]
struct Cli {
    /// Data directory (database, config.toml). Defaults to ~/.counsel.
    #[arg(long, env = "COUNSEL_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Bind address override (e.g. 127.0.0.1:9000).
    #[arg(long)]
    bind: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,counsel=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let state = AppState::init(cli.data_dir).await?;

    let bind_addr = cli
        .bind
        .clone()
        .unwrap_or_else(|| state.config.bind_addr.clone());

    let router = http::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Counsel listening");

    // Connect info feeds the client-address extractor; the peer address is
    // the ownership token for conversations.
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
