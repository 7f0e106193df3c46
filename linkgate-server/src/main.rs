//! Linkgate - banking-data gateway server

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkgate_core::config::Config;
use linkgate_core::GatewayContext;
use linkgate_server::session::SessionStore;
use linkgate_server::{build_router, AppState};

/// Linkgate - session-gated proxy in front of Plaid
#[derive(Parser)]
#[command(name = "linkgate", version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "LINKGATE_BIND", default_value = "127.0.0.1:4567")]
    bind: SocketAddr,

    /// Frontend build folder (overrides PUBLIC_DIR)
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Minutes of inactivity after which a session expires
    #[arg(long, env = "LINKGATE_SESSION_TTL_MINUTES", default_value_t = 720)]
    session_ttl_minutes: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linkgate=info,linkgate_core=info,linkgate_server=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(dir) = cli.public_dir {
        config.public_dir = dir;
    }

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "Credentials not set; provider calls will fail");
    }
    if !config.public_dir.is_dir() {
        tracing::warn!(public_dir = %config.public_dir.display(), "Public folder not found");
    }

    tracing::info!(
        plaid_env = config.plaid.environment.as_str(),
        plaid_url = %config.plaid.base_url,
        public_dir = %config.public_dir.display(),
        "Starting linkgate"
    );

    let ctx = GatewayContext::new(config).context("failed to build gateway context")?;
    let sessions = SessionStore::new(Duration::from_secs(cli.session_ttl_minutes.max(1) * 60));
    let reaper = sessions.spawn_reaper(Duration::from_secs(60));
    tracing::info!(ttl_secs = sessions.ttl().as_secs(), "Session store ready");
    let app = build_router(AppState::with_sessions(ctx, sessions));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    reaper.abort();
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
