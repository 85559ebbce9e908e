use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskfeed_api::auth::{CredentialHasher, TokenIssuer};
use taskfeed_api::config::config;
use taskfeed_api::database::{DocumentStore, MemoryStore, PgStore};
use taskfeed_api::{app, is_development, AppState};

#[derive(Debug, Parser)]
#[command(name = "taskfeed-api", version, about = "Taskfeed API server")]
struct Args {
    /// Port to listen on (overrides TASKFEED_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let default_filter = if is_development!() { "info,taskfeed_api=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let args = Args::parse();
    let config = config();
    info!("Starting Taskfeed API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = if args.in_memory {
        warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let url = config
            .database
            .url
            .as_deref()
            .context("DATABASE_URL is not set (use --in-memory to run without PostgreSQL)")?;
        Arc::new(PgStore::connect(url, &config.database).await?)
    };

    let tokens = TokenIssuer::from_config(&config.security).context("JWT_SECRET must be set")?;
    let state = AppState::new(store, tokens, CredentialHasher::new(config.security.bcrypt_cost));

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Taskfeed API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
