use anyhow::Context;
use clap::{Args, ValueEnum};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::database::{MemoryStore, PgStore, Store};
use crate::routes;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, value_enum, default_value_t = StoreKind::Postgres, help = "Backing store")]
    pub store: StoreKind,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config.validate().context("invalid configuration")?;
    info!("Starting {} in {:?} mode", config.api.project_name, config.environment);

    let mut pg_store = None;
    let store: Arc<dyn Store> = match args.store {
        StoreKind::Postgres => {
            let pg = PgStore::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            pg_store = Some(pg.clone());
            Arc::new(pg)
        }
        StoreKind::Memory => {
            info!("Using in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, store).context("invalid security configuration")?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg_store {
        pg.close().await;
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
