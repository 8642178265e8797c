use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vet_clinic_api::api::openapi;
use vet_clinic_api::config::{AppConfig, StoreBackend};
use vet_clinic_api::database::{MemoryStore, MongoStore, Store};
use vet_clinic_api::routes;
use vet_clinic_api::state::AppState;

/// Veterinary clinic REST API
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Store backend: mongo or memory (overrides STORE_BACKEND)
    #[arg(long)]
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up MONGODB_URI, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(store) = args.store {
        config.database.backend = store;
    }
    tracing::info!("Starting Veterinaria API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set in {:?} mode", config.environment);
    }

    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Mongo => Arc::new(
            MongoStore::init(&config.database)
                .await
                .context("failed to connect to MongoDB")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let docs = openapi::build(&config.docs)
        .with_context(|| format!("invalid DOCS_SERVER_URL '{}'", config.docs.server_url))?;

    let bind_addr = config.bind_addr();
    let app = routes::app(AppState::new(store, config, docs));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Veterinaria API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
