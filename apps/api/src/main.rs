mod accounts;
mod ats;
mod catalog;
mod config;
mod db;
mod errors;
mod identity_client;
mod models;
mod routes;
mod state;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::store::PgProfileStore;
use crate::ats::extract::DocumentExtractor;
use crate::config::Config;
use crate::db::create_pool;
use crate::identity_client::IdentityClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerHub API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (profile documents + catalog)
    let db = create_pool(&config.database_url).await?;

    // Initialize identity platform client
    let identity = IdentityClient::new(
        config.identity_api_key.clone(),
        config.identity_base_url.clone(),
    )
    .context("failed to build identity client")?;
    info!("Identity client initialized ({})", config.identity_base_url);

    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        identity: Arc::new(identity),
        profiles: Arc::new(PgProfileStore::new(db)),
        extractor: Arc::new(DocumentExtractor),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive unless `ALLOWED_ORIGINS` lists explicit origins.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
