mod config;
mod errors;
mod generation;
mod imagen_client;
mod models;
mod placeholder;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::imagen_client::ImagenClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GenVoid v{}", env!("CARGO_PKG_VERSION"));

    // Initialize image generation client
    let imagen = ImagenClient::new(
        config.gemini_api_key.clone(),
        &config.imagen_api_base,
        &config.imagen_model,
    )?;
    info!("Imagen client initialized (endpoint: {})", imagen.endpoint());

    let state = AppState::new(config.clone(), Arc::new(imagen));
    state.spawn_session_sweeper(config.session_ttl);
    info!("Idle sessions expire after {}s", config.session_ttl.as_secs());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
