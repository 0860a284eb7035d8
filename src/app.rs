/*
 * Responsibility
 * - Tracing + panic hook setup
 * - Config loading → public key / verifier construction (fatal on failure) → Router assembly
 * - Middleware wiring (access token, CORS, HTTP plumbing)
 * - axum::serve() with connect info and graceful shutdown
 */
use std::net::SocketAddr;
use std::panic;

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{KeyLoadError, build_token_verifier};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,ketchapp=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing; stderr may be hidden depending on how we are launched.
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env().context("invalid configuration")?;

    tracing::info!(
        "starting ketchapp API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    // Without the public key no request can be authenticated: refuse to start.
    let state = build_state(&config).context("failed to load access token public key")?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, KeyLoadError> {
    // Process-level services are built once here and injected into the shared state.
    let auth = build_token_verifier(config)?;
    Ok(AppState::new(auth))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let api = middleware::auth::access::apply(api::routes(), state.clone());

    let router = Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
