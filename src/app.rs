/*
 * Responsibility
 * - Load Config → build dependencies → assemble the Router
 * - Apply middleware (security headers / CORS / request id, tracing, limits)
 * - Serve with axum::serve() until Ctrl-C
 */
use std::{panic, process, time::Duration};

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::services::auth::{AuthGuard, build_auth_guard};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,casting_api=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        issuer = %config.auth.issuer,
        audience = %config.auth.audience,
        jwks_url = %config.auth.jwks_url,
        "starting casting API"
    );

    let state = build_state(&config)?;
    warm_signing_keys(&state.auth).await;

    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "server error");
            AppError::Internal
        })?;

    tracing::debug!("server terminated");
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, AppError> {
    // Lazy: the pool connects on first use, so /health and auth rejections
    // work while the database is still coming up.
    let db = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&config.database_url)
        .map_err(|_| ConfigError::Invalid("DATABASE_URL"))?;

    let auth = build_auth_guard(&config.auth)?;

    Ok(AppState::new(db, auth))
}

// A failed warm-up is not fatal: the cache fetches again on the first request.
async fn warm_signing_keys(auth: &AuthGuard) {
    match auth.verifier().keys().refresh().await {
        Ok(()) => tracing::info!("signing keys loaded"),
        Err(err) => tracing::warn!(error = %err, "signing keys not loaded at startup"),
    }
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .merge(api::v1::routes())
        .fallback(|| async { AppError::not_found("route") })
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("ctrl-c received, shutting down");
}
