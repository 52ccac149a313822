//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: account provisioning, token codec, authenticator, ledgers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use branchdesk_auth::{CredentialStore, JwtValidator};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let owned = config.clone();
    let services = tokio::task::spawn_blocking(move || services::build_services(&owned))
        .await
        .context("service initialization panicked")??;

    Ok(router(Arc::new(services), config.diagnostics))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>, diagnostics: bool) -> Router {
    let jwt: Arc<dyn JwtValidator> = services.jwt.clone();
    let users: Arc<dyn CredentialStore> = services.users.clone();
    let auth_state = middleware::AuthState { jwt, users };

    // Protected routes: require a resolvable session token.
    let protected = routes::router(diagnostics).route_layer(
        axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/login", post(routes::session::login))
        .merge(protected)
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(axum::middleware::from_fn(middleware::cors_middleware)),
        )
}
