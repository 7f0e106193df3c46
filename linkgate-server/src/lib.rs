//! Linkgate Server - HTTP surface of the gateway
//!
//! Routes, session cookies, static assets and request logging on top of
//! `linkgate_core::GatewayContext`.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use linkgate_core::GatewayContext;

use session::SessionStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<GatewayContext>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(ctx: GatewayContext) -> Self {
        Self::with_sessions(ctx, SessionStore::default())
    }

    pub fn with_sessions(ctx: GatewayContext, sessions: SessionStore) -> Self {
        Self {
            ctx: Arc::new(ctx),
            sessions,
        }
    }
}

/// Build the full application router
///
/// Static assets come from `config.public_dir`; anything that is not an API
/// route falls through to it.
pub fn build_router(state: AppState) -> Router {
    let public_dir = state.ctx.config.public_dir.clone();

    Router::new()
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .route_service("/docs/", ServeFile::new(public_dir.join("docs").join("index.html")))
        .route("/companies/{name}", get(routes::company))
        .route("/transactions", get(routes::transactions))
        .route("/get_access_token", post(routes::get_access_token))
        .route("/logout", post(routes::logout))
        .route("/config", get(routes::client_config))
        .route("/health", get(routes::health))
        .fallback_service(ServeDir::new(public_dir))
        .layer(from_fn_with_state(state.clone(), middleware::session_context))
        .layer(from_fn(middleware::request_logging))
        .with_state(state)
}
