use crate::{AppState, handlers};
use axum::{Router, routing::{get, post}};

/// Public Router Module
///
/// Endpoints reachable by any client, credential or not: the health probe
/// used by monitoring, and the session gateway (login/logout).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Returns "ok" immediately to verify the service is running.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/login
        // Exchanges credentials for a signed bearer token and starts a session.
        .route("/api/auth/login", post(handlers::login))
        // POST /api/auth/logout
        // Marks the submitted token's session inactive.
        .route("/api/auth/logout", post(handlers::logout))
}
