use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a token. `/auth/refresh` reads a bearer token itself,
/// but a refresh token, which the authentication guard would reject.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/signup
        .route("/auth/signup", post(handlers::signup))
        // POST /auth/login
        // Returns the user view plus an access token and a refresh token.
        .route("/auth/login", post(handlers::login))
        // POST /auth/refresh
        // Header: Authorization: Bearer <refreshToken>
        .route("/auth/refresh", post(handlers::refresh))
}
