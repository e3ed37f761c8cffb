use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Every route here relies on `auth_middleware` being layered above this router, which
/// attaches the caller's `AuthUser` before any handler runs.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /auth/me
        .route("/auth/me", get(handlers::get_me))
        // GET/POST /todos
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        // GET/PATCH /todos/{id}
        .route(
            "/todos/{id}",
            get(handlers::get_todo).patch(handlers::update_todo),
        )
}
