use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Admin Router Module
///
/// Nested under `/admin`. `create_router` wraps it in the authentication guard and then
/// the role guard with `RoleRequirement::admin()`, in that order.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/users
        // Lists every account without passwords.
        .route("/users", get(handlers::list_users))
        // DELETE /admin/todos/{id}
        .route("/todos/{id}", delete(handlers::delete_todo))
}
