use axum::{Json, Router, extract::FromRef, http::HeaderName, middleware, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

pub mod routes;
use routes::{admin, authenticated, public};

use auth::{
    AuthService, AuthServiceState, RoleRequirement, TokenService, TokenServiceState,
    auth_middleware, role_guard,
};
use config::{BootstrapAdmin, ConfigError};
use models::{NewUser, Role, UserView};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::{
    InMemoryTodoRepository, InMemoryUserRepository, TodoRepositoryState, UserRepositoryState,
};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and `ToSchema` models.
/// Served as JSON at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::signup, handlers::login, handlers::refresh, handlers::get_me,
        handlers::list_todos, handlers::get_todo, handlers::create_todo,
        handlers::update_todo, handlers::list_users, handlers::delete_todo
    ),
    components(
        schemas(
            models::Role, models::UserView, models::SignupRequest, models::LoginRequest,
            models::LoginResponse, models::RefreshResponse, models::Todo,
            models::CreateTodoRequest, models::UpdateTodoRequest, models::DeleteResponse,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "todo-api", description = "Todo API with token-based authentication")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Single shared container for the stores, the token service, the auth service and the
/// configuration. Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepositoryState,
    pub todos: TodoRepositoryState,
    pub tokens: TokenServiceState,
    pub auth: AuthServiceState,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the token and auth services on top of the given stores.
    /// Fails if the configuration carries no signing secret.
    pub fn new(
        config: AppConfig,
        users: UserRepositoryState,
        todos: TodoRepositoryState,
    ) -> Result<Self, ConfigError> {
        let tokens: TokenServiceState = Arc::new(TokenService::from_config(&config)?);
        let auth = Arc::new(AuthService::new(users.clone(), tokens.clone()));
        Ok(Self {
            users,
            todos,
            tokens,
            auth,
            config,
        })
    }

    /// State backed by fresh in-memory stores.
    pub fn in_memory(config: AppConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTodoRepository::new()),
        )
    }

    /// seed_admin
    ///
    /// Ensures an admin account exists for the given email. An existing account is
    /// promoted; otherwise one is created and then promoted.
    pub async fn seed_admin(&self, admin: &BootstrapAdmin) -> UserView {
        let mut user = match self.users.find_by_email(&admin.email).await {
            Some(user) => user,
            None => {
                self.users
                    .create(NewUser {
                        email: admin.email.clone(),
                        password: admin.password.clone(),
                        name: admin.name.clone(),
                    })
                    .await
            }
        };
        user.role = Role::Admin;
        let user = self.users.update(user.clone()).await.unwrap_or(user);
        tracing::info!(user_id = user.id, "bootstrap admin ready");
        UserView::from(user)
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for UserRepositoryState {
    fn from_ref(app_state: &AppState) -> UserRepositoryState {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for TodoRepositoryState {
    fn from_ref(app_state: &AppState) -> TodoRepositoryState {
        app_state.todos.clone()
    }
}

impl FromRef<AppState> for TokenServiceState {
    fn from_ref(app_state: &AppState) -> TokenServiceState {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// create_router
///
/// Assembles the routing tree and attaches the guard chain per module:
/// public routes get none, authenticated routes get the authentication guard, admin
/// routes get the authentication guard followed by the `{admin}` role guard.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // The last route_layer added runs first, so authentication precedes the role check.
    let admin_router = admin::admin_routes()
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::admin(),
            role_guard,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let base_router = Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest("/admin", admin_router)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, carrying method, uri and the `x-request-id` so all log lines
/// of one request correlate. The Authorization header is never recorded.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
