use crate::{
    AppState,
    auth::{AuthUser, bearer_token},
    error::{AppError, AppResult, ErrorBody},
    models::{
        CreateTodoRequest, DeleteResponse, LoginRequest, LoginResponse, RefreshResponse,
        SignupRequest, Todo, TodoId, UpdateTodoRequest, UserView,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

// --- Auth ---

/// signup
///
/// [Public Route] Registers a new `user`-role account. The response never carries the
/// password, and no token is issued; the client logs in afterwards.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Registered", body = UserView),
        (status = 400, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let user = state.auth.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// login
///
/// [Public Route] Exchanges email and password for an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(state.auth.login(payload).await?))
}

/// refresh
///
/// [Public Route] The refresh token travels in `Authorization: Bearer <refreshToken>`.
/// Returns a new access token only.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Missing, invalid or non-refresh token", body = ErrorBody)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<RefreshResponse>> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.auth.refresh(token).await?))
}

/// get_me
///
/// [Authenticated Route] The caller's own account, password stripped.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses((status = 200, description = "Current user", body = UserView))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserView>> {
    let user = state
        .users
        .find_by_id(id)
        .await
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(UserView::from(user)))
}

// --- Todos ---

#[utoipa::path(
    get,
    path = "/todos",
    responses((status = 200, description = "All todos", body = [Todo]))
)]
pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.todos.find_all().await)
}

#[utoipa::path(
    get,
    path = "/todos/{id}",
    params(("id" = u64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Found", body = Todo),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> AppResult<Json<Todo>> {
    state
        .todos
        .find_one(id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// create_todo
///
/// [Authenticated Route] New todos always start out not completed.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = CreateTodoRequest,
    responses((status = 201, description = "Created", body = Todo))
)]
pub async fn create_todo(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTodoRequest>,
) -> (StatusCode, Json<Todo>) {
    let todo = state.todos.create(payload).await;
    tracing::info!(user_id, todo_id = todo.id, "todo created");
    (StatusCode::CREATED, Json(todo))
}

/// update_todo
///
/// [Authenticated Route] Partial update: only the fields present in the body change.
#[utoipa::path(
    patch,
    path = "/todos/{id}",
    params(("id" = u64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated", body = Todo),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    Json(payload): Json<UpdateTodoRequest>,
) -> AppResult<Json<Todo>> {
    state
        .todos
        .update(id, payload)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

// --- Admin ---

/// list_users
///
/// [Admin Route] Every account, passwords stripped.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserView]),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserView>> {
    let users = state.users.find_all().await;
    Json(users.into_iter().map(UserView::from).collect())
}

/// delete_todo
///
/// [Admin Route] Removes a todo by id.
#[utoipa::path(
    delete,
    path = "/admin/todos/{id}",
    params(("id" = u64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_todo(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> AppResult<Json<DeleteResponse>> {
    if !state.todos.remove(id).await {
        return Err(AppError::NotFound);
    }
    tracing::info!(user_id, todo_id = id, "todo deleted");
    Ok(Json(DeleteResponse { deleted: true }))
}
