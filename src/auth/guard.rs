use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    auth::token::{TokenService, TokenServiceState, TokenType},
    error::{AppError, AppResult},
    models::{Role, User, UserId},
    repository::{UserRepository, UserRepositoryState},
};

/// AuthUser
///
/// The identity resolved by the authentication guard. It lives in the request
/// extensions for the duration of one request and is what the role guard reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// bearer_token
///
/// Pulls the token out of `Authorization: Bearer <token>`. An absent header, a non-ASCII
/// value, a different scheme or an empty token are all `MissingToken`.
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)
}

/// authenticate
///
/// The full guard decision, independent of any framework type:
/// 1. bearer token present, else `MissingToken`;
/// 2. token verifies, else `InvalidToken` (expired and malformed are not told apart);
/// 3. token is an access token, else `WrongTokenType`;
/// 4. subject still resolves in the store, else `UserNotFound`.
pub async fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    users: &dyn UserRepository,
) -> AppResult<AuthUser> {
    let token = bearer_token(headers)?;

    let claims = tokens.verify(token).map_err(|_| AppError::InvalidToken)?;
    if claims.token_type != TokenType::Access {
        return Err(AppError::WrongTokenType);
    }
    let user_id = claims.user_id().map_err(|_| AppError::InvalidToken)?;

    let user = users
        .find_by_id(user_id)
        .await
        .ok_or(AppError::UserNotFound)?;

    Ok(AuthUser::from(user))
}

/// AuthUser Extractor Implementation
///
/// Handlers take `AuthUser` as an argument. If `auth_middleware` already resolved the
/// identity for this request it is reused; otherwise the guard runs here.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    UserRepositoryState: FromRef<S>,
    TokenServiceState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let users = UserRepositoryState::from_ref(state);
        let tokens = TokenServiceState::from_ref(state);

        let user = authenticate(&parts.headers, &tokens, users.as_ref()).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// auth_middleware
///
/// Route layer enforcing authentication. On success the identity is attached to the
/// request extensions and the inner service runs; on failure the request is rejected
/// and the handler is never invoked.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &state.tokens, state.users.as_ref()).await?;
    tracing::debug!(user_id = user.id, role = %user.role, "request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
