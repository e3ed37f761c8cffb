//! Authentication Service.
//!
//! Signup, login and refresh flows on top of the user store and the token service.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::token::{TokenServiceState, TokenType};
use crate::error::{AppError, AppResult};
use crate::models::{
    LoginRequest, LoginResponse, NewUser, RefreshResponse, SignupRequest, UserView,
};
use crate::repository::UserRepositoryState;

pub type AuthServiceState = Arc<AuthService>;

pub struct AuthService {
    users: UserRepositoryState,
    tokens: TokenServiceState,
    // Serializes the email check and the insert of concurrent signups.
    signup_lock: Mutex<()>,
}

impl AuthService {
    pub fn new(users: UserRepositoryState, tokens: TokenServiceState) -> Self {
        Self {
            users,
            tokens,
            signup_lock: Mutex::new(()),
        }
    }

    /// signup
    ///
    /// Creates a `user`-role account. Fails with `DuplicateEmail` if the email is taken
    /// (exact match). No token is issued.
    pub async fn signup(&self, req: SignupRequest) -> AppResult<UserView> {
        let _guard = self.signup_lock.lock().await;

        if self.users.find_by_email(&req.email).await.is_some() {
            tracing::debug!("signup rejected, email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let user = self
            .users
            .create(NewUser {
                email: req.email,
                password: req.password,
                name: req.name,
            })
            .await;

        tracing::info!(user_id = user.id, "user signed up");
        Ok(UserView::from(user))
    }

    /// login
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await
            .ok_or(AppError::InvalidCredentials)?;

        // Stored passwords are plaintext, see `User`.
        if user.password != req.password {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(user.id, &user.email, TokenType::Access)?;
        let refresh_token = self.tokens.issue(user.id, &user.email, TokenType::Refresh)?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok(LoginResponse {
            user: UserView::from(user),
            access_token,
            refresh_token,
        })
    }

    /// refresh
    ///
    /// Exchanges a refresh token for a new access token. Any verification failure,
    /// including an access token presented here, is `InvalidToken`. The refresh token
    /// itself is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshResponse> {
        let claims = self
            .tokens
            .verify_kind(refresh_token, TokenType::Refresh)
            .map_err(|_| AppError::InvalidToken)?;
        let user_id = claims.user_id().map_err(|_| AppError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .ok_or(AppError::UserNotFound)?;

        let access_token = self.tokens.issue(user.id, &user.email, TokenType::Access)?;

        tracing::info!(user_id = user.id, "access token refreshed");
        Ok(RefreshResponse { access_token })
    }
}
