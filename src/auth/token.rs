//! Token Service.
//!
//! Issues and verifies HS256-signed JWTs carrying `{sub, email, type, iat, exp, jti}`.
//! Stateless: the only input besides the token is the process-wide signing secret,
//! fixed at construction.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{AppConfig, ConfigError};
use crate::models::UserId;

/// Which class of credential a token is. The two classes are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims
///
/// Payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id, as a decimal string.
    pub sub: String,
    pub email: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expires at, seconds since the epoch.
    pub exp: i64,
    /// Unique per token, so two tokens minted in the same second still differ.
    pub jti: String,
}

impl Claims {
    /// Parses the subject back into a user id. A non-numeric subject is a malformed token.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed structure or undecodable claims.
    #[error("token is invalid")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("token type does not match the expected type")]
    WrongType,

    #[error("token could not be encoded: {0}")]
    Encoding(String),
}

pub type TokenServiceState = Arc<TokenService>;

/// TokenService
///
/// Holds the encoding/decoding keys derived from the signing secret and the TTL per
/// token type. The secret is never rotated for the lifetime of the instance.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Fails with `ConfigError::Missing` if the secret is empty.
    pub fn new(
        secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No grace period, and a token is already expired in the second of its `exp`.
        validation.leeway = 0;
        validation.reject_tokens_expiring_in_less_than = 1;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.jwt_secret,
            config.access_token_ttl,
            config.refresh_token_ttl,
        )
    }

    pub fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    /// issue
    ///
    /// Signs a new token for `(user_id, email)` of the given type, expiring after the TTL
    /// configured for that type. A TTL that overflows the calendar is an `Encoding` error.
    pub fn issue(
        &self,
        user_id: UserId,
        email: &str,
        token_type: TokenType,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl(token_type)).ok_or_else(|| {
            TokenError::Encoding(format!("{token_type} token expiry out of range"))
        })?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// verify
    ///
    /// Checks signature, structure and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        Ok(data.claims)
    }

    /// verify_kind
    ///
    /// `verify`, plus a check that the token is of the `expected` class.
    pub fn verify_kind(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongType);
        }
        Ok(claims)
    }
}
