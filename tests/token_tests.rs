use chrono::Duration;
use jsonwebtoken::{EncodingKey, Header, encode};
use todo_api::{
    AppConfig,
    auth::{Claims, TokenError, TokenService, TokenType},
    config::ConfigError,
};

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn service() -> TokenService {
    TokenService::from_config(&AppConfig::with_secret(TEST_JWT_SECRET)).unwrap()
}

/// A service whose access tokens are already expired when issued.
fn expired_service() -> TokenService {
    TokenService::new(
        TEST_JWT_SECRET,
        Duration::seconds(-30),
        Duration::seconds(-30),
    )
    .unwrap()
}

#[test]
fn test_issue_and_verify_access_token() {
    let tokens = service();
    let token = tokens.issue(7, "alice@x.com", TokenType::Access).unwrap();

    let claims = tokens.verify(&token).unwrap();
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.user_id().unwrap(), 7);
    assert_eq!(claims.email, "alice@x.com");
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_refresh_token_has_long_ttl() {
    let tokens = service();
    let token = tokens.issue(7, "alice@x.com", TokenType::Refresh).unwrap();

    let claims = tokens.verify(&token).unwrap();
    assert_eq!(claims.token_type, TokenType::Refresh);
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
}

#[test]
fn test_tokens_issued_back_to_back_differ() {
    let tokens = service();
    let a = tokens.issue(1, "a@x.com", TokenType::Access).unwrap();
    let b = tokens.issue(1, "a@x.com", TokenType::Access).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_verify_kind_rejects_other_class() {
    let tokens = service();
    let access = tokens.issue(1, "a@x.com", TokenType::Access).unwrap();
    let refresh = tokens.issue(1, "a@x.com", TokenType::Refresh).unwrap();

    assert!(tokens.verify_kind(&access, TokenType::Access).is_ok());
    assert!(tokens.verify_kind(&refresh, TokenType::Refresh).is_ok());
    assert_eq!(
        tokens.verify_kind(&access, TokenType::Refresh),
        Err(TokenError::WrongType)
    );
    assert_eq!(
        tokens.verify_kind(&refresh, TokenType::Access),
        Err(TokenError::WrongType)
    );
}

#[test]
fn test_expired_token_is_rejected() {
    let token = expired_service()
        .issue(1, "a@x.com", TokenType::Access)
        .unwrap();

    // Signature is valid for the regular service too; only the expiry fails.
    assert_eq!(service().verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_token_expiring_this_second_is_rejected() {
    let tokens = TokenService::new(TEST_JWT_SECRET, Duration::zero(), Duration::zero()).unwrap();
    let token = tokens.issue(1, "a@x.com", TokenType::Access).unwrap();

    assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_ttl_past_calendar_range_is_error_not_panic() {
    let tokens = TokenService::new(
        TEST_JWT_SECRET,
        Duration::hours(1),
        Duration::days(1_000_000_000),
    )
    .unwrap();

    assert!(tokens.issue(1, "a@x.com", TokenType::Access).is_ok());
    assert!(matches!(
        tokens.issue(1, "a@x.com", TokenType::Refresh),
        Err(TokenError::Encoding(_))
    ));
}

#[test]
fn test_wrong_secret_is_invalid() {
    let other = TokenService::from_config(&AppConfig::with_secret("another-secret")).unwrap();
    let token = other.issue(1, "a@x.com", TokenType::Access).unwrap();

    assert_eq!(service().verify(&token), Err(TokenError::Invalid));
}

#[test]
fn test_garbage_is_invalid() {
    let tokens = service();
    assert_eq!(tokens.verify("not-a-jwt"), Err(TokenError::Invalid));
    assert_eq!(tokens.verify(""), Err(TokenError::Invalid));
    assert_eq!(tokens.verify("a.b.c"), Err(TokenError::Invalid));
}

#[test]
fn test_tampered_payload_is_invalid() {
    let tokens = service();
    let token = tokens.issue(1, "a@x.com", TokenType::Access).unwrap();
    let forged = tokens.issue(2, "b@x.com", TokenType::Access).unwrap();

    // Splice the payload of one token onto the signature of another.
    let parts: Vec<&str> = token.split('.').collect();
    let forged_parts: Vec<&str> = forged.split('.').collect();
    let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

    assert_eq!(tokens.verify(&spliced), Err(TokenError::Invalid));
}

#[test]
fn test_non_numeric_subject_is_invalid() {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "not-a-number".to_string(),
        email: "a@x.com".to_string(),
        token_type: TokenType::Access,
        iat: now,
        exp: now + 600,
        jti: "jti".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let decoded = service().verify(&token).unwrap();
    assert_eq!(decoded.user_id(), Err(TokenError::Invalid));
}

#[test]
fn test_unknown_token_type_is_invalid() {
    #[derive(serde::Serialize)]
    struct Foreign {
        sub: String,
        email: String,
        #[serde(rename = "type")]
        token_type: String,
        iat: i64,
        exp: i64,
        jti: String,
    }

    let now = chrono::Utc::now().timestamp();
    let token = encode(
        &Header::default(),
        &Foreign {
            sub: "1".to_string(),
            email: "a@x.com".to_string(),
            token_type: "session".to_string(),
            iat: now,
            exp: now + 600,
            jti: "jti".to_string(),
        },
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(service().verify(&token), Err(TokenError::Invalid));
}

#[test]
fn test_empty_secret_is_config_error() {
    let result = TokenService::from_config(&AppConfig::with_secret(""));
    assert_eq!(result.err(), Some(ConfigError::Missing("JWT_SECRET")));
}
