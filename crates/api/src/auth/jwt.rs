//! HS256 JWT access and refresh tokens.
//!
//! Both token kinds carry the admin id plus a `typ` claim, so a refresh
//! token can never be presented as an access token or vice versa.

use bizdesk_core::error::CoreError;
use bizdesk_core::types::RecordId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The admin's record id.
    pub id: RecordId,
    pub typ: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in hours (default: 24).
    pub access_token_expiry_hours: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_HOURS: i64 = 24;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_HOURS`  | no       | `24`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_hours: i64 = std::env::var("JWT_ACCESS_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_HOURS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_hours,
            refresh_token_expiry_days,
        }
    }

    fn lifetime_secs(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_token_expiry_hours * 3600,
            TokenKind::Refresh => self.refresh_token_expiry_days * 86_400,
        }
    }
}

/// An issued access / refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn generate_token(
    admin_id: &RecordId,
    kind: TokenKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        id: admin_id.clone(),
        typ: kind,
        exp: now + config.lifetime_secs(kind),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

pub fn generate_access_token(
    admin_id: &RecordId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(admin_id, TokenKind::Access, config)
}

pub fn generate_refresh_token(
    admin_id: &RecordId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(admin_id, TokenKind::Refresh, config)
}

/// Issue a fresh access + refresh pair.
pub fn generate_token_pair(
    admin_id: &RecordId,
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: generate_access_token(admin_id, config)?,
        refresh_token: generate_refresh_token(admin_id, config)?,
    })
}

/// Validate a token of the expected kind and return its claims.
///
/// Expiry maps to [`CoreError::TokenExpired`]; every other failure (bad
/// signature, malformed token, wrong kind) is [`CoreError::Unauthorized`].
pub fn validate_token(
    token: &str,
    expected: TokenKind,
    config: &JwtConfig,
) -> Result<Claims, CoreError> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => CoreError::TokenExpired,
        _ => CoreError::Unauthorized("Invalid token".into()),
    })?;

    if claims.typ != expected {
        return Err(CoreError::Unauthorized("Invalid token".into()));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_hours: 24,
            refresh_token_expiry_days: 7,
        }
    }

    fn encode_claims(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_access_token_resolves_to_admin() {
        let config = test_config();
        let id = RecordId::generate();
        let token = generate_access_token(&id, &config).expect("token generation should succeed");

        let claims = validate_token(&token, TokenKind::Access, &config).expect("valid token");
        assert_eq!(claims.id, id);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_is_distinct() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            id: RecordId::generate(),
            typ: TokenKind::Access,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode_claims(&claims, &config);

        assert_matches!(
            validate_token(&token, TokenKind::Access, &config),
            Err(CoreError::TokenExpired)
        );
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = test_config();
        let id = RecordId::generate();
        let pair = generate_token_pair(&id, &config).unwrap();

        assert_matches!(
            validate_token(&pair.refresh_token, TokenKind::Access, &config),
            Err(CoreError::Unauthorized(_))
        );
        let claims = validate_token(&pair.refresh_token, TokenKind::Refresh, &config).unwrap();
        assert_eq!(claims.id, id);
        assert_eq!(claims.exp - claims.iat, 7 * 86_400);
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };

        let token = generate_access_token(&RecordId::generate(), &config_a).unwrap();
        assert_matches!(
            validate_token(&token, TokenKind::Access, &config_b),
            Err(CoreError::Unauthorized(_))
        );
    }
}
