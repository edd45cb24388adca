use crate::config::AuthConfig;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The only algorithm tokens are signed and accepted with.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

// Claim names owned by the codec; callers cannot override them through `extra`.
const RESERVED_CLAIMS: [&str; 5] = ["userId", "sub", "email", "exp", "iat"];

/// Represents the claims encoded within a bearer token.
///
/// The subject id may arrive under either `userId` or `sub`, depending on
/// which issuer produced the token. Unknown claims are kept in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenClaims {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Returns the first non-empty of `userId` and `sub`, in that order.
    pub fn subject_id(&self) -> Option<&str> {
        [self.user_id.as_deref(), self.sub.as_deref()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

/// What a caller asks to be put into a new token.
#[derive(Debug, Clone, Default)]
pub struct IssueClaims {
    pub subject_id: String,
    pub email: Option<String>,
    pub extra: Map<String, Value>,
}

impl IssueClaims {
    pub fn new(subject_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email,
            extra: Map::new(),
        }
    }
}

/// Issues and verifies HS256-signed bearer tokens with a single symmetric secret.
///
/// Holds no per-request state, so one instance is shared by all workers.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.secret, config.token_ttl)
    }

    /// Signs `claims` into a token that expires `ttl` from now (the configured
    /// default when `None`).
    ///
    /// # Returns
    /// Returns `AppError::InternalServerError` if encoding fails.
    pub fn issue(&self, claims: IssueClaims, ttl: Option<Duration>) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl.unwrap_or(self.default_ttl))
            .ok_or_else(|| AppError::InternalServerError("token expiry overflow".into()))?;

        let mut extra = claims.extra;
        extra.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));

        let token_claims = TokenClaims {
            user_id: None,
            sub: Some(claims.subject_id),
            email: claims.email,
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
            extra,
        };

        encode(
            &Header::new(TOKEN_ALGORITHM),
            &token_claims,
            &self.encoding_key,
        )
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature, algorithm and expiry in one step and decodes the claims.
    ///
    /// # Returns
    /// Returns `AppError::InvalidToken` if the token is malformed, signed with another
    /// key or algorithm, or expired. The reason is carried for logging only.
    pub fn parse(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::InvalidToken(e.to_string()))
    }
}
