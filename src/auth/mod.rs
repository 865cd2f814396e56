pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password, PasswordError};

/// Token payload. Only `user_id` is required; `iat` and `exp` are optional so
/// that a bare `{"user_id": N}` token signed with the server secret verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies HS256 bearer tokens carrying a user id
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Option<Duration>,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is still checked whenever a token carries one
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry: (expiry_hours > 0).then(|| Duration::hours(expiry_hours as i64)),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: Some(now.timestamp()),
            exp: self.expiry.map(|ttl| (now + ttl).timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
