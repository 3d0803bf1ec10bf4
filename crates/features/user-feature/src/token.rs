use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::UserFeatureError;

/// Claims carried by an auth token
///
/// `jti` makes every minted token unique even for back-to-back logins within
/// the same second.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub access: String,
    pub jti: Uuid,
    pub iat: usize,
    pub exp: usize,
}

/// Mints and verifies signed auth tokens
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl_days: i64,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_days,
        }
    }

    /// Build a signer from `JWT_SECRET` and `TOKEN_TTL_DAYS`
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "change-me-in-production".to_string());
        let ttl_days = std::env::var("TOKEN_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        Self::new(secret, ttl_days)
    }

    /// Mint a fresh token for a user
    pub fn mint(&self, user_id: Uuid) -> Result<String, UserFeatureError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let exp = now + self.ttl_days * 24 * 60 * 60;

        let claims = Claims {
            sub: user_id,
            access: domain::ACCESS_AUTH.to_string(),
            jti: Uuid::new_v4(),
            iat: now as usize,
            exp: exp as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| UserFeatureError::Token(e.to_string()))
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims, UserFeatureError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| UserFeatureError::Token(e.to_string()))
    }
}
