//! Admin bearer-token service and request extractor.
//!
//! Tokens are HS256-signed claims carrying the admin's id, username, and
//! display name, valid for a fixed window (eight hours in the default
//! configuration). Expired or malformed tokens are uniformly rejected
//! with 401.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use coinharbor_core::AdminCredential;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::ApiContext;

/// Claims embedded in an admin bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin id.
    pub sub: i64,
    pub username: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies admin bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl TokenService {
    /// Creates a token service from the shared secret and validity window.
    #[must_use]
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        }
    }

    /// Issues a signed token for an admin credential.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, admin: &AdminCredential) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: admin.id,
            username: admin.username.clone(),
            name: admin.name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(e.into()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    /// Returns `Unauthorized` for expired, tampered, or malformed tokens.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, ApiError> {
        decode::<AdminClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}

/// Extractor gating admin endpoints on a valid bearer token.
pub struct AdminAuth(pub AdminClaims);

#[async_trait]
impl FromRequestParts<ApiContext> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ApiContext,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

        Ok(Self(ctx.tokens.verify(token)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredential {
        AdminCredential {
            id: 1,
            username: "admin".to_string(),
            password: "admin123".to_string(),
            name: "Platform Admin".to_string(),
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let tokens = TokenService::new("test-secret", 8);
        let token = tokens.issue(&admin()).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let tokens = TokenService::new("test-secret", -9);
        let token = tokens.issue(&admin()).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let token = TokenService::new("other-secret", 8).issue(&admin()).unwrap();
        assert!(TokenService::new("test-secret", 8).verify(&token).is_err());
    }
}
