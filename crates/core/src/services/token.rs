//! Bearer token service.
//!
//! Stateless signed tokens (HS256). The secret comes from configuration and
//! is never embedded in the binary.

use chrono::{Duration, Utc};
use inkpot_common::{AppError, AppResult, Config};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

impl TokenService {
    /// Create a new token service from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_secret(&config.auth.token_secret, config.auth.token_expiry_days)
    }

    /// Create a token service with an explicit secret and expiry window.
    #[must_use]
    pub fn with_secret(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }

    /// Issue a token for a user.
    pub fn issue(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.expiry_days)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return the subject user ID.
    ///
    /// Expired, tampered, and malformed tokens all map to Unauthorized.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_verify_round_trip() {
        let service = TokenService::with_secret("test-secret", 30);

        let token = service.issue("u1").unwrap();
        let subject = service.verify(&token).unwrap();

        assert_eq!(subject, "u1");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::with_secret("test-secret", 30);

        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::with_secret("secret-a", 30);
        let verifier = TokenService::with_secret("secret-b", 30);

        let token = issuer.issue("u1").unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::with_secret("test-secret", -1);

        let token = service.issue("u1").unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }
}
