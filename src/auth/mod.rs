use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, SecurityConfig};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Caller id, string-encoded as JWT subjects usually are
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated identity attached to a request after token verification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub id: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(String),
}

/// Verifies bearer tokens signed with the configured shared secret.
pub struct JwtAuthenticator {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expire_minutes: i64,
}

impl JwtAuthenticator {
    pub fn new(config: &SecurityConfig) -> Result<Self, ConfigError> {
        if config.secret_key.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        let algorithm = config.jwt_algorithm()?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation: Validation::new(algorithm),
            expire_minutes: config.access_token_expire_minutes,
        })
    }

    /// Resolve a raw bearer token into the caller it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<Caller, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        let id = token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidSubject(token_data.claims.sub.clone()))?;

        Ok(Caller { id })
    }

    /// Sign a token for `user_id` valid for the configured lifetime.
    pub fn issue(&self, user_id: i64) -> Result<String, JwtError> {
        self.issue_with_lifetime(user_id, Duration::minutes(self.expire_minutes))
    }

    pub fn issue_with_lifetime(&self, user_id: i64, lifetime: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig {
            secret_key: secret.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        }
    }

    #[test]
    fn issued_token_authenticates_as_its_subject() {
        let auth = JwtAuthenticator::new(&security("test-secret-key-for-testing-only")).unwrap();
        let token = auth.issue(42).unwrap();
        assert_eq!(auth.authenticate(&token).unwrap(), Caller { id: 42 });
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let issuer = JwtAuthenticator::new(&security("one-secret")).unwrap();
        let verifier = JwtAuthenticator::new(&security("another-secret")).unwrap();
        let token = issuer.issue(1).unwrap();
        assert!(matches!(
            verifier.authenticate(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let auth = JwtAuthenticator::new(&security("secret")).unwrap();
        // Well past the default 60s leeway
        let token = auth.issue_with_lifetime(1, Duration::minutes(-10)).unwrap();
        assert!(matches!(auth.authenticate(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_non_numeric_subject() {
        let config = security("secret");
        let auth = JwtAuthenticator::new(&config).unwrap();
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret_key.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            auth.authenticate(&token),
            Err(JwtError::InvalidSubject(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        let auth = JwtAuthenticator::new(&security("secret")).unwrap();
        assert!(auth.authenticate("not.a.jwt").is_err());
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(matches!(
            JwtAuthenticator::new(&security("  ")),
            Err(ConfigError::EmptySecret)
        ));
    }
}
