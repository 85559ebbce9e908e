use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

/// Signs and verifies HS256 bearer tokens carrying the caller's user id
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: Option<u64>,
}

impl TokenIssuer {
    pub fn new(secret: &str, expiry_hours: Option<u64>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self::new(&security.jwt_secret, security.jwt_expiry_hours))
    }

    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            iat: now.timestamp(),
            exp: self
                .expiry_hours
                .map(|hours| (now + Duration::hours(hours as i64)).timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        if self.expiry_hours.is_some() {
            validation.set_required_spec_claims(&["sub", "exp"]);
            validation.validate_exp = true;
        } else {
            validation.set_required_spec_claims(&["sub"]);
            validation.validate_exp = false;
        }

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_subject() {
        let issuer = TokenIssuer::new("test-secret", None);
        let subject = Uuid::new_v4();

        let token = issuer.issue(subject).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, subject);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = TokenIssuer::new("one", None).issue(Uuid::new_v4()).unwrap();
        let err = TokenIssuer::new("two", None).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn expiry_is_enforced_when_configured() {
        let with_expiry = TokenIssuer::new("test-secret", Some(1));
        let token = with_expiry.issue(Uuid::new_v4()).unwrap();
        assert!(with_expiry.verify(&token).unwrap().exp.is_some());

        // A token minted without exp is not accepted once expiry is required
        let unexpiring = TokenIssuer::new("test-secret", None).issue(Uuid::new_v4()).unwrap();
        assert!(with_expiry.verify(&unexpiring).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = TokenIssuer::new("test-secret", None);
        assert!(issuer.verify("not.a.token").is_err());
    }
}
