//! Bearer token issuing and verification (HS256 JWT).

use chrono::{Duration, Utc};
use engine::{Actor, Role, User};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::ServerError;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    name: String,
    role: String,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            tracing::error!("cannot sign token: {err}");
            ServerError::Unauthorized("cannot issue token".to_string())
        })
    }

    /// Decodes a token into the caller identity. Expired, tampered or
    /// malformed tokens are all rejected the same way.
    pub fn verify(&self, token: &str) -> Result<Actor, ServerError> {
        let invalid = || ServerError::Unauthorized("invalid or expired token".to_string());
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            tracing::debug!("token rejected: {err}");
            invalid()
        })?;
        let claims = data.claims;
        let id = claims.sub.parse::<i32>().map_err(|_| invalid())?;
        let role = Role::try_from(claims.role.as_str()).map_err(|_| invalid())?;
        Ok(Actor::new(id, claims.name, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: 7,
            name: "amel".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies_back_to_actor() {
        let tokens = TokenService::new(&AuthConfig::new("test-secret"));
        let token = tokens.issue(&user(Role::Vip)).unwrap();
        let actor = tokens.verify(&token).unwrap();
        assert_eq!(actor, Actor::new(7, "amel", Role::Vip));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(&AuthConfig::new("secret-a"));
        let verifier = TokenService::new(&AuthConfig::new("secret-b"));
        let token = issuer.issue(&user(Role::User)).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: -2,
        });
        let token = tokens.issue(&user(Role::Admin)).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = TokenService::new(&AuthConfig::new("test-secret"));
        assert!(tokens.verify("not.a.jwt").is_err());
    }
}
