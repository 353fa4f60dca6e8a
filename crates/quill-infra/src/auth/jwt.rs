//! JWT token service implementation.
//!
//! Tokens carry the whole [`Caller`] (id, email, full name), so resolving a
//! request's identity never touches the user store.

use std::env;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, Caller, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "quill-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|hours| hours.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.uses_default_secret() {
            match env::var("RUST_ENV").as_deref() {
                Ok("production" | "prod") => tracing::error!(
                    issuer = %config.issuer,
                    "JWT_SECRET is unset in production; tokens are forgeable"
                ),
                _ => tracing::warn!(issuer = %config.issuer, "JWT_SECRET is unset, using the development secret"),
            }
        }

        config
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Wire form of the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    fullname: String,
    exp: i64,
    iat: i64,
    iss: String,
}

impl Claims {
    fn issue(caller: &Caller, config: &JwtConfig) -> Self {
        let now = Utc::now();
        Self {
            sub: caller.id.to_string(),
            email: caller.email.clone(),
            fullname: caller.fullname.clone(),
            exp: (now + TimeDelta::hours(config.expiration_hours)).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    fn into_token_claims(self) -> Result<TokenClaims, AuthError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidToken("Subject is not a user id".to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: self.email,
            fullname: self.fullname,
            exp: self.exp,
        })
    }
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, caller: &Caller) -> Result<String, AuthError> {
        encode(
            &Header::default(),
            &Claims::issue(caller, &self.config),
            &self.encoding_key,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        data.claims.into_token_claims()
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Caller {
        Caller {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            fullname: "Ada Lovelace".to_string(),
        }
    }

    fn service(secret: &str) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn token_resolves_back_to_the_same_caller() {
        let tokens = service("s3cret");
        let ada = ada();

        let claims = tokens
            .validate_token(&tokens.generate_token(&ada).unwrap())
            .unwrap();

        assert_eq!(Caller::from(claims), ada);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = service("one").generate_token(&ada()).unwrap();

        assert!(matches!(
            service("two").validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn lapsed_token_is_reported_as_expired() {
        let tokens = JwtTokenService::new(JwtConfig {
            expiration_hours: -2,
            ..JwtConfig::default()
        });

        let token = tokens.generate_token(&ada()).unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let staging = JwtTokenService::new(JwtConfig {
            issuer: "quill-staging".to_string(),
            ..JwtConfig::default()
        });
        let token = staging.generate_token(&ada()).unwrap();

        assert!(JwtTokenService::new(JwtConfig::default())
            .validate_token(&token)
            .is_err());
    }

    #[test]
    fn subject_must_be_a_user_id() {
        let config = JwtConfig::default();
        let mut claims = Claims::issue(&ada(), &config);
        claims.sub = "admin".to_string();
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            JwtTokenService::new(config).validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn default_config_is_flagged() {
        assert!(JwtConfig::default().uses_default_secret());
        assert!(!service("s3cret").config.uses_default_secret());
    }
}
