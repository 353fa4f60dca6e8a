//! Bearer-token credentials extractor.
//!
//! Extraction never fails. The token is only checked when the post engine
//! asks for the caller, so public routes ignore a bad header and mutations
//! report the exact reason.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use quill_core::ports::{AuthError, Caller, IdentityResolver, TokenService};

use crate::state::AppState;

#[derive(Debug, Clone)]
enum BearerToken {
    Missing,
    Malformed(&'static str),
    Present(String),
}

impl BearerToken {
    fn from_request(req: &HttpRequest) -> Self {
        let Some(value) = req.headers().get(header::AUTHORIZATION) else {
            return Self::Missing;
        };

        let Ok(value) = value.to_str() else {
            return Self::Malformed("Invalid authorization header");
        };

        match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Self::Present(token.trim().to_string()),
            Some(_) => Self::Malformed("Empty Bearer token"),
            None => Self::Malformed("Expected Bearer token"),
        }
    }
}

/// Whatever the request presented as credentials, resolved lazily.
#[derive(Clone)]
pub struct Credentials {
    token: BearerToken,
    tokens: Option<Arc<dyn TokenService>>,
}

impl IdentityResolver for Credentials {
    fn resolve(&self) -> Result<Caller, AuthError> {
        match &self.token {
            BearerToken::Missing => Err(AuthError::MissingAuth),
            BearerToken::Malformed(reason) => Err(AuthError::InvalidToken(reason.to_string())),
            BearerToken::Present(token) => {
                let Some(tokens) = &self.tokens else {
                    tracing::error!("TokenService not found in app data");
                    return Err(AuthError::InvalidToken(
                        "Server configuration error".to_string(),
                    ));
                };
                tokens.validate_token(token).map(Caller::from)
            }
        }
    }
}

impl FromRequest for Credentials {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let tokens = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.tokens.clone());

        ready(Ok(Credentials {
            token: BearerToken::from_request(req),
            tokens,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::test::TestRequest;

    #[test]
    fn missing_header_is_missing_auth() {
        let req = TestRequest::default().to_http_request();
        let credentials = Credentials {
            token: BearerToken::from_request(&req),
            tokens: None,
        };

        assert!(matches!(credentials.resolve(), Err(AuthError::MissingAuth)));
    }

    #[test]
    fn non_bearer_scheme_is_invalid_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();

        assert!(matches!(
            BearerToken::from_request(&req),
            BearerToken::Malformed("Expected Bearer token")
        ));
    }

    #[test]
    fn bearer_token_is_trimmed() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer  abc.def.ghi "))
            .to_http_request();

        match BearerToken::from_request(&req) {
            BearerToken::Present(token) => assert_eq!(token, "abc.def.ghi"),
            other => panic!("expected a token, got {other:?}"),
        }
    }
}
