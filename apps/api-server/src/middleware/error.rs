//! Error handling - RFC 7807 compliant responses.

use std::collections::BTreeMap;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use quill_core::DomainError;
use quill_core::error::RepoError;
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(AuthError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {detail}")]
    Conflict {
        detail: String,
        errors: Option<BTreeMap<String, String>>,
    },

    #[error("Validation errors: {0:?}")]
    Validation(BTreeMap<String, String>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn unauthenticated_body(err: &AuthError) -> ErrorResponse {
        match err {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::InvalidCredentials => {
                ErrorResponse::unauthorized().with_detail("Invalid email or password")
            }
            AuthError::HashingError(_) => ErrorResponse::unauthorized(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthenticated(err) => {
                return HttpResponse::build(self.status_code())
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(Self::unauthenticated_body(err));
            }
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict { detail, errors } => {
                let body = ErrorResponse::conflict(detail);
                match errors {
                    Some(errors) => body.with_errors(errors.clone()),
                    None => body,
                }
            }
            AppError::Validation(errors) => ErrorResponse::new(422, "Validation Failed")
                .with_detail("One or more fields are invalid")
                .with_errors(errors.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn owned_keys<V: Into<String>>(
    errors: impl IntoIterator<Item = (&'static str, V)>,
) -> BTreeMap<String, String> {
    errors
        .into_iter()
        .map(|(field, message)| (field.to_string(), message.into()))
        .collect()
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Unauthenticated(auth) => AppError::Unauthenticated(auth),
            DomainError::InvalidInput { errors } => AppError::Validation(owned_keys(errors)),
            DomainError::Conflict { field, message } => AppError::Conflict {
                detail: message.clone(),
                errors: Some(owned_keys([(field, message)])),
            },
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{entity_type} {key} not found"))
            }
            DomainError::Forbidden => AppError::Forbidden,
            err @ DomainError::Stale { .. } => AppError::Conflict {
                detail: format!("{err}. Reload and try again."),
                errors: None,
            },
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => AppError::Internal(msg),
            other => AppError::Unauthenticated(other),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict {
                detail: msg,
                errors: None,
            },
            RepoError::VersionMismatch => AppError::Conflict {
                detail: "Resource was modified concurrently".to_string(),
                errors: None,
            },
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
