//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::{AuthError, IdentityResolver};
use quill_core::service::validate_registration;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Credentials;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "Email already registered";

fn email_taken() -> AppError {
    AppError::Conflict {
        detail: EMAIL_TAKEN.to_string(),
        errors: Some([("email".to_string(), EMAIL_TAKEN.to_string())].into()),
    }
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = state.tokens.generate_token(&user.as_caller())?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_string();
    let fullname = req.fullname.trim().to_string();

    validate_registration(&email, &req.password, &fullname).into_result()?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = state.passwords.hash(&req.password)?;

    let saved = match state.users.save(User::new(email, fullname, password_hash)).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration.
        Err(RepoError::Constraint(_)) => return Err(email_taken()),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %saved.id, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&state, &saved)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or(AppError::Unauthenticated(AuthError::InvalidCredentials))?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthenticated(AuthError::InvalidCredentials));
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, credentials: Credentials) -> AppResult<HttpResponse> {
    let caller = credentials.resolve()?;

    let user = state
        .users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", caller.id)))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
