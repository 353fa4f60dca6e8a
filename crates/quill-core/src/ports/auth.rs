//! Authentication and identity ports.

use uuid::Uuid;

/// Identity of the caller behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
}

/// Resolves the identity of whoever issued the current request.
///
/// Every mutation in the post engine takes one of these explicitly, so an
/// unauthenticated call fails inside the engine before any store access.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self) -> Result<Caller, AuthError>;
}

/// An already-verified caller resolves to itself.
impl IdentityResolver for Caller {
    fn resolve(&self) -> Result<Caller, AuthError> {
        Ok(self.clone())
    }
}

/// A request that carried no credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityResolver for Anonymous {
    fn resolve(&self) -> Result<Caller, AuthError> {
        Err(AuthError::MissingAuth)
    }
}

/// Claims stored in JWT tokens.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub fullname: String,
    pub exp: i64,
}

impl From<TokenClaims> for Caller {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
            fullname: claims.fullname,
        }
    }
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Generate access token for a caller.
    fn generate_token(&self, caller: &Caller) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
