use auth::HeaderError;
use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Top-level error for all authentication operations.
///
/// Intended transport mapping (applied by the handler layer, which must not
/// echo internal error text to clients): `MissingHeader`, `MalformedHeader`,
/// `InvalidToken`, and `Unauthorized` map to 401; `NotFound` to 404;
/// `Database` and `Internal` to 500.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No authorization header")]
    MissingHeader,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Invalid access token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    // Umbrella used by refresh/revoke so callers cannot tell which
    // sub-check failed
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Refresh token not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<HeaderError> for AuthError {
    fn from(err: HeaderError) -> Self {
        match err {
            HeaderError::Missing => AuthError::MissingHeader,
            HeaderError::Malformed => AuthError::MalformedHeader,
        }
    }
}
