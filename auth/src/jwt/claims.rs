use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Issuer claim stamped into every access token.
pub const ISSUER: &str = "chirpy";

/// Claims carried by an access token.
///
/// Strongly typed: every field is required, and the subject must parse as a
/// user id. Tokens with a free-form or missing subject are rejected at
/// verification time rather than at first use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Issuer, always [`ISSUER`]
    pub iss: String,

    /// Issued at (Unix timestamp, UTC)
    pub iat: i64,

    /// Expiration time (Unix timestamp, UTC)
    pub exp: i64,

    /// Subject: the owning user's id as a string
    pub sub: String,
}

impl AccessTokenClaims {
    /// Build claims for a user with the given time to live.
    ///
    /// A negative `ttl` produces claims that are already expired; issuance
    /// still succeeds, verification of the resulting token fails.
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            sub: user_id.to_string(),
        }
    }

    /// Parse the subject claim as a user id.
    ///
    /// # Errors
    /// * `Malformed` - Subject is not a well-formed UUID
    pub fn subject(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| JwtError::Malformed("subject is not a valid user id".to_string()))
    }
}
