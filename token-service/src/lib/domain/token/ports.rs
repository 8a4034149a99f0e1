use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::token::errors::AuthError;
use crate::token::models::CredentialPair;
use crate::token::models::RefreshToken;
use crate::token::models::UserId;

/// Port for the authentication gateway.
///
/// The single surface the HTTP handlers depend on: "is this request
/// authenticated, and as whom?" plus credential issue/refresh/revoke.
#[async_trait]
pub trait AuthGatewayPort: Send + Sync + 'static {
    /// Authenticate a request from its Authorization header value.
    ///
    /// Header-shape failures surface before token-validation failures.
    ///
    /// # Errors
    /// * `MissingHeader` - Header absent or empty
    /// * `MalformedHeader` - Header not in `Bearer <token>` shape
    /// * `InvalidToken` - Signature, expiry, issuer, or subject check failed
    fn authenticate(&self, header: Option<&str>) -> Result<UserId, AuthError>;

    /// Issue a credential pair for a user who has already proven their
    /// identity: a 1-hour access token plus a brand-new refresh token row.
    ///
    /// # Errors
    /// * `Database` - Refresh token could not be stored
    /// * `Internal` - Access token signing failed
    async fn login(&self, user_id: UserId) -> Result<CredentialPair, AuthError>;

    /// Mint a new 1-hour access token from a refresh token presented as a
    /// bearer credential. The refresh token itself is not rotated.
    ///
    /// # Errors
    /// * `Unauthorized` - Header problem, unknown, expired, or revoked token
    /// * `Database` - Lookup failed
    /// * `Internal` - Access token signing failed
    async fn refresh(&self, header: Option<&str>) -> Result<String, AuthError>;

    /// Revoke the refresh token presented as a bearer credential.
    ///
    /// # Errors
    /// * `Unauthorized` - Header problem or unknown token
    /// * `Database` - Update failed
    async fn revoke(&self, header: Option<&str>) -> Result<(), AuthError>;

    /// Check the webhook caller's `ApiKey` credential.
    ///
    /// # Errors
    /// * `Unauthorized` - Header problem or key mismatch
    fn verify_api_key(&self, header: Option<&str>) -> Result<(), AuthError>;

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `Password` - Hashing operation failed
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a plaintext password against a stored hash. A wrong password
    /// is `Ok(false)`.
    ///
    /// # Errors
    /// * `Password` - Stored hash is malformed
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Persistence operations for refresh token records.
///
/// Fetch returns raw state only; expiry and revocation are interpreted by
/// the caller, so lifecycle rules stay testable without storage. Mutations
/// must be single-statement (per-row atomicity comes from the database,
/// last-writer-wins on concurrent revokes).
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new record.
    ///
    /// # Errors
    /// * `Database` - Insert failed (including a primary key conflict, which
    ///   at this token entropy is negligible and not retried)
    async fn insert(&self, record: RefreshToken) -> Result<RefreshToken, AuthError>;

    /// Fetch a record by its token string.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Database` - Query failed
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;

    /// Stamp `revoked_at` and `updated_at` on the matching record.
    ///
    /// Revoking an already-revoked token re-stamps both timestamps.
    ///
    /// # Errors
    /// * `NotFound` - No record with this token
    /// * `Database` - Update failed
    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<(), AuthError>;
}
