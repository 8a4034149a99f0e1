use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

/// Refresh tokens live for 60 days from creation.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// User unique identifier type.
///
/// Users themselves live in the (external) user store; tokens only reference
/// them by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Server-tracked refresh token record.
///
/// The token string is the primary key. Records are never hard-deleted:
/// expiry is a read-time check and revocation only stamps `revoked_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a refresh token at a given instant.
///
/// `Active` is the only usable state. `Expired` is time-driven (no write
/// occurs); `Revoked` is an explicit action. Neither transitions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    Active,
    Expired,
    Revoked,
}

impl RefreshToken {
    /// Build a fresh record for a user: new opaque token, 60-day expiry,
    /// `revoked_at` null.
    ///
    /// Every call produces a distinct token; a user may hold several live
    /// refresh tokens at once, one per login.
    pub fn issue(user_id: UserId) -> Self {
        let now = Utc::now();

        Self {
            token: auth::generate_refresh_token(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            revoked_at: None,
        }
    }

    /// Lifecycle state at `now`. Revocation wins over expiry when both hold.
    pub fn status(&self, now: DateTime<Utc>) -> RefreshTokenStatus {
        if self.revoked_at.is_some() {
            RefreshTokenStatus::Revoked
        } else if now >= self.expires_at {
            RefreshTokenStatus::Expired
        } else {
            RefreshTokenStatus::Active
        }
    }

    /// A token is usable iff `revoked_at` is null and it has not expired.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == RefreshTokenStatus::Active
    }
}

/// Access token and refresh token issued together at login.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}
