//! Authentication primitives for the Chirpy API
//!
//! Pure, transport-agnostic building blocks shared by the token service:
//! - Password hashing (Argon2id)
//! - Access token issuance and verification (HS256 JWTs)
//! - Opaque refresh token generation
//! - Authorization header scheme parsing (`Bearer`, `ApiKey`)
//!
//! Nothing in this crate touches storage or the network; the token service
//! composes these pieces with its persistence layer.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("wrong_password", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let user_id = Uuid::new_v4();
//! let token = codec.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(codec.verify(&token).unwrap(), user_id);
//! ```
//!
//! ## Header Extraction
//! ```
//! use auth::extract_bearer;
//!
//! let token = extract_bearer(Some("  Bearer abc123")).unwrap();
//! assert_eq!(token, "abc123");
//! ```

pub mod header;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use header::extract_api_key;
pub use header::extract_bearer;
pub use header::HeaderError;
pub use jwt::AccessTokenClaims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::generate_refresh_token;
