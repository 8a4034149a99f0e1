use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::AccessTokenClaims;
use super::claims::ISSUER;
use super::errors::JwtError;

/// Access token codec: issues and verifies HS256 JWTs.
///
/// Stateless; validity is a pure function of the token string, the signing
/// secret, and the wall clock.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec over a signing secret.
    ///
    /// The secret should be at least 256 bits (32 bytes) for HS256 and come
    /// from configuration, never from code.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed access token for a user.
    ///
    /// Claims are `{iss: "chirpy", iat: now, exp: now + ttl, sub: user_id}`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing or serialization failed
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);
        let claims = AccessTokenClaims::new(user_id, ttl);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return the user it names.
    ///
    /// Checks the signature, the expiry (no leeway), the issuer, and that
    /// the subject parses as a user id.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signed with a different secret
    /// * `Expired` - Expiry timestamp is in the past
    /// * `Malformed` - Not parseable, wrong issuer, or bad subject
    pub fn verify(&self, token: &str) -> Result<Uuid, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);

        let token_data =
            decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
                .map_err(JwtError::from)?;

        token_data.claims.subject()
    }
}
