use rand::rngs::OsRng;
use rand::RngCore;

/// Raw entropy per refresh token, before hex encoding.
const TOKEN_BYTES: usize = 32;

/// Generate an opaque refresh token: 256 bits from the OS CSPRNG, hex
/// encoded.
///
/// Uniqueness is not checked here; the storage layer's primary key is the
/// backstop, and a collision at this entropy is negligible.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
