use super::errors::HeaderError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the credential from an `Authorization: Bearer <token>` value.
///
/// The caller passes the raw header value, or `None` when the header is
/// absent. Surrounding whitespace is trimmed; after trimming, the value must
/// be exactly two whitespace-separated parts with the first part exactly
/// `Bearer` (case-sensitive).
///
/// # Errors
/// * `Missing` - Header absent or empty
/// * `Malformed` - Value not in `Bearer <token>` shape
pub fn extract_bearer(header: Option<&str>) -> Result<&str, HeaderError> {
    extract_scheme(header, BEARER_SCHEME)
}

/// Extract the credential from an `Authorization: ApiKey <key>` value.
///
/// Same contract as [`extract_bearer`] with the `ApiKey` scheme literal.
pub fn extract_api_key(header: Option<&str>) -> Result<&str, HeaderError> {
    extract_scheme(header, API_KEY_SCHEME)
}

fn extract_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, HeaderError> {
    let raw = header.ok_or(HeaderError::Missing)?;
    if raw.is_empty() {
        return Err(HeaderError::Missing);
    }

    let mut parts = raw.trim().split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(s), Some(credential), None) if s == scheme => Ok(credential),
        _ => Err(HeaderError::Malformed),
    }
}
