use thiserror::Error;

/// Error type for Authorization header parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("No authorization header")]
    Missing,

    #[error("Header value not in \"<scheme> <credential>\" format")]
    Malformed,
}
