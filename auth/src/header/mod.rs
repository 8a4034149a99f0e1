pub mod errors;
pub mod extract;

pub use errors::HeaderError;
pub use extract::extract_api_key;
pub use extract::extract_bearer;
