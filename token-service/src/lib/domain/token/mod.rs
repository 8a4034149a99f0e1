pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::AuthError;
pub use models::CredentialPair;
pub use models::RefreshToken;
pub use models::RefreshTokenStatus;
pub use models::UserId;
pub use ports::AuthGatewayPort;
pub use ports::RefreshTokenRepository;
pub use service::AuthService;
