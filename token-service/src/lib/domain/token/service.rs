use std::sync::Arc;

use async_trait::async_trait;
use auth::extract_api_key;
use auth::extract_bearer;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;

use crate::token::errors::AuthError;
use crate::token::models::CredentialPair;
use crate::token::models::RefreshToken;
use crate::token::models::UserId;
use crate::token::ports::AuthGatewayPort;
use crate::token::ports::RefreshTokenRepository;

/// Access tokens live for 1 hour; the expiry is server-fixed, never
/// client-supplied.
const ACCESS_TOKEN_TTL_HOURS: i64 = 1;

/// Authentication gateway implementation.
///
/// Combines the stateless pieces (token codec, password hasher) with the
/// refresh token repository behind [`AuthGatewayPort`].
pub struct AuthService<R>
where
    R: RefreshTokenRepository,
{
    repository: Arc<R>,
    codec: TokenCodec,
    password_hasher: PasswordHasher,
    webhook_api_key: String,
}

impl<R> AuthService<R>
where
    R: RefreshTokenRepository,
{
    /// Create the gateway with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Refresh token persistence implementation
    /// * `jwt_secret` - Access token signing secret
    /// * `password_hasher` - Hasher built from the configured Argon2 costs
    /// * `webhook_api_key` - Key expected from the payment webhook caller
    pub fn new(
        repository: Arc<R>,
        jwt_secret: &[u8],
        password_hasher: PasswordHasher,
        webhook_api_key: String,
    ) -> Self {
        Self {
            repository,
            codec: TokenCodec::new(jwt_secret),
            password_hasher,
            webhook_api_key,
        }
    }

    fn issue_access_token(&self, user_id: UserId) -> Result<String, AuthError> {
        self.codec
            .issue(user_id.0, Duration::hours(ACCESS_TOKEN_TTL_HOURS))
            .map_err(|e| AuthError::Internal(format!("Access token signing failed: {}", e)))
    }
}

#[async_trait]
impl<R> AuthGatewayPort for AuthService<R>
where
    R: RefreshTokenRepository,
{
    fn authenticate(&self, header: Option<&str>) -> Result<UserId, AuthError> {
        let token = extract_bearer(header)?;
        let user_id = self.codec.verify(token)?;

        Ok(UserId(user_id))
    }

    async fn login(&self, user_id: UserId) -> Result<CredentialPair, AuthError> {
        let access_token = self.issue_access_token(user_id)?;

        // One fresh row per login; concurrent logins for the same user each
        // get their own refresh token.
        let record = RefreshToken::issue(user_id);
        let stored = self.repository.insert(record).await.inspect_err(|e| {
            tracing::error!("Failed to store refresh token for user {}: {}", user_id, e);
        })?;

        Ok(CredentialPair {
            access_token,
            refresh_token: stored.token,
        })
    }

    async fn refresh(&self, header: Option<&str>) -> Result<String, AuthError> {
        let token = extract_bearer(header).map_err(|_| AuthError::Unauthorized)?;

        let record = self
            .repository
            .find_by_token(token)
            .await
            .inspect_err(|e| tracing::error!("Refresh token lookup failed: {}", e))?
            .ok_or(AuthError::Unauthorized)?;

        // Unknown, expired, and revoked all collapse to Unauthorized; the
        // caller must not learn which check failed.
        if !record.is_usable(Utc::now()) {
            return Err(AuthError::Unauthorized);
        }

        self.issue_access_token(record.user_id)
    }

    async fn revoke(&self, header: Option<&str>) -> Result<(), AuthError> {
        let token = extract_bearer(header).map_err(|_| AuthError::Unauthorized)?;

        match self.repository.revoke(token, Utc::now()).await {
            Ok(()) => Ok(()),
            Err(AuthError::NotFound) => Err(AuthError::Unauthorized),
            Err(e) => {
                tracing::error!("Refresh token revocation failed: {}", e);
                Err(e)
            }
        }
    }

    fn verify_api_key(&self, header: Option<&str>) -> Result<(), AuthError> {
        let key = extract_api_key(header).map_err(|_| AuthError::Unauthorized)?;

        if key != self.webhook_api_key {
            return Err(AuthError::Unauthorized);
        }

        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(self.password_hasher.hash(password)?)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(self.password_hasher.verify(password, hash)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::token::models::RefreshTokenStatus;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
    const API_KEY: &str = "f271c81ff7084fc5c533";

    // Define mocks in the test module using mockall
    mock! {
        pub TestRefreshTokenRepository {}

        #[async_trait]
        impl RefreshTokenRepository for TestRefreshTokenRepository {
            async fn insert(&self, record: RefreshToken) -> Result<RefreshToken, AuthError>;
            async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;
            async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<(), AuthError>;
        }
    }

    fn service(repository: MockTestRefreshTokenRepository) -> AuthService<MockTestRefreshTokenRepository> {
        AuthService::new(
            Arc::new(repository),
            SECRET,
            PasswordHasher::new(),
            API_KEY.to_string(),
        )
    }

    #[tokio::test]
    async fn test_login_issues_credential_pair() {
        let mut repository = MockTestRefreshTokenRepository::new();
        let user_id = UserId::new();

        repository
            .expect_insert()
            .withf(move |record| {
                record.user_id == user_id
                    && record.revoked_at.is_none()
                    && record.status(Utc::now()) == RefreshTokenStatus::Active
            })
            .times(1)
            .returning(|record| Ok(record));

        let service = service(repository);

        let pair = service.login(user_id).await.expect("Login failed");

        // The access token names the user who logged in
        let authenticated = service
            .authenticate(Some(&format!("Bearer {}", pair.access_token)))
            .expect("Failed to authenticate with fresh access token");
        assert_eq!(authenticated, user_id);

        // The refresh token is a 64-char hex string
        assert_eq!(pair.refresh_token.len(), 64);
        assert!(pair.refresh_token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_two_logins_produce_distinct_refresh_tokens() {
        let mut repository = MockTestRefreshTokenRepository::new();
        let user_id = UserId::new();

        repository
            .expect_insert()
            .times(2)
            .returning(|record| Ok(record));

        let service = service(repository);

        let first = service.login(user_id).await.expect("First login failed");
        let second = service.login(user_id).await.expect("Second login failed");

        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[tokio::test]
    async fn test_login_storage_failure() {
        let mut repository = MockTestRefreshTokenRepository::new();

        repository
            .expect_insert()
            .times(1)
            .returning(|_| Err(AuthError::Database("connection reset".to_string())));

        let service = service(repository);

        let result = service.login(UserId::new()).await;
        assert!(matches!(result, Err(AuthError::Database(_))));
    }

    #[tokio::test]
    async fn test_refresh_with_active_token() {
        let mut repository = MockTestRefreshTokenRepository::new();
        let user_id = UserId::new();
        let record = RefreshToken::issue(user_id);
        let token = record.token.clone();

        let expected_token = token.clone();
        repository
            .expect_find_by_token()
            .withf(move |t| t == expected_token)
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = service(repository);

        let access_token = service
            .refresh(Some(&format!("Bearer {}", token)))
            .await
            .expect("Refresh failed");

        let authenticated = service
            .authenticate(Some(&format!("Bearer {}", access_token)))
            .expect("Failed to authenticate with refreshed token");
        assert_eq!(authenticated, user_id);
    }

    #[tokio::test]
    async fn test_refresh_with_expired_token() {
        let mut repository = MockTestRefreshTokenRepository::new();

        let mut record = RefreshToken::issue(UserId::new());
        record.expires_at = Utc::now() - Duration::days(1);
        let token = record.token.clone();

        repository
            .expect_find_by_token()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = service(repository);

        let result = service.refresh(Some(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_with_revoked_token() {
        let mut repository = MockTestRefreshTokenRepository::new();

        let mut record = RefreshToken::issue(UserId::new());
        record.revoked_at = Some(Utc::now());
        let token = record.token.clone();

        repository
            .expect_find_by_token()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = service(repository);

        let result = service.refresh(Some(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_token() {
        let mut repository = MockTestRefreshTokenRepository::new();

        repository
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository);

        let result = service.refresh(Some("Bearer unknown")).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_with_bad_header() {
        let repository = MockTestRefreshTokenRepository::new();
        let service = service(repository);

        // Header failures collapse to Unauthorized too
        let result = service.refresh(None).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));

        let result = service.refresh(Some("Basic abc")).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_revoke() {
        let mut repository = MockTestRefreshTokenRepository::new();

        repository
            .expect_revoke()
            .withf(|token, _| token == "some-refresh-token")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repository);

        service
            .revoke(Some("Bearer some-refresh-token"))
            .await
            .expect("Revoke failed");
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let mut repository = MockTestRefreshTokenRepository::new();

        repository
            .expect_revoke()
            .times(1)
            .returning(|_, _| Err(AuthError::NotFound));

        let service = service(repository);

        let result = service.revoke(Some("Bearer unknown")).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_revoke_with_bad_header() {
        let repository = MockTestRefreshTokenRepository::new();
        let service = service(repository);

        let result = service.revoke(None).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[test]
    fn test_authenticate_header_failures_take_precedence() {
        let service = service(MockTestRefreshTokenRepository::new());

        assert!(matches!(
            service.authenticate(None),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            service.authenticate(Some("")),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            service.authenticate(Some("Bearer")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn test_authenticate_invalid_token() {
        let service = service(MockTestRefreshTokenRepository::new());

        let result = service.authenticate(Some("Bearer not.a.token"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_api_key() {
        let service = service(MockTestRefreshTokenRepository::new());

        service
            .verify_api_key(Some(&format!("ApiKey {}", API_KEY)))
            .expect("Valid key rejected");

        assert!(matches!(
            service.verify_api_key(Some("ApiKey wrong-key")),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            service.verify_api_key(Some(&format!("Bearer {}", API_KEY))),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            service.verify_api_key(None),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_password_roundtrip() {
        let service = service(MockTestRefreshTokenRepository::new());

        let hash = service.hash_password("password123").expect("Hash failed");

        assert!(service
            .verify_password("password123", &hash)
            .expect("Verify failed"));
        assert!(!service
            .verify_password("wrong_password", &hash)
            .expect("Verify failed"));
    }

    #[test]
    fn test_password_roundtrip_with_configured_hasher() {
        // Minimal costs to keep the test fast
        let hasher = PasswordHasher::with_params(8, 1, 1).expect("Failed to build hasher");
        let service = AuthService::new(
            Arc::new(MockTestRefreshTokenRepository::new()),
            SECRET,
            hasher,
            API_KEY.to_string(),
        );

        let hash = service.hash_password("password123").expect("Hash failed");
        assert!(service
            .verify_password("password123", &hash)
            .expect("Verify failed"));
    }

    // Stateful fake for flows that span several tokens
    #[derive(Default)]
    struct InMemoryRefreshTokenRepository {
        records: Mutex<HashMap<String, RefreshToken>>,
    }

    #[async_trait]
    impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
        async fn insert(&self, record: RefreshToken) -> Result<RefreshToken, AuthError> {
            let mut records = self.records.lock().unwrap();
            records.insert(record.token.clone(), record.clone());
            Ok(record)
        }

        async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
            Ok(self.records.lock().unwrap().get(token).cloned())
        }

        async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<(), AuthError> {
            let mut records = self.records.lock().unwrap();
            let record = records.get_mut(token).ok_or(AuthError::NotFound)?;
            record.revoked_at = Some(at);
            record.updated_at = at;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_revoking_one_login_leaves_the_other_valid() {
        let service = AuthService::new(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            SECRET,
            PasswordHasher::new(),
            API_KEY.to_string(),
        );
        let user_id = UserId::new();

        let first = service.login(user_id).await.expect("First login failed");
        let second = service.login(user_id).await.expect("Second login failed");
        assert_ne!(first.refresh_token, second.refresh_token);

        // Both tokens refresh independently
        service
            .refresh(Some(&format!("Bearer {}", first.refresh_token)))
            .await
            .expect("First token should refresh");
        service
            .refresh(Some(&format!("Bearer {}", second.refresh_token)))
            .await
            .expect("Second token should refresh");

        service
            .revoke(Some(&format!("Bearer {}", first.refresh_token)))
            .await
            .expect("Revoke failed");

        // The revoked token is dead, its sibling is untouched
        let result = service
            .refresh(Some(&format!("Bearer {}", first.refresh_token)))
            .await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));

        let access_token = service
            .refresh(Some(&format!("Bearer {}", second.refresh_token)))
            .await
            .expect("Second token should survive the first one's revocation");
        let authenticated = service
            .authenticate(Some(&format!("Bearer {}", access_token)))
            .expect("Failed to authenticate with refreshed token");
        assert_eq!(authenticated, user_id);
    }
}
