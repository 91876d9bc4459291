use std::collections::HashMap;
use std::sync::Arc;

use auth::AuthService;
use auth::IssuedToken;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Domain service for registration, login, logout, and identity lookup.
///
/// Coordinates the repository with the authentication core; holds no mutable
/// state of its own.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    auth: Arc<AuthService>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, auth: Arc<AuthService>) -> Self {
        Self { repository, auth }
    }

    /// Register a new user and issue their first access token.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn register(
        &self,
        command: RegisterUserCommand,
    ) -> Result<(User, IssuedToken), UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self.auth.hash_password(&command.password)?;

        let user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
            })
            .await?;

        let mut extra_claims = HashMap::new();
        extra_claims.insert("email".to_string(), serde_json::json!(user.email.as_str()));

        let issued = self.auth.generate_token(user.id, extra_claims)?;

        Ok((user, issued))
    }

    /// Authenticate credentials and issue an access token.
    ///
    /// Unknown email and wrong password collapse to the same error so callers
    /// learn nothing about which check failed.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password mismatch
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<(User, IssuedToken), UserError> {
        let user = self
            .repository
            .find_by_email(email.as_str())
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.auth.verify_password(password, &user.password_hash) {
            return Err(UserError::InvalidCredentials);
        }

        let mut extra_claims = HashMap::new();
        extra_claims.insert("email".to_string(), serde_json::json!(user.email.as_str()));
        extra_claims.insert("name".to_string(), serde_json::json!(user.name));

        let issued = self.auth.generate_token(user.id, extra_claims)?;

        Ok((user, issued))
    }

    /// Revoke a presented token. Always a safe call: `false` means the token
    /// could not be decoded and nothing was recorded.
    pub fn logout(&self, token: &str) -> bool {
        self.auth.revoke_token(token)
    }

    /// Resolve a user id (from a verified token subject) to the persisted
    /// record.
    ///
    /// # Errors
    /// * `NotFound` - The identity the token names no longer exists
    /// * `DatabaseError` - Database operation failed
    pub async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::AuthConfig;
    use chrono::Utc;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
        }
    }

    fn auth_service() -> Arc<AuthService> {
        Arc::new(
            AuthService::new(AuthConfig {
                secret: "test_secret_key_at_least_32_bytes!".to_string(),
                algorithm: "HS256".to_string(),
                issuer: "test-issuer".to_string(),
                audience: None,
                ttl_minutes: 30,
            })
            .expect("Failed to build auth service"),
        )
    }

    fn user(id: i64, email: &str, password_hash: &str) -> User {
        User {
            id: UserId(id),
            name: "Alice".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success_issues_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(|_| Ok(None));

        repository
            .expect_create()
            .withf(|new_user| {
                new_user.email.as_str() == "a@x.com"
                    && new_user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: UserId(1),
                    name: new_user.name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let auth = auth_service();
        let service = UserService::new(Arc::new(repository), Arc::clone(&auth));

        let (created, issued) = service
            .register(RegisterUserCommand {
                name: "Alice".to_string(),
                email: EmailAddress::new("a@x.com".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await
            .expect("Registration failed");

        assert_eq!(created.id, UserId(1));
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 30 * 60);

        let verification = auth.verify_token(&issued.access_token);
        let claims = verification.claims().expect("issued token should verify");
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.token_use, "access");
        assert_eq!(claims.extra_str("email"), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_conflict() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(user(1, "a@x.com", "$argon2id$existing"))));

        // No insert attempted for a duplicate
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), auth_service());

        let result = service
            .register(RegisterUserCommand {
                name: "Alice".to_string(),
                email: EmailAddress::new("a@x.com".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success_claims_carry_identity() {
        let auth = auth_service();
        let password_hash = auth.hash_password("correct-horse").unwrap();

        let mut repository = MockTestUserRepository::new();
        let stored = user(7, "a@x.com", &password_hash);
        repository
            .expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(repository), Arc::clone(&auth));

        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        let (logged_in, issued) = service
            .login(&email, "correct-horse")
            .await
            .expect("Login failed");

        assert_eq!(logged_in.id, UserId(7));

        let verification = auth.verify_token(&issued.access_token);
        let claims = verification.claims().expect("issued token should verify");
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.extra_str("email"), Some("a@x.com"));
        assert_eq!(claims.extra_str("name"), Some("Alice"));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let auth = auth_service();
        let password_hash = auth.hash_password("correct-horse").unwrap();

        let mut repository = MockTestUserRepository::new();
        let stored = user(7, "a@x.com", &password_hash);
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(repository), auth);

        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        let result = service.login(&email, "battery-staple").await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_same_error() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), auth_service());

        let email = EmailAddress::new("nobody@x.com".to_string()).unwrap();
        let result = service.login(&email, "whatever").await;

        // Indistinguishable from a wrong password
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_logout_invalidates_presented_token() {
        let auth = auth_service();
        let password_hash = auth.hash_password("correct-horse").unwrap();

        let mut repository = MockTestUserRepository::new();
        let stored = user(7, "a@x.com", &password_hash);
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(repository), Arc::clone(&auth));

        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        let (_, issued) = service
            .login(&email, "correct-horse")
            .await
            .expect("Login failed");

        assert!(auth.verify_token(&issued.access_token).is_valid());
        assert!(service.logout(&issued.access_token));
        assert!(!auth.verify_token(&issued.access_token).is_valid());

        // Logout of garbage never errors, just reports false
        assert!(!service.logout("not-a-token"));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), auth_service());

        let result = service.get_user(&UserId(99)).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
