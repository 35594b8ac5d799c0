use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, Identity, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::TokenService;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new user with a hashed password and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() });
    /// let input = RegisterInput { username: "tester".into(), email: "user@example.com".into(), password: "Secret123".into(), confirm_password: "Secret123".into() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        if input.username.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
            || input.confirm_password.is_empty()
        {
            return Err(AuthError::Validation("Please fill in all fields".into()));
        }
        if input.password != input.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".into()));
        }
        if let Some(existing) = self
            .repo
            .find_user_by_username_or_email(&input.username, &input.email)
            .await?
        {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.username, &input.email).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(AuthSession { user, token })
    }

    /// Authenticate a user and issue a token.
    ///
    /// A missing user and a failed password comparison produce the same
    /// `Unauthorized` error, so a caller cannot tell which part was wrong.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "n".into(), email: "u@e.com".into(), password: "Passw0rd".into(), confirm_password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("Please provide email and password".into()));
        }

        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Resolve the current user from a verified token identity.
    pub async fn me(&self, user_id: Uuid) -> Result<AuthUser, AuthError> {
        self.repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    fn issue_token(&self, user: &AuthUser) -> Result<Option<String>, AuthError> {
        match &self.cfg.jwt_secret {
            Some(secret) => {
                let tokens = TokenService::new(secret.clone());
                let identity = Identity {
                    user_id: user.id,
                    email: user.email.clone(),
                    username: user.username.clone(),
                };
                Ok(Some(tokens.issue(&identity)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("test-secret".into()), password_algorithm: "argon2".into() },
        )
    }

    fn register_input(username: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let svc = svc();
        let session = svc
            .register(register_input("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(session.user.username, "alice");
        let token = session.token.expect("token issued");

        let login = svc
            .login(LoginInput { email: "alice@x.com".into(), password: "secret1".into() })
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);

        // The token identifies the same user it was minted for.
        let identity = TokenService::new("test-secret").verify(&token).unwrap();
        assert_eq!(identity.user_id, session.user.id);
        assert_eq!(identity.email, "alice@x.com");
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn register_rejects_blank_fields() {
        let svc = svc();
        let mut input = register_input("alice", "alice@x.com", "secret1");
        input.email = String::new();
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_password_mismatch() {
        let svc = svc();
        let mut input = register_input("alice", "alice@x.com", "secret1");
        input.confirm_password = "different".into();
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn register_conflicts_on_email_and_username() {
        let svc = svc();
        svc.register(register_input("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        // Same email, different username
        let err = svc
            .register(register_input("alice2", "alice@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));

        // Same username, different email
        let err = svc
            .register(register_input("alice", "other@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email_alike() {
        let svc = svc();
        svc.register(register_input("bob", "bob@x.com", "hunter22"))
            .await
            .unwrap();

        let wrong_pass = svc
            .login(LoginInput { email: "bob@x.com".into(), password: "nope".into() })
            .await
            .unwrap_err();
        let unknown = svc
            .login(LoginInput { email: "ghost@x.com".into(), password: "hunter22".into() })
            .await
            .unwrap_err();
        // Identical error for both failure modes.
        assert!(matches!(wrong_pass, AuthError::Unauthorized));
        assert!(matches!(unknown, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn me_returns_public_fields() {
        let svc = svc();
        let session = svc
            .register(register_input("carol", "carol@x.com", "pw12345"))
            .await
            .unwrap();
        let user = svc.me(session.user.id).await.unwrap();
        assert_eq!(user.email, "carol@x.com");

        let err = svc.me(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }
}
