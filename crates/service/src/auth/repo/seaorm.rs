use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username, email: u.email }
}

fn map_model_err(e: models::errors::ModelError) -> AuthError {
    match e {
        models::errors::ModelError::Validation(m) => AuthError::Validation(m),
        models::errors::ModelError::Conflict(_) => AuthError::Conflict,
        models::errors::ModelError::Db(m) => AuthError::Repository(m),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email)
            .await
            .map_err(map_model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_username_or_email(&self.db, username, email)
            .await
            .map_err(map_model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_id(&self.db, id)
            .await
            .map_err(map_model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(&self, username: &str, email: &str) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, username, email)
            .await
            .map_err(map_model_err)?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id)
            .await
            .map_err(map_model_err)?;
        Ok(res.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm)
            .await
            .map_err(map_model_err)?;
        Ok(Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        })
    }
}
