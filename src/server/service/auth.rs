//! Account registration and credential checks.

use sea_orm::{DatabaseConnection, SqlErr};

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::{
        setting::SettingKey,
        user::{CreateUserParam, User},
    },
    service::setting::bool_setting,
    util::{password, validate},
};

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Returns
    /// - `Ok(User)` - The created account
    /// - `Err(AppError::BadRequest)` - Invalid email, name or password
    /// - `Err(AuthError::RegistrationClosed)` - Registration is turned off
    /// - `Err(AppError::Conflict)` - Email already registered
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = validate::email(email)?;
        let name = validate::text("name", name, 1, 100)?;
        validate::password(password)?;

        if !bool_setting(self.db, SettingKey::RegistrationOpen).await? {
            return Err(AuthError::RegistrationClosed.into());
        }

        let user_repo = UserRepository::new(self.db);
        if user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = password::hash_password(password)?;

        let user = user_repo
            .create(CreateUserParam {
                email,
                name,
                password_hash,
            })
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Email is already registered".to_string())
                }
                _ => e.into(),
            })?;

        tracing::info!("Registered user {}", user.id);

        Ok(user)
    }

    /// Checks credentials and returns the account.
    ///
    /// Unknown emails, wrong passwords and deactivated accounts all fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();

        let Some((user, hash)) = UserRepository::new(self.db)
            .find_credentials_by_email(&email)
            .await?
        else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !password::verify_password(password, &hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active() {
            tracing::info!("Deactivated user {} attempted to log in", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }
}
