use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::{Account, NewAccount, Privileges, UserId, normalize_email};
use crate::entities::users;

/// Prefix marking a password hash that can never verify.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("User with email {0} already exists")]
    DuplicateEmail(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            email: model.email,
            name: model.name,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Normalize, hash and insert a new account with the given privileges.
    ///
    /// A `None` password stores an unusable hash. The unique index on `email`
    /// decides races between concurrent creations.
    pub async fn create(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: &NewAccount,
        privileges: Privileges,
        config: &SecurityConfig,
    ) -> Result<Account, CreateUserError> {
        let email = normalize_email(email);

        let password_hash = match password {
            Some(password) => {
                let password = password.to_string();
                let config = config.clone();
                task::spawn_blocking(move || hash_password(&password, Some(&config)))
                    .await
                    .context("Password hashing task panicked")??
            }
            None => make_unusable_password(),
        };

        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            email: Set(email.clone()),
            name: Set(attributes.name.clone()),
            password_hash: Set(password_hash),
            is_active: Set(privileges.is_active),
            is_staff: Set(privileges.is_staff),
            is_superuser: Set(privileges.is_superuser),
            last_login: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Account::from(model)),
            Err(e) if is_unique_violation(&e) => Err(CreateUserError::DuplicateEmail(email)),
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to insert user")
                .into()),
        }
    }

    /// Get account by email (normalized before lookup)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .get_by_email_with_password(email)
            .await?
            .map(|(account, _)| account))
    }

    /// Get account by email together with its stored password hash
    pub async fn get_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(Account, String)>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (Account::from(u), password_hash)
        }))
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<Account>> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(Account::from))
    }

    /// Check an email/password pair.
    ///
    /// Returns the account only if it exists, is active and the password
    /// matches. Argon2 runs in a blocking task; for unknown emails a throwaway
    /// hash is computed so the response time does not reveal which emails exist.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        let password = password.to_string();

        let Some((account, password_hash)) = self.get_by_email_with_password(email).await? else {
            let config = config.clone();
            task::spawn_blocking(move || hash_password(&password, Some(&config)))
                .await
                .context("Password hashing task panicked")??;
            return Ok(None);
        };

        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")?;

        if is_valid && account.is_active {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    /// Stamp `last_login` with the current time
    pub async fn record_login(&self, id: UserId) -> Result<()> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user for login update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.last_login = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
/// Unusable or malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if password_hash.starts_with(UNUSABLE_PASSWORD_PREFIX) {
        return false;
    }

    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash has an invalid format");
        return false;
    };

    // Params are read from the PHC string, so the default instance verifies any cost
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Marker stored for accounts created without a password.
#[must_use]
pub fn make_unusable_password() -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect();

    format!("{UNUSABLE_PASSWORD_PREFIX}{suffix}")
}
