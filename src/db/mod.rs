use crate::config::SecurityConfig;
use crate::domain::{Account, NewAccount, Privileges, UserId};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::CreateUserError;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    // ========== User Repository Methods ==========

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    /// Create a regular account: active, not staff, not superuser.
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: &NewAccount,
        config: &SecurityConfig,
    ) -> Result<Account, CreateUserError> {
        self.user_repo()
            .create(email, password, attributes, Privileges::regular(), config)
            .await
    }

    /// Create an administrative account: active, staff and superuser.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: &NewAccount,
        config: &SecurityConfig,
    ) -> Result<Account, CreateUserError> {
        self.user_repo()
            .create(
                email,
                password,
                attributes,
                Privileges::administrative(),
                config,
            )
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(Account, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<Account>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_credentials(
        &self,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        self.user_repo()
            .verify_credentials(email, password, config)
            .await
    }

    pub async fn record_user_login(&self, id: UserId) -> Result<()> {
        self.user_repo().record_login(id).await
    }

    // ========== Token Repository Methods ==========

    pub async fn get_or_create_token(&self, user_id: UserId) -> Result<String> {
        self.token_repo().get_or_create(user_id).await
    }

    pub async fn get_user_token(&self, user_id: UserId) -> Result<Option<String>> {
        self.token_repo().get_for_user(user_id).await
    }

    pub async fn find_account_by_token(&self, key: &str) -> Result<Option<Account>> {
        self.token_repo().find_account(key).await
    }
}
