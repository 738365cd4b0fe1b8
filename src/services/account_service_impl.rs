//! `SeaORM` implementation of the `AccountService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::{Config, SecurityConfig};
use crate::db::Store;
use crate::domain::{Account, NewAccount, UserId};
use crate::services::account_service::{AccountError, AccountService, IssuedToken};

pub struct SeaOrmAccountService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn security(&self) -> SecurityConfig {
        self.config.read().await.security.clone()
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: NewAccount,
    ) -> Result<Account, AccountError> {
        let security = self.security().await;
        let account = self
            .store
            .create_user(email, password, &attributes, &security)
            .await?;

        metrics::counter!("accounts_created_total", "kind" => "regular").increment(1);
        info!(user_id = %account.id, "Account created");

        Ok(account)
    }

    async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: NewAccount,
    ) -> Result<Account, AccountError> {
        let security = self.security().await;
        let account = self
            .store
            .create_superuser(email, password, &attributes, &security)
            .await?;

        metrics::counter!("accounts_created_total", "kind" => "administrative").increment(1);
        info!(user_id = %account.id, "Administrative account created");

        Ok(account)
    }

    async fn issue_token(&self, email: &str, password: &str) -> Result<IssuedToken, AccountError> {
        let security = self.security().await;

        let Some(account) = self
            .store
            .verify_user_credentials(email, password, &security)
            .await?
        else {
            metrics::counter!("auth_failures_total", "stage" => "credentials").increment(1);
            warn!("Token request rejected: invalid credentials");
            return Err(AccountError::InvalidCredentials);
        };

        let token = self.store.get_or_create_token(account.id).await?;
        self.store.record_user_login(account.id).await?;

        metrics::counter!("auth_tokens_issued_total").increment(1);
        info!(user_id = %account.id, "Auth token issued");

        Ok(IssuedToken { token })
    }

    async fn authenticate_token(&self, token: &str) -> Result<Account, AccountError> {
        let account = self
            .store
            .find_account_by_token(token)
            .await?
            .ok_or(AccountError::Unauthorized)?;

        if !account.is_active {
            metrics::counter!("auth_failures_total", "stage" => "inactive").increment(1);
            return Err(AccountError::Unauthorized);
        }

        Ok(account)
    }

    async fn get_account(&self, id: UserId) -> Result<Account, AccountError> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)
    }
}
