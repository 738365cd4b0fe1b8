//! Domain service for account creation and token authentication.
//!
//! Handles the two account factories, credential exchange for a token, and
//! resolving a presented token back to its account.

use thiserror::Error;

use crate::db::CreateUserError;
use crate::domain::{Account, NewAccount, UserId};

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CreateUserError> for AccountError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::DuplicateEmail(_) => Self::DuplicateEmail,
            CreateUserError::Other(e) => Self::from(e),
        }
    }
}

/// Issued token DTO.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates a regular account (active, not staff, not superuser).
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateEmail`] if the normalized email is taken.
    async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: NewAccount,
    ) -> Result<Account, AccountError>;

    /// Creates an administrative account (active, staff and superuser).
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateEmail`] if the normalized email is taken.
    async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: NewAccount,
    ) -> Result<Account, AccountError>;

    /// Verifies credentials and returns the account's token, minting one on first use.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for unknown emails,
    /// inactive accounts and wrong passwords alike.
    async fn issue_token(&self, email: &str, password: &str) -> Result<IssuedToken, AccountError>;

    /// Resolves a presented token to an active account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Unauthorized`] if the token is unknown or the
    /// account is inactive.
    async fn authenticate_token(&self, token: &str) -> Result<Account, AccountError>;

    /// Gets an account by id.
    async fn get_account(&self, id: UserId) -> Result<Account, AccountError>;
}
