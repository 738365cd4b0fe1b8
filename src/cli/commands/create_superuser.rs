//! Create-superuser command handler

use crate::api::validation::{validate_email, validate_name, validate_password};
use crate::config::Config;
use crate::db::Store;
use crate::domain::NewAccount;
use crate::services::AccountError;
use crate::state::SharedState;

/// Environment variable read when `--password` is not given
pub const PASSWORD_ENV: &str = "TESSERA_SUPERUSER_PASSWORD";

pub async fn cmd_create_superuser(
    config: &Config,
    email: &str,
    name: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = validate_email(email)?;
    let name = validate_name(name)?;

    let password = password.or_else(|| std::env::var(PASSWORD_ENV).ok());
    if let Some(password) = &password {
        validate_password(password, config.security.min_password_length)?;
    }

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let shared = SharedState::with_store(config.clone(), store);

    let account = match shared
        .account_service
        .create_superuser(email, password.as_deref(), NewAccount::named(name))
        .await
    {
        Ok(account) => account,
        Err(AccountError::DuplicateEmail) => {
            anyhow::bail!("An account with email {email} already exists")
        }
        Err(e) => return Err(e.into()),
    };

    println!("Superuser created: {} (id {})", account.email, account.id);
    if password.is_none() {
        println!("No password given; the account cannot log in until one is set.");
    }

    Ok(())
}
