use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::user::is_unique_violation;
use crate::domain::{Account, UserId};
use crate::entities::{auth_tokens, users};

/// Length in bytes of the random part of a token (hex encoded: 40 chars)
const TOKEN_BYTES: usize = 20;

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Return the user's token, creating one if it has none yet.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<String> {
        if let Some(existing) = self.get_for_user(user_id).await? {
            return Ok(existing);
        }

        let active = auth_tokens::ActiveModel {
            key: Set(generate_token_key()),
            user_id: Set(user_id.value()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(model.key),
            // Lost a race with a concurrent login for the same user
            Err(e) if is_unique_violation(&e) => self
                .get_for_user(user_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Token for user {user_id} vanished after conflict")),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to insert auth token")),
        }
    }

    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<String>> {
        let token = auth_tokens::Entity::find()
            .filter(auth_tokens::Column::UserId.eq(user_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query auth token by user")?;

        Ok(token.map(|t| t.key))
    }

    /// Resolve a presented token to its account
    pub async fn find_account(&self, key: &str) -> Result<Option<Account>> {
        let row = auth_tokens::Entity::find_by_id(key.to_string())
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query auth token")?;

        Ok(row.and_then(|(_, user)| user).map(Account::from))
    }
}

/// Generate a random token key (40 character hex string)
#[must_use]
pub fn generate_token_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; TOKEN_BYTES] = rng.random();

    bytes.iter().fold(String::with_capacity(TOKEN_BYTES * 2), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
