//! Account model and construction rules.

use serde::Serialize;

use super::UserId;

/// A persisted user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Caller-supplied attributes for a new account.
///
/// Privilege flags are not part of this struct. They come from
/// [`Privileges`], chosen by the account factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
}

impl NewAccount {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Privilege flags written when an account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privileges {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Privileges {
    /// Flags for a regular, self-registered account.
    #[must_use]
    pub const fn regular() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    /// Flags for an operator-provisioned administrative account.
    #[must_use]
    pub const fn administrative() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}

/// Normalizes an email address used as a login identifier.
///
/// Surrounding whitespace is trimmed and the domain part (after the last `@`)
/// is lower-cased. The local part is case-sensitive and kept verbatim. Input
/// without an `@` is returned trimmed but otherwise unchanged.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();

    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => trimmed.to_string(),
    }
}
