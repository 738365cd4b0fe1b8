use serde::{Deserialize, Serialize};

use crate::domain::Account;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body of `POST /users/create`. Missing fields deserialize as empty and
/// are rejected by validation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Body of `POST /users/token`
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of an account; the password hash has no field here.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub email: String,
    pub name: String,
}

impl From<Account> for UserDto {
    fn from(account: Account) -> Self {
        Self {
            email: account.email,
            name: account.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentUserDto {
    pub email: String,
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
}

impl From<Account> for CurrentUserDto {
    fn from(account: Account) -> Self {
        Self {
            email: account.email,
            name: account.name,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            last_login: account.last_login,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
