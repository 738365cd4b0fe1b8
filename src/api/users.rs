use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthenticatedUser;
use super::validation::{validate_email, validate_login_fields, validate_name, validate_password};
use super::{
    ApiError, ApiResponse, AppState, CreateUserRequest, CurrentUserDto, TokenRequest,
    TokenResponse, UserDto,
};
use crate::domain::NewAccount;

/// POST /users/create
/// Register a regular account. Returns the public profile, never the password.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let Json(payload) = payload?;

    let min_password_length = state.config().read().await.security.min_password_length;

    let email = validate_email(&payload.email)?;
    let password = validate_password(&payload.password, min_password_length)?;
    let name = validate_name(&payload.name)?;

    let account = state
        .account_service()
        .create_user(email, Some(password), NewAccount::named(name))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(account))),
    ))
}

/// POST /users/token
/// Exchange email and password for the account's API token
pub async fn create_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let Json(payload) = payload?;

    let (email, password) = validate_login_fields(&payload.email, &payload.password)?;

    let issued = state.account_service().issue_token(email, password).await?;

    Ok(Json(ApiResponse::success(TokenResponse {
        token: issued.token,
    })))
}

/// GET /users/me
/// Profile of the account owning the presented token
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<CurrentUserDto>>, ApiError> {
    let account = state.account_service().get_account(user.id).await?;

    Ok(Json(ApiResponse::success(CurrentUserDto::from(account))))
}
