use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::AccountError;

const INVALID_BODY_MESSAGE: &str = "Invalid request body";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::ValidationError(msg),
            AccountError::DuplicateEmail => {
                ApiError::validation("email: user with this email already exists")
            }
            AccountError::InvalidCredentials => {
                ApiError::validation("Unable to authenticate with provided credentials")
            }
            AccountError::Unauthorized => {
                ApiError::Unauthorized("Invalid or missing token".to_string())
            }
            AccountError::NotFound => ApiError::NotFound("User not found".to_string()),
            AccountError::Database(msg) => ApiError::DatabaseError(msg),
            AccountError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Malformed or missing JSON bodies are client errors like any other validation failure.
/// The rejection text can quote submitted values, so it only goes to the debug log.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), detail = %rejection.body_text(), "Rejected request body");
        ApiError::validation(INVALID_BODY_MESSAGE)
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_errors_map_to_client_errors() {
        let cases = [
            (AccountError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (AccountError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                AccountError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AccountError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AccountError::NotFound, StatusCode::NOT_FOUND),
            (
                AccountError::Database("locked".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_json_rejection_does_not_echo_submitted_values() {
        use axum::{body::Body, extract::FromRequest, http::Request};
        use http_body_util::BodyExt;

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Login {
            password: String,
        }

        let request = Request::builder()
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"password": 98765432}"#))
            .unwrap();

        let rejection = Json::<Login>::from_request(request, &())
            .await
            .unwrap_err();
        let response = ApiError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("98765432"));
        assert!(body.contains(INVALID_BODY_MESSAGE));
    }
}
