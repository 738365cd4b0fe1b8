use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::UserId;

/// Identity attached to requests that passed token authentication.
/// Also copied onto the response for the request log.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: UserId,
}

/// Token authentication middleware. Accepts:
/// 1. `Authorization: Token <key>`
/// 2. `Authorization: Bearer <key>`
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(&headers) else {
        return Err(ApiError::Unauthorized(
            "Authentication credentials were not provided".to_string(),
        ));
    };

    let account = state.account_service().authenticate_token(&token).await?;

    tracing::Span::current().record("user_id", account.id.value());
    let user = AuthenticatedUser { id: account.id };
    request.extensions_mut().insert(user);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Extract the token from the `Authorization` header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("Authorization")?.to_str().ok()?;

    let token = auth_str
        .strip_prefix("Token ")
        .or_else(|| auth_str.strip_prefix("Bearer "))?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_token_schemes() {
        assert_eq!(
            extract_token(&headers_with("Token abc123")).as_deref(),
            Some("abc123")
        );
        assert_eq!(
            extract_token(&headers_with("Bearer abc123 ")).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_extract_token_rejects_other_schemes() {
        assert!(extract_token(&HeaderMap::new()).is_none());
        assert!(extract_token(&headers_with("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_token(&headers_with("Token ")).is_none());
        assert!(extract_token(&headers_with("abc123")).is_none());
    }
}
