//! Request logging, HTTP metrics and response headers.

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::auth::AuthenticatedUser;

const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template of the handler that served a request, e.g. `/api/users/create`.
///
/// Set on the response by [`route_label_middleware`], which runs after routing,
/// and read back by [`logging_middleware`] for metric labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabel(pub String);

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Installed with `route_layer`, so only matched routes get a label.
pub async fn route_label_middleware(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());

    let mut response = next.run(req).await;
    if let Some(route) = route {
        response.extensions_mut().insert(RouteLabel(route));
    }
    response
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %req.uri().path(),
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let elapsed = start.elapsed();
        let status = response.status();

        let route = response
            .extensions()
            .get::<RouteLabel>()
            .map_or(UNMATCHED_ROUTE, |label| label.0.as_str())
            .to_owned();
        let caller = response
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|user| user.id.value());
        let auth = auth_outcome(caller.is_some(), status);

        let labels = [
            ("method", method.to_string()),
            ("route", route.clone()),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            event = "http_request_finished",
            route = %route,
            status_code = status.as_u16(),
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            auth,
            user_id = caller,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

/// How the caller identified itself: a valid token, a refused one, or nothing.
fn auth_outcome(authenticated: bool, status: StatusCode) -> &'static str {
    if authenticated {
        "token"
    } else if status == StatusCode::UNAUTHORIZED {
        "rejected"
    } else {
        "anonymous"
    }
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    // Token responses must not linger in shared caches
    headers.insert("cache-control", HeaderValue::from_static("no-store"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_outcome() {
        assert_eq!(auth_outcome(true, StatusCode::OK), "token");
        assert_eq!(auth_outcome(false, StatusCode::UNAUTHORIZED), "rejected");
        assert_eq!(auth_outcome(false, StatusCode::CREATED), "anonymous");
        assert_eq!(auth_outcome(false, StatusCode::BAD_REQUEST), "anonymous");
    }
}
