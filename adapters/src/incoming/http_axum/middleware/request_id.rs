use std::time::Instant;

use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const API_PREFIX: &str = "/v1/";

/// Reuses a caller-supplied request id or mints a fresh one.
fn resolve_request_id(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.to_str().is_ok())
        .cloned()
        .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("unknown"))
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let path = request.uri().path().to_owned();
    if !path.starts_with(API_PREFIX) {
        let mut response = next.run(request).await;
        response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
        return response;
    }

    let span = info_span!(
        "profile_request",
        request_id = request_id.to_str().unwrap_or_default(),
        method = %request.method(),
        path = %path,
    );
    let started = Instant::now();
    info!(parent: &span, "Processing profile request");

    let mut response = next.run(request).instrument(span.clone()).await;

    info!(
        parent: &span,
        status = response.status().as_u16(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Profile request completed"
    );

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/v1/ping", get(|| async { StatusCode::NO_CONTENT }))
            .route("/health", get(|| async { StatusCode::OK }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn echoes_caller_request_id() {
        let request = Request::builder()
            .uri("/v1/ping")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn mints_request_id_when_missing_or_empty() {
        for header in [None, Some("")] {
            let mut builder = Request::builder().uri("/health");
            if let Some(value) = header {
                builder = builder.header(REQUEST_ID_HEADER, value);
            }
            let response = app()
                .oneshot(builder.body(Body::empty()).unwrap())
                .await
                .unwrap();

            let minted = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
            assert!(Uuid::parse_str(minted).is_ok());
        }
    }
}
