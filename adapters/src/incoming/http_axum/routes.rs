use axum::{
    Router, middleware,
    routing::{get, post, put},
};
#[cfg(feature = "docs")]
use utoipa::OpenApi;
#[cfg(feature = "docs")]
use utoipa_swagger_ui::SwaggerUi;

use crate::incoming::http_axum::{
    handlers::{
        health::health_check,
        profiles::{authenticate, batch_get_profiles, get_profile, upsert_profile},
    },
    middleware::request_id::request_id_middleware,
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::docs::ApiDoc;

pub fn build_application_router() -> Router<AppState> {
    let profile_routes = Router::new()
        .route("/v1/authenticate", post(authenticate))
        .route("/v1/profiles/{uid}", get(get_profile))
        .route("/v1/profiles:batchGet", post(batch_get_profiles))
        .route("/v1/profile", put(upsert_profile));

    let router = profile_routes
        .route("/health", get(health_check))
        .layer(middleware::from_fn(request_id_middleware));

    #[cfg(feature = "docs")]
    {
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    #[cfg(not(feature = "docs"))]
    {
        router
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use domain::profile::ReconciledProfile;
    use idprofile_application::{
        error::{AppError, AppResult, LookupFailure},
        health::service::{DependencyStatus, HealthReport, IDENTITY_PROVIDER, POSTGRES},
        infrastructure_config::Config,
        ports::incoming::{
            health::HealthUseCase,
            profiles::{AuthenticateUseCase, ProfileQueryUseCase, UpsertProfileUseCase},
        },
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::incoming::http_axum::middleware::request_id::REQUEST_ID_HEADER;

    /// Scripted use cases: token "good" belongs to u1, "unverified" fails the email gate.
    struct ScriptedUseCases {
        healthy: bool,
    }

    fn view(uid: &str, public_identifier: &str) -> ReconciledProfile {
        ReconciledProfile {
            public_identifier: public_identifier.to_string(),
            idp_uid: uid.to_string(),
            email: format!("{}@example.com", uid),
        }
    }

    fn check_token(token: &str) -> AppResult<()> {
        match token {
            "" => Err(AppError::Unauthenticated),
            "good" => Ok(()),
            "unverified" => Err(AppError::EmailNotVerified),
            _ => Err(AppError::TokenVerificationFailed {
                message: "INVALID_ID_TOKEN".to_string(),
            }),
        }
    }

    #[async_trait::async_trait]
    impl AuthenticateUseCase for ScriptedUseCases {
        async fn authenticate(&self, token: &str) -> AppResult<ReconciledProfile> {
            check_token(token)?;
            Ok(view("u1", "p1"))
        }
    }

    #[async_trait::async_trait]
    impl ProfileQueryUseCase for ScriptedUseCases {
        async fn get_profile(&self, uid: &str) -> AppResult<ReconciledProfile> {
            if uid == "u1" {
                Ok(view("u1", "p1"))
            } else {
                Err(AppError::ProfileLookupFailed {
                    reason: LookupFailure::NotFound,
                })
            }
        }

        async fn list_profiles(&self, uids: &[String]) -> AppResult<Vec<ReconciledProfile>> {
            Ok(uids
                .iter()
                .filter(|uid| uid.as_str() != "missing")
                .map(|uid| view(uid, ""))
                .collect())
        }
    }

    #[async_trait::async_trait]
    impl UpsertProfileUseCase for ScriptedUseCases {
        async fn upsert_profile(
            &self,
            token: &str,
            public_identifier: &str,
        ) -> AppResult<ReconciledProfile> {
            check_token(token)?;
            match public_identifier {
                "taken" => Err(AppError::PublicIdentifierTaken),
                "" => Err(AppError::InvalidProfileInput {
                    message: "public identifier must not be empty".to_string(),
                }),
                "boom" => Err(AppError::DatabaseError {
                    message: "pool timed out".to_string(),
                }),
                _ => Ok(view("u1", public_identifier)),
            }
        }
    }

    #[async_trait::async_trait]
    impl HealthUseCase for ScriptedUseCases {
        async fn check(&self) -> HealthReport {
            let store = if self.healthy {
                DependencyStatus::Up
            } else {
                DependencyStatus::Down {
                    error: "unreachable".to_string(),
                }
            };
            let dependencies = BTreeMap::from([
                (POSTGRES, store),
                (IDENTITY_PROVIDER, DependencyStatus::Up),
            ]);
            let operations = BTreeMap::from([("authenticate", self.healthy)]);
            HealthReport {
                dependencies,
                operations,
            }
        }
    }

    fn app(healthy: bool) -> Router {
        let use_cases = Arc::new(ScriptedUseCases { healthy });
        let state = AppState::new(
            Arc::new(Config::default()),
            Arc::clone(&use_cases) as Arc<dyn AuthenticateUseCase + Send + Sync>,
            Arc::clone(&use_cases) as Arc<dyn ProfileQueryUseCase + Send + Sync>,
            Arc::clone(&use_cases) as Arc<dyn UpsertProfileUseCase + Send + Sync>,
            use_cases as Arc<dyn HealthUseCase + Send + Sync>,
        );
        build_application_router().with_state(state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn authenticate_returns_the_callers_profile() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/authenticate")
            .header(header::AUTHORIZATION, "Bearer good")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "ok": true,
                "data": { "public_identifier": "p1", "idp_uid": "u1", "email": "u1@example.com" }
            })
        );
    }

    #[tokio::test]
    async fn missing_authorization_is_unauthenticated() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/authenticate")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn non_bearer_authorization_is_unauthenticated() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/authenticate")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unverified_email_is_forbidden() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/authenticate")
            .header(header::AUTHORIZATION, "Bearer unverified")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let request = Request::builder()
            .uri("/v1/profiles/u1")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn unknown_uid_is_not_found() {
        let request = Request::builder()
            .uri("/v1/profiles/nobody")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn batch_get_omits_unknown_uids() {
        let request = json_request(
            "POST",
            "/v1/profiles:batchGet",
            None,
            &json!({ "uids": ["a", "missing", "c"] }),
        );

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let uids: Vec<&str> = body["data"]["profiles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["idp_uid"].as_str().unwrap())
            .collect();
        assert_eq!(uids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn batch_get_rejects_more_than_a_thousand_uids() {
        let uids: Vec<String> = (0..1001).map(|i| format!("uid-{}", i)).collect();
        let request = json_request("POST", "/v1/profiles:batchGet", None, &json!({ "uids": uids }));

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let request = Request::builder()
            .method("PUT")
            .uri("/v1/profile")
            .header(header::AUTHORIZATION, "Bearer good")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"public_identifier\":"))
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn upsert_authenticates_before_reading_the_body() {
        let bodies = [None, Some("{}"), Some("{\"public_identifier\":")];

        for body in bodies {
            for (token, expected) in [
                (None, StatusCode::UNAUTHORIZED),
                (Some("forged"), StatusCode::UNAUTHORIZED),
                (Some("good"), StatusCode::BAD_REQUEST),
            ] {
                let mut builder = Request::builder().method("PUT").uri("/v1/profile");
                if let Some(token) = token {
                    builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
                }
                let request = match body {
                    Some(body) => builder
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                    None => builder.body(Body::empty()).unwrap(),
                };

                let response = app(true).oneshot(request).await.unwrap();
                assert_eq!(response.status(), expected, "token {:?} body {:?}", token, body);
            }
        }
    }

    #[tokio::test]
    async fn upsert_maps_outcomes_to_statuses() {
        let cases = [
            (Some("good"), "ada", StatusCode::OK),
            (Some("good"), "taken", StatusCode::CONFLICT),
            (Some("good"), "", StatusCode::BAD_REQUEST),
            (Some("good"), "boom", StatusCode::INTERNAL_SERVER_ERROR),
            (Some("forged"), "ada", StatusCode::UNAUTHORIZED),
            (None, "ada", StatusCode::UNAUTHORIZED),
        ];

        for (token, identifier, expected) in cases {
            let request = json_request(
                "PUT",
                "/v1/profile",
                token,
                &json!({ "public_identifier": identifier }),
            );
            let response = app(true).oneshot(request).await.unwrap();
            assert_eq!(response.status(), expected, "token {:?} id {:?}", token, identifier);
        }
    }

    #[tokio::test]
    async fn upsert_returns_the_new_identifier() {
        let request = json_request(
            "PUT",
            "/v1/profile",
            Some("good"),
            &json!({ "public_identifier": "ada.lovelace" }),
        );

        let response = app(true).oneshot(request).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["public_identifier"], "ada.lovelace");
        assert_eq!(body["data"]["idp_uid"], "u1");
    }

    #[tokio::test]
    async fn health_reports_unavailable_dependencies() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["data"]["dependencies"]["postgres"]["status"], "down");
        assert_eq!(body["data"]["dependencies"]["identity_provider"]["status"], "up");
    }

    #[tokio::test]
    async fn health_is_ok_when_dependencies_are_up() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
