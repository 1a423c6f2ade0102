use axum::{Json, extract::State, http::StatusCode};

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ApiResponseValue;
use crate::incoming::http_axum::dto::responses::ApiResponse;
use crate::shared::app_state::AppState;
use idprofile_application::health::service::HealthReport;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All dependencies reachable", body = ApiResponseValue,
         example = json!({
             "ok": true,
             "data": {
                 "dependencies": {
                     "identity_provider": { "status": "up" },
                     "postgres": { "status": "up" }
                 },
                 "operations": {
                     "authenticate": true,
                     "get_profile": true,
                     "list_profiles": true,
                     "upsert_profile": true
                 }
             }
         })
        ),
        (status = 503, description = "At least one dependency is down", body = ApiResponseValue)
    ),
    tag = "system",
    summary = "Dependency health check",
    description = "Pings Postgres and the identity provider and reports which operations are currently available.",
    operation_id = "health_check"
))]
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthReport>>) {
    let report = state.health_use_case.check().await;
    let healthy = report.is_healthy();

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse {
            ok: healthy,
            error: None,
            data: Some(report),
        }),
    )
}
