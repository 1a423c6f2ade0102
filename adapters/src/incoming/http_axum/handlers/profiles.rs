#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::common_responses::{
    BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
    NotFoundResponse, UnauthorizedResponse,
};
#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::{ApiResponseProfile, ApiResponseProfileList};
use axum::{
    Json,
    extract::{Path, State},
};
use domain::profile::ReconciledProfile;

use crate::{
    incoming::http_axum::{
        core::extractors::{BearerToken, DeferredJson, ValidatedJson},
        dto::{
            requests::{BatchGetProfilesRequest, UpsertProfileRequest},
            responses::{ApiResponse, ProfileListResponse},
        },
        error_mapper::HttpError,
    },
    shared::app_state::AppState,
};

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/v1/authenticate",
    responses(
        (status = 200, description = "Credential verified; reconciled profile of the caller", body = ApiResponseProfile,
         example = json!({
             "ok": true,
             "data": {
                 "public_identifier": "ada.lovelace",
                 "idp_uid": "Yp3kW1bXq9T2",
                 "email": "ada@example.com"
             }
         })
        ),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles",
    summary = "Authenticate",
    description = "Verifies the bearer credential with the identity provider, requires a verified email and returns the caller's profile. `public_identifier` is empty until one has been claimed."
))]
pub async fn authenticate(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<ReconciledProfile>>, HttpError> {
    let profile = state.authenticate_use_case.authenticate(&token).await?;
    Ok(Json(ApiResponse::success_with_data(profile)))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/v1/profiles/{uid}",
    params(
        ("uid" = String, Path, description = "Identity provider UID")
    ),
    responses(
        (status = 200, description = "Reconciled profile for the UID", body = ApiResponseProfile),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profiles",
    summary = "Get profile",
    description = "Looks up one account by identity provider UID. No email verification gate applies."
))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ApiResponse<ReconciledProfile>>, HttpError> {
    let profile = state.profile_query_use_case.get_profile(&uid).await?;
    Ok(Json(ApiResponse::success_with_data(profile)))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/v1/profiles:batchGet",
    request_body = BatchGetProfilesRequest,
    responses(
        (status = 200, description = "Profiles for the UIDs the identity provider knows", body = ApiResponseProfileList),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profiles",
    summary = "Batch get profiles",
    description = "Resolves up to 1000 UIDs. Unknown UIDs are omitted; the result follows identity provider order."
))]
pub async fn batch_get_profiles(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BatchGetProfilesRequest>,
) -> Result<Json<ApiResponse<ProfileListResponse>>, HttpError> {
    let profiles = state
        .profile_query_use_case
        .list_profiles(&request.uids)
        .await?;
    Ok(Json(ApiResponse::success_with_data(ProfileListResponse {
        profiles,
    })))
}

#[cfg_attr(feature = "docs", utoipa::path(
    put,
    path = "/v1/profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile created or updated", body = ApiResponseProfile),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles",
    summary = "Upsert profile",
    description = "Claims or changes the public identifier of the authenticated account."
))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    DeferredJson(request): DeferredJson<UpsertProfileRequest>,
) -> Result<Json<ApiResponse<ReconciledProfile>>, HttpError> {
    // Credentials are checked before the body is judged.
    let request = match request {
        Ok(request) => request,
        Err(invalid_body) => {
            state.authenticate_use_case.authenticate(&token).await?;
            return Err(invalid_body.into());
        }
    };

    let profile = state
        .upsert_profile_use_case
        .upsert_profile(&token, &request.public_identifier)
        .await?;
    Ok(Json(ApiResponse::success_with_data(profile)))
}
