use crate::incoming::http_axum::{dto, handlers};
use domain::profile::ReconciledProfile;
use dto::common_responses::{
    BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
    NotFoundResponse, UnauthorizedResponse,
};
use dto::requests::{BatchGetProfilesRequest, UpsertProfileRequest};
use dto::responses::{
    ApiResponseProfile, ApiResponseProfileList, ApiResponseValue, ProfileListResponse,
};
use utoipa::openapi::{
    self,
    security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa::{Modify, OpenApi};

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, doc: &mut openapi::OpenApi) {
        let components = doc.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::profiles::authenticate,
        handlers::profiles::get_profile,
        handlers::profiles::batch_get_profiles,
        handlers::profiles::upsert_profile,
        handlers::health::health_check,
    ),
    components(
        schemas(
            BatchGetProfilesRequest,
            UpsertProfileRequest,
            ReconciledProfile,
            ProfileListResponse,
            ApiResponseProfile,
            ApiResponseProfileList,
            ApiResponseValue
        ),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "profiles", description = "Identity reconciliation - authenticate callers and read or claim public identifiers for identity provider accounts"),
        (name = "system", description = "Dependency health and operation availability")
    ),
    info(
        title = "Identity Profile Service API",
        description = "Joins identity provider accounts (email, verification state) with locally owned profiles keyed by identity provider UID.",
        contact(
            name = "idprofile",
        ),
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    )
)]
pub struct ApiDoc;
