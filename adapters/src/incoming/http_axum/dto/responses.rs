use serde::Serialize;
#[cfg(feature = "docs")]
use utoipa::ToSchema;

use domain::profile::ReconciledProfile;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Standard API response wrapper with success indicator, optional error message, and optional data payload",
    example = json!({
        "ok": true,
        "data": {
            "public_identifier": "ada.lovelace",
            "idp_uid": "Yp3kW1bXq9T2",
            "email": "ada@example.com"
        }
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success_with_data(data: T) -> Self {
        Self {
            ok: true,
            error: None,
            data: Some(data),
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Profiles resolved from a batch request, in identity provider order",
    example = json!({
        "profiles": [
            { "public_identifier": "ada.lovelace", "idp_uid": "Yp3kW1bXq9T2", "email": "ada@example.com" },
            { "public_identifier": "", "idp_uid": "m4Rr8sLcA0vE", "email": "grace@example.com" }
        ]
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ReconciledProfile>,
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseProfile")]
pub struct ApiResponseProfile {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ReconciledProfile>,
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseProfileList")]
pub struct ApiResponseProfileList {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProfileListResponse>,
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseValue")]
pub struct ApiResponseValue {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
