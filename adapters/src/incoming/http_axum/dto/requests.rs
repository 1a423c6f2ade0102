use serde::{Deserialize, Serialize};
#[cfg(feature = "docs")]
use utoipa::ToSchema;
use validator::Validate;

pub const MAX_BATCH_UIDS: usize = 1000;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Identity provider UIDs to resolve. Unknown UIDs are omitted from the result and duplicates are collapsed.",
    example = json!({
        "uids": ["Yp3kW1bXq9T2", "m4Rr8sLcA0vE"]
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchGetProfilesRequest {
    #[validate(length(max = 1000, message = "At most 1000 uids can be requested at once"))]
    pub uids: Vec<String>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Public identifier to claim for the authenticated account. Taken verbatim: ASCII letters, digits, '-', '_' and '.', starting with a letter or digit.",
    example = json!({
        "public_identifier": "ada.lovelace"
    })
))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    #[cfg_attr(feature = "docs", schema(example = "ada.lovelace"))]
    pub public_identifier: String,
}
