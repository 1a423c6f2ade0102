use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::identity::{IdentityAccount, IdpUid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

/// Local extension of an identity provider account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub public_identifier: String,
    pub idp_uid: IdpUid,
}

/// Which uniqueness rule a profile write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileConflict {
    IdpUid,
    PublicIdentifier,
    Unknown,
}

impl fmt::Display for ProfileConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdpUid => f.write_str("idp_uid"),
            Self::PublicIdentifier => f.write_str("public_identifier"),
            Self::Unknown => f.write_str("unknown constraint"),
        }
    }
}

/// Merged read model returned to callers. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct ReconciledProfile {
    pub public_identifier: String,
    pub idp_uid: String,
    pub email: String,
}

impl ReconciledProfile {
    /// Joins an account with its local profile. A missing profile yields an empty identifier.
    pub fn reconcile(account: &IdentityAccount, profile: Option<&Profile>) -> Self {
        Self {
            public_identifier: profile
                .map(|p| p.public_identifier.clone())
                .unwrap_or_default(),
            idp_uid: account.uid.as_str().to_string(),
            email: account.email.clone(),
        }
    }
}
