use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DomainError, DomainResult};

/// Longest uid the identity provider will ever assign.
pub const MAX_UID_LENGTH: usize = 128;

/// Opaque account identifier assigned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdpUid(String);

impl IdpUid {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.is_empty() {
            return Err(DomainError::InvalidUid("uid cannot be empty".to_string()));
        }

        if raw.len() > MAX_UID_LENGTH {
            return Err(DomainError::InvalidUid(format!(
                "uid must be at most {MAX_UID_LENGTH} bytes"
            )));
        }

        Ok(Self(raw.to_string()))
    }

    /// Wraps a uid that already came back from the provider or the store.
    pub fn from_trusted(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IdpUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity provider's view of an account. Fetched on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAccount {
    pub uid: IdpUid,
    pub email: String,
    pub email_verified: bool,
}

impl IdentityAccount {
    pub fn new(uid: IdpUid, email: impl Into<String>, email_verified: bool) -> Self {
        Self {
            uid,
            email: email.into(),
            email_verified,
        }
    }
}
