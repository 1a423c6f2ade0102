use std::sync::Arc;

use crate::error::AppResult;
use domain::{identity::IdpUid, profile::Profile};

/// Durable storage for local profiles, keyed by IdP uid.
///
/// Implementations must report a missing row as `AppError::ProfileNotFound` and any
/// uniqueness violation as `AppError::ProfileAlreadyExists`, naming the constraint that
/// fired when the backend exposes it. There is deliberately no upsert primitive here.
#[async_trait::async_trait]
pub trait ProfileStorePort: Send + Sync {
    async fn get(&self, idp_uid: &IdpUid) -> AppResult<Profile>;

    /// Returns only the rows that exist, in no particular order, one per distinct uid.
    async fn list(&self, idp_uids: &[IdpUid]) -> AppResult<Vec<Profile>>;

    async fn create(&self, idp_uid: &IdpUid, public_identifier: &str) -> AppResult<Profile>;

    async fn update(&self, idp_uid: &IdpUid, public_identifier: &str) -> AppResult<Profile>;

    async fn ping(&self) -> AppResult<()>;
}

pub type DynProfileStorePort = Arc<dyn ProfileStorePort>;
