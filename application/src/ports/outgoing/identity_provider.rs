use std::sync::Arc;

use crate::error::AppResult;
use domain::identity::{IdentityAccount, IdpUid};

/// The identity provider as seen by this service.
#[async_trait::async_trait]
pub trait IdentityProviderPort: Send + Sync {
    /// Fails with `AppError::CredentialInvalid` for malformed, expired or unverifiable tokens.
    async fn verify_credential(&self, token: &str) -> AppResult<IdpUid>;

    /// Fails with `AppError::AccountNotFound` when the uid does not resolve.
    async fn get_account(&self, uid: &IdpUid) -> AppResult<IdentityAccount>;

    /// Unknown uids are omitted from the result, not reported as errors.
    async fn get_accounts(&self, uids: &[IdpUid]) -> AppResult<Vec<IdentityAccount>>;

    async fn ping(&self) -> AppResult<()>;
}

pub type DynIdentityProviderPort = Arc<dyn IdentityProviderPort>;
