use crate::error::AppResult;
use domain::profile::ReconciledProfile;

#[async_trait::async_trait]
pub trait AuthenticateUseCase: Send + Sync {
    async fn authenticate(&self, token: &str) -> AppResult<ReconciledProfile>;
}

#[async_trait::async_trait]
pub trait ProfileQueryUseCase: Send + Sync {
    async fn get_profile(&self, uid: &str) -> AppResult<ReconciledProfile>;

    async fn list_profiles(&self, uids: &[String]) -> AppResult<Vec<ReconciledProfile>>;
}

#[async_trait::async_trait]
pub trait UpsertProfileUseCase: Send + Sync {
    async fn upsert_profile(
        &self,
        token: &str,
        public_identifier: &str,
    ) -> AppResult<ReconciledProfile>;
}
