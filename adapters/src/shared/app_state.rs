use std::sync::Arc;

use idprofile_application::{
    infrastructure_config::Config,
    ports::incoming::{
        health::HealthUseCase,
        profiles::{AuthenticateUseCase, ProfileQueryUseCase, UpsertProfileUseCase},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub authenticate_use_case: Arc<dyn AuthenticateUseCase + Send + Sync>,
    pub profile_query_use_case: Arc<dyn ProfileQueryUseCase + Send + Sync>,
    pub upsert_profile_use_case: Arc<dyn UpsertProfileUseCase + Send + Sync>,
    pub health_use_case: Arc<dyn HealthUseCase + Send + Sync>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        authenticate_use_case: Arc<dyn AuthenticateUseCase + Send + Sync>,
        profile_query_use_case: Arc<dyn ProfileQueryUseCase + Send + Sync>,
        upsert_profile_use_case: Arc<dyn UpsertProfileUseCase + Send + Sync>,
        health_use_case: Arc<dyn HealthUseCase + Send + Sync>,
    ) -> Self {
        Self {
            config,
            authenticate_use_case,
            profile_query_use_case,
            upsert_profile_use_case,
            health_use_case,
        }
    }
}
