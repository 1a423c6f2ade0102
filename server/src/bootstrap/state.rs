use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use idprofile_adapters::outgoing::{
    identity_toolkit_reqwest::identity_toolkit_adapter::IdentityToolkitAdapter,
    postgres_sqlx::{
        migrations::run_migrations, profile_store_postgres::PostgresProfileStoreAdapter,
    },
};
use idprofile_adapters::shared::app_state::AppState as AdaptersAppState;
use idprofile_application::error::AppError;
use idprofile_application::infrastructure_config::Config;
use idprofile_application::ports::incoming::{
    health::HealthUseCase,
    profiles::{AuthenticateUseCase, ProfileQueryUseCase, UpsertProfileUseCase},
};
use idprofile_application::ports::outgoing::{
    identity_provider::DynIdentityProviderPort, profile_store::DynProfileStorePort,
};
use idprofile_application::{
    health::service::HealthService,
    profiles::{identifier_validator::PublicIdentifierValidator, service::ReconciliationService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    db_pool: PgPool,
    pub reconciliation_service: Arc<ReconciliationService>,
    pub health_service: Arc<HealthService>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let db_pool = Self::create_database_pool(&config).await?;
        info!("Connected to database {}", config.db.redacted_url());
        if config.db.run_migrations {
            run_migrations(&db_pool).await?;
        }

        let profile_store: DynProfileStorePort = Arc::new(PostgresProfileStoreAdapter::new(
            db_pool.clone(),
            config.db.query_timeout_secs,
        ));
        let identity_provider: DynIdentityProviderPort =
            Arc::new(IdentityToolkitAdapter::new(&config.identity_provider)?);

        let reconciliation_service = Arc::new(
            ReconciliationService::new(Arc::clone(&identity_provider), Arc::clone(&profile_store))
                .with_identifier_validator(PublicIdentifierValidator::from_config(
                    &config.profiles,
                )),
        );
        let health_service = Arc::new(HealthService::new(identity_provider, profile_store));

        Ok(Self {
            config,
            db_pool,
            reconciliation_service,
            health_service,
        })
    }

    async fn create_database_pool(config: &Config) -> Result<PgPool, AppError> {
        PgPoolOptions::new()
            .max_connections(config.db.pool_size)
            .acquire_timeout(Duration::from_secs(config.db.query_timeout_secs))
            .connect(config.db.database_url())
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to connect to database: {}", e),
            })
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn to_adapters_state(self) -> AdaptersAppState {
        AdaptersAppState::new(
            self.config,
            Arc::clone(&self.reconciliation_service) as Arc<dyn AuthenticateUseCase + Send + Sync>,
            Arc::clone(&self.reconciliation_service) as Arc<dyn ProfileQueryUseCase + Send + Sync>,
            self.reconciliation_service as Arc<dyn UpsertProfileUseCase + Send + Sync>,
            self.health_service as Arc<dyn HealthUseCase + Send + Sync>,
        )
    }
}
