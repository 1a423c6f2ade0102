use crate::health::service::HealthReport;

#[async_trait::async_trait]
pub trait HealthUseCase: Send + Sync {
    async fn check(&self) -> HealthReport;
}
