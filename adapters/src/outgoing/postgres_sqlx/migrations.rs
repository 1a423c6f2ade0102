use idprofile_application::error::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::DatabaseError {
            message: format!("Failed to run migrations: {e}"),
        })?;

    info!("Database migrations applied");
    Ok(())
}
