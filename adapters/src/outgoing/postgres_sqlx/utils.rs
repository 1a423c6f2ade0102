use domain::profile::ProfileConflict;
use idprofile_application::error::{AppError, AppResult};
use std::{future::Future, time::Duration};
use tokio::time::timeout;

const IDP_UID_CONSTRAINT: &str = "profiles_idp_uid_key";
const PUBLIC_IDENTIFIER_CONSTRAINT: &str = "profiles_public_identifier_key";

pub struct PostgresExecutor {
    timeout_secs: u64,
}

impl PostgresExecutor {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Runs a query under the configured timeout. Unique violations become
    /// `AppError::ProfileAlreadyExists`, everything else a `DatabaseError`.
    pub async fn execute_with_timeout<T, F, Fut>(
        &self,
        operation: F,
        error_context: &str,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        timeout(Duration::from_secs(self.timeout_secs), operation())
            .await
            .map_err(|_| AppError::DatabaseError {
                message: "DB timeout".to_string(),
            })?
            .map_err(|e| map_sqlx_error(e, error_context))
    }
}

pub fn map_sqlx_error(error: sqlx::Error, error_context: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            return AppError::ProfileAlreadyExists {
                conflict: classify_unique_violation(db_err.constraint()),
            };
        }
    }

    AppError::DatabaseError {
        message: format!("{}: {}", error_context, error),
    }
}

pub fn classify_unique_violation(constraint: Option<&str>) -> ProfileConflict {
    match constraint {
        Some(IDP_UID_CONSTRAINT) => ProfileConflict::IdpUid,
        Some(PUBLIC_IDENTIFIER_CONSTRAINT) => ProfileConflict::PublicIdentifier,
        _ => ProfileConflict::Unknown,
    }
}
