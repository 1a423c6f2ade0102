use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use domain::{
    identity::IdpUid,
    profile::{Profile, ProfileId},
};
use idprofile_application::{
    error::{AppError, AppResult},
    ports::outgoing::profile_store::ProfileStorePort,
};

use super::utils::PostgresExecutor;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    public_identifier: String,
    idp_uid: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: ProfileId::from_uuid(row.id),
            public_identifier: row.public_identifier,
            idp_uid: IdpUid::from_trusted(row.idp_uid),
        }
    }
}

pub struct PostgresProfileStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresProfileStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStorePort for PostgresProfileStoreAdapter {
    #[instrument(skip(self))]
    async fn get(&self, idp_uid: &IdpUid) -> AppResult<Profile> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r#"
                    SELECT id, public_identifier, idp_uid
                    FROM profiles
                    WHERE idp_uid = $1
                    "#,
                    )
                    .bind(idp_uid.as_str())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to find profile for uid {}", idp_uid),
            )
            .await?;

        if let Some(row) = row {
            debug!("Found profile {} for uid {}", row.id, idp_uid);
            Ok(row.into())
        } else {
            debug!("Profile for uid {} not found", idp_uid);
            Err(AppError::ProfileNotFound)
        }
    }

    #[instrument(skip(self, idp_uids), fields(requested = idp_uids.len()))]
    async fn list(&self, idp_uids: &[IdpUid]) -> AppResult<Vec<Profile>> {
        if idp_uids.is_empty() {
            return Ok(Vec::new());
        }

        let uids: Vec<&str> = idp_uids.iter().map(IdpUid::as_str).collect();

        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r#"
                    SELECT id, public_identifier, idp_uid
                    FROM profiles
                    WHERE idp_uid = ANY($1)
                    "#,
                    )
                    .bind(&uids)
                    .fetch_all(&self.pool)
                },
                "Failed to list profiles",
            )
            .await?;

        debug!("Found {} of {} requested profiles", rows.len(), uids.len());
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, idp_uid: &IdpUid, public_identifier: &str) -> AppResult<Profile> {
        let profile_id = ProfileId::new();

        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r#"
                    INSERT INTO profiles (id, public_identifier, idp_uid)
                    VALUES ($1, $2, $3)
                    RETURNING id, public_identifier, idp_uid
                    "#,
                    )
                    .bind(profile_id.as_uuid())
                    .bind(public_identifier)
                    .bind(idp_uid.as_str())
                    .fetch_one(&self.pool)
                },
                &format!("Failed to create profile for uid {}", idp_uid),
            )
            .await?;

        debug!("Created profile {} for uid {}", row.id, idp_uid);
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn update(&self, idp_uid: &IdpUid, public_identifier: &str) -> AppResult<Profile> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r#"
                    UPDATE profiles
                    SET public_identifier = $2
                    WHERE idp_uid = $1
                    RETURNING id, public_identifier, idp_uid
                    "#,
                    )
                    .bind(idp_uid.as_str())
                    .bind(public_identifier)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to update profile for uid {}", idp_uid),
            )
            .await?;

        let Some(row) = row else {
            debug!("No profile to update for uid {}", idp_uid);
            return Err(AppError::ProfileNotFound);
        };

        debug!("Updated profile {} for uid {}", row.id, idp_uid);
        Ok(row.into())
    }

    async fn ping(&self) -> AppResult<()> {
        self.executor
            .execute_with_timeout(
                || sqlx::query("SELECT 1").execute(&self.pool),
                "Postgres ping failed",
            )
            .await?;
        Ok(())
    }
}
