use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::ports::incoming::health::HealthUseCase;
use crate::ports::outgoing::identity_provider::DynIdentityProviderPort;
use crate::ports::outgoing::profile_store::DynProfileStorePort;

pub const POSTGRES: &str = "postgres";
pub const IDENTITY_PROVIDER: &str = "identity_provider";

/// Reported for a failed ping; the cause is only logged.
pub const UNREACHABLE: &str = "unreachable";

/// Dependencies each exposed operation needs to succeed.
const OPERATION_DEPENDENCIES: [(&str, &[&str]); 4] = [
    ("authenticate", &[POSTGRES, IDENTITY_PROVIDER]),
    ("get_profile", &[POSTGRES, IDENTITY_PROVIDER]),
    ("list_profiles", &[POSTGRES, IDENTITY_PROVIDER]),
    ("upsert_profile", &[POSTGRES, IDENTITY_PROVIDER]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependencyStatus {
    Up,
    Down { error: String },
}

impl DependencyStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub dependencies: BTreeMap<&'static str, DependencyStatus>,
    pub operations: BTreeMap<&'static str, bool>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.dependencies.values().all(DependencyStatus::is_up)
    }
}

pub struct HealthService {
    identity_provider: DynIdentityProviderPort,
    profile_store: DynProfileStorePort,
}

impl HealthService {
    pub fn new(
        identity_provider: DynIdentityProviderPort,
        profile_store: DynProfileStorePort,
    ) -> Self {
        Self {
            identity_provider,
            profile_store,
        }
    }
}

#[async_trait::async_trait]
impl HealthUseCase for HealthService {
    async fn check(&self) -> HealthReport {
        let (store, idp) =
            futures::join!(self.profile_store.ping(), self.identity_provider.ping());

        let mut dependencies = BTreeMap::new();
        for (name, result) in [(POSTGRES, store), (IDENTITY_PROVIDER, idp)] {
            let status = match result {
                Ok(()) => DependencyStatus::Up,
                Err(e) => {
                    warn!(dependency = name, error = %e, "Dependency check failed");
                    DependencyStatus::Down {
                        error: UNREACHABLE.to_string(),
                    }
                }
            };
            dependencies.insert(name, status);
        }

        let operations = OPERATION_DEPENDENCIES
            .iter()
            .map(|(operation, needs)| {
                let available = needs
                    .iter()
                    .all(|dep| dependencies.get(dep).is_some_and(DependencyStatus::is_up));
                (*operation, available)
            })
            .collect();

        HealthReport {
            dependencies,
            operations,
        }
    }
}
