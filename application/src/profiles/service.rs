use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult, LookupFailure};
use crate::ports::incoming::profiles::{
    AuthenticateUseCase, ProfileQueryUseCase, UpsertProfileUseCase,
};
use crate::ports::outgoing::identity_provider::DynIdentityProviderPort;
use crate::ports::outgoing::profile_store::DynProfileStorePort;
use crate::profiles::identifier_validator::PublicIdentifierValidator;
use crate::profiles::reconcile::{distinct_uids, join_accounts};
use domain::{
    identity::{IdentityAccount, IdpUid},
    profile::{Profile, ProfileConflict, ReconciledProfile},
};

/// Joins the identity provider's account view with the local profile store.
///
/// Every call goes back to the provider. Writes never check for an existing row first:
/// the store's uniqueness constraints decide between create and update.
pub struct ReconciliationService {
    identity_provider: DynIdentityProviderPort,
    profile_store: DynProfileStorePort,
    identifier_validator: PublicIdentifierValidator,
}

impl ReconciliationService {
    pub fn new(
        identity_provider: DynIdentityProviderPort,
        profile_store: DynProfileStorePort,
    ) -> Self {
        Self {
            identity_provider,
            profile_store,
            identifier_validator: PublicIdentifierValidator::new(),
        }
    }

    #[must_use]
    pub fn with_identifier_validator(mut self, validator: PublicIdentifierValidator) -> Self {
        self.identifier_validator = validator;
        self
    }

    async fn reconcile_account(&self, account: IdentityAccount) -> AppResult<ReconciledProfile> {
        let profile = match self.profile_store.get(&account.uid).await {
            Ok(profile) => Some(profile),
            Err(AppError::ProfileNotFound) => {
                debug!(uid = %account.uid, "No local profile yet");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(ReconciledProfile::reconcile(&account, profile.as_ref()))
    }

    async fn write_profile(&self, uid: &IdpUid, public_identifier: &str) -> AppResult<Profile> {
        let conflict = match self.profile_store.create(uid, public_identifier).await {
            Ok(profile) => {
                info!(uid = %uid, "Profile created");
                return Ok(profile);
            }
            Err(AppError::ProfileAlreadyExists { conflict }) => conflict,
            Err(e) => return Err(e),
        };

        debug!(uid = %uid, %conflict, "Create collided, updating existing profile");

        match self.profile_store.update(uid, public_identifier).await {
            Ok(profile) => {
                info!(uid = %uid, "Profile updated");
                Ok(profile)
            }
            Err(AppError::ProfileNotFound) if conflict == ProfileConflict::PublicIdentifier => {
                Err(AppError::PublicIdentifierTaken)
            }
            Err(AppError::ProfileNotFound) => {
                warn!(
                    uid = %uid,
                    %conflict,
                    "Profile vanished between create conflict and update"
                );
                Err(AppError::InternalServerError)
            }
            // Only public_identifier changes on update, so any collision here is on it.
            Err(AppError::ProfileAlreadyExists { .. }) => Err(AppError::PublicIdentifierTaken),
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl AuthenticateUseCase for ReconciliationService {
    #[instrument(skip(self, token))]
    async fn authenticate(&self, token: &str) -> AppResult<ReconciledProfile> {
        if token.is_empty() {
            return Err(AppError::Unauthenticated);
        }

        let uid = self
            .identity_provider
            .verify_credential(token)
            .await
            .map_err(|e| match e {
                AppError::CredentialInvalid { message } => {
                    AppError::TokenVerificationFailed { message }
                }
                other => other,
            })?;

        let account = self.identity_provider.get_account(&uid).await?;

        if !account.email_verified {
            return Err(AppError::EmailNotVerified);
        }

        self.reconcile_account(account).await
    }
}

#[async_trait::async_trait]
impl ProfileQueryUseCase for ReconciliationService {
    #[instrument(skip(self))]
    async fn get_profile(&self, uid: &str) -> AppResult<ReconciledProfile> {
        let not_found = || AppError::ProfileLookupFailed {
            reason: LookupFailure::NotFound,
        };

        let uid = IdpUid::parse(uid).map_err(|_| not_found())?;

        let account = match self.identity_provider.get_account(&uid).await {
            Ok(account) => account,
            Err(AppError::AccountNotFound) => return Err(not_found()),
            Err(e) => return Err(e),
        };

        self.reconcile_account(account).await
    }

    #[instrument(skip(self, uids), fields(requested = uids.len()))]
    async fn list_profiles(&self, uids: &[String]) -> AppResult<Vec<ReconciledProfile>> {
        let uids = distinct_uids(uids);
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let (accounts, profiles) = futures::try_join!(
            self.identity_provider.get_accounts(&uids),
            self.profile_store.list(&uids),
        )?;

        debug!(
            accounts = accounts.len(),
            profiles = profiles.len(),
            "Joining accounts with local profiles"
        );

        Ok(join_accounts(accounts, profiles))
    }
}

#[async_trait::async_trait]
impl UpsertProfileUseCase for ReconciliationService {
    #[instrument(skip(self, token))]
    async fn upsert_profile(
        &self,
        token: &str,
        public_identifier: &str,
    ) -> AppResult<ReconciledProfile> {
        let current = self.authenticate(token).await?;

        self.identifier_validator.validate(public_identifier)?;

        let uid = IdpUid::from_trusted(current.idp_uid);
        let profile = self.write_profile(&uid, public_identifier).await?;

        Ok(ReconciledProfile {
            public_identifier: profile.public_identifier,
            idp_uid: uid.into_inner(),
            email: current.email,
        })
    }
}
