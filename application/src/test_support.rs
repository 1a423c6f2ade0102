use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::identity_provider::IdentityProviderPort;
use crate::ports::outgoing::profile_store::ProfileStorePort;
use domain::{
    identity::{IdentityAccount, IdpUid},
    profile::{Profile, ProfileConflict, ProfileId},
};

fn uid(raw: &str) -> IdpUid {
    IdpUid::from_trusted(raw.to_string())
}

/// Store fake enforcing both uniqueness rules the way the Postgres schema does.
#[derive(Default)]
pub struct InMemoryProfileStore {
    rows: Mutex<Vec<Profile>>,
    unavailable: AtomicBool,
    failing_creates: AtomicBool,
    failing_updates: AtomicBool,
    forced_conflict: Mutex<Option<ProfileConflict>>,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, idp_uid: &str, public_identifier: &str) -> Self {
        self.rows.lock().unwrap().push(Profile {
            id: ProfileId::new(),
            public_identifier: public_identifier.to_string(),
            idp_uid: uid(idp_uid),
        });
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fails only `create` with a database error.
    pub fn fail_creates(&self) {
        self.failing_creates.store(true, Ordering::SeqCst);
    }

    /// Fails only `update` with a database error.
    pub fn fail_updates(&self) {
        self.failing_updates.store(true, Ordering::SeqCst);
    }

    /// Makes every create fail with the given conflict, regardless of stored rows.
    pub fn force_create_conflict(&self, conflict: Option<ProfileConflict>) {
        *self.forced_conflict.lock().unwrap() = conflict;
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn identifier_of(&self, idp_uid: &str) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.idp_uid.as_str() == idp_uid)
            .map(|p| p.public_identifier.clone())
    }

    fn check_available(&self) -> AppResult<()> {
        self.check_flag(&self.unavailable)
    }

    fn check_flag(&self, failing: &AtomicBool) -> AppResult<()> {
        if failing.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStorePort for InMemoryProfileStore {
    async fn get(&self, idp_uid: &IdpUid) -> AppResult<Profile> {
        self.check_available()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.idp_uid == idp_uid)
            .cloned()
            .ok_or(AppError::ProfileNotFound)
    }

    async fn list(&self, idp_uids: &[IdpUid]) -> AppResult<Vec<Profile>> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| idp_uids.contains(&p.idp_uid))
            .cloned()
            .collect())
    }

    async fn create(&self, idp_uid: &IdpUid, public_identifier: &str) -> AppResult<Profile> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.check_flag(&self.failing_creates)?;

        if let Some(conflict) = *self.forced_conflict.lock().unwrap() {
            return Err(AppError::ProfileAlreadyExists { conflict });
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| &p.idp_uid == idp_uid) {
            return Err(AppError::ProfileAlreadyExists {
                conflict: ProfileConflict::IdpUid,
            });
        }
        if rows.iter().any(|p| p.public_identifier == public_identifier) {
            return Err(AppError::ProfileAlreadyExists {
                conflict: ProfileConflict::PublicIdentifier,
            });
        }

        let profile = Profile {
            id: ProfileId::new(),
            public_identifier: public_identifier.to_string(),
            idp_uid: idp_uid.clone(),
        };
        rows.push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, idp_uid: &IdpUid, public_identifier: &str) -> AppResult<Profile> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.check_flag(&self.failing_updates)?;

        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|p| p.public_identifier == public_identifier && &p.idp_uid != idp_uid)
        {
            return Err(AppError::ProfileAlreadyExists {
                conflict: ProfileConflict::PublicIdentifier,
            });
        }

        let row = rows
            .iter_mut()
            .find(|p| &p.idp_uid == idp_uid)
            .ok_or(AppError::ProfileNotFound)?;
        row.public_identifier = public_identifier.to_string();
        Ok(row.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

/// Provider fake: tokens map to uids, accounts are returned in insertion order.
#[derive(Default)]
pub struct FakeIdentityProvider {
    tokens: Vec<(String, IdpUid)>,
    accounts: Vec<IdentityAccount>,
    unavailable: AtomicBool,
    verify_calls: AtomicUsize,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, idp_uid: &str, email: &str, email_verified: bool) -> Self {
        self.accounts
            .push(IdentityAccount::new(uid(idp_uid), email, email_verified));
        self
    }

    pub fn with_token(mut self, token: &str, idp_uid: &str) -> Self {
        self.tokens.push((token.to_string(), uid(idp_uid)));
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError {
                message: "identity provider unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityProviderPort for FakeIdentityProvider {
    async fn verify_credential(&self, token: &str) -> AppResult<IdpUid> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.tokens
            .iter()
            .find(|(known, _)| known == token)
            .map(|(_, uid)| uid.clone())
            .ok_or_else(|| AppError::CredentialInvalid {
                message: "INVALID_ID_TOKEN".to_string(),
            })
    }

    async fn get_account(&self, uid: &IdpUid) -> AppResult<IdentityAccount> {
        self.check_available()?;
        self.accounts
            .iter()
            .find(|a| &a.uid == uid)
            .cloned()
            .ok_or(AppError::AccountNotFound)
    }

    async fn get_accounts(&self, uids: &[IdpUid]) -> AppResult<Vec<IdentityAccount>> {
        self.check_available()?;
        Ok(self
            .accounts
            .iter()
            .filter(|a| uids.contains(&a.uid))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}
