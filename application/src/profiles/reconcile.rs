use std::collections::{HashMap, HashSet};

use domain::{
    identity::{IdentityAccount, IdpUid},
    profile::{Profile, ReconciledProfile},
};

/// Left-joins provider accounts with local rows on uid.
///
/// Accounts drive the result and keep their order. Rows without an account are dropped.
pub fn join_accounts(
    accounts: Vec<IdentityAccount>,
    profiles: Vec<Profile>,
) -> Vec<ReconciledProfile> {
    let by_uid: HashMap<IdpUid, Profile> = profiles
        .into_iter()
        .map(|profile| (profile.idp_uid.clone(), profile))
        .collect();

    accounts
        .into_iter()
        .map(|account| ReconciledProfile::reconcile(&account, by_uid.get(&account.uid)))
        .collect()
}

/// Parses raw uids, dropping ones that can never resolve and keeping first occurrences.
pub fn distinct_uids(raw: &[String]) -> Vec<IdpUid> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|value| IdpUid::parse(value).ok())
        .filter(|uid| seen.insert(uid.clone()))
        .collect()
}
