use std::time::Duration;

use futures::future::try_join_all;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use domain::identity::{IdentityAccount, IdpUid};
use idprofile_application::{
    error::{AppError, AppResult},
    infrastructure_config::IdentityProviderConfig,
    ports::outgoing::identity_provider::IdentityProviderPort,
};

/// Error codes the provider returns for tokens that cannot be trusted.
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "INVALID_ID_TOKEN",
    "TOKEN_EXPIRED",
    "USER_NOT_FOUND",
    "USER_DISABLED",
    "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenLookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountLookupRequest<'a> {
    local_id: &'a [&'a str],
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
}

impl From<UserRecord> for IdentityAccount {
    fn from(user: UserRecord) -> Self {
        IdentityAccount::new(
            IdpUid::from_trusted(user.local_id),
            user.email,
            user.email_verified,
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Identity provider backed by the Google Identity Toolkit REST API.
///
/// End-user tokens are checked with the public `accounts:lookup` endpoint using the API
/// key; account lookups go through the project-scoped admin endpoint with the service
/// token. Both work unchanged against the Firebase Auth emulator.
pub struct IdentityToolkitAdapter {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: SecretString,
    service_token: SecretString,
    lookup_batch_size: usize,
}

impl IdentityToolkitAdapter {
    pub fn new(config: &IdentityProviderConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build identity provider client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            service_token: config.service_token.clone(),
            lookup_batch_size: config.lookup_batch_size.max(1),
        })
    }

    fn token_lookup_url(&self) -> String {
        format!("{}/v1/accounts:lookup", self.base_url)
    }

    fn account_lookup_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/accounts:lookup",
            self.base_url, self.project_id
        )
    }

    fn project_config_url(&self) -> String {
        format!(
            "{}/admin/v2/projects/{}/config",
            self.base_url, self.project_id
        )
    }

    async fn lookup_accounts(&self, uids: &[&str]) -> AppResult<Vec<UserRecord>> {
        let response = self
            .client
            .post(self.account_lookup_url())
            .bearer_auth(self.service_token.expose_secret())
            .json(&AccountLookupRequest { local_id: uids })
            .send()
            .await
            .map_err(transport_error)?;

        let lookup = read_lookup(response, "account lookup").await?;
        debug!("Resolved {} of {} accounts", lookup.users.len(), uids.len());
        Ok(lookup.users)
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::ExternalServiceError {
        message: format!("Identity provider request failed: {}", e),
    }
}

fn error_code(message: &str) -> &str {
    message.split([' ', ':']).next().unwrap_or_default()
}

fn is_credential_error(message: &str) -> bool {
    CREDENTIAL_ERROR_CODES.contains(&error_code(message))
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => status.to_string(),
    }
}

async fn read_lookup(response: Response, operation: &str) -> AppResult<LookupResponse> {
    let status = response.status();
    if !status.is_success() {
        let message = error_message(response).await;
        return Err(AppError::ExternalServiceError {
            message: format!("Identity provider {} failed ({}): {}", operation, status, message),
        });
    }

    response
        .json::<LookupResponse>()
        .await
        .map_err(|e| AppError::ExternalServiceError {
            message: format!("Invalid identity provider {} response: {}", operation, e),
        })
}

#[async_trait::async_trait]
impl IdentityProviderPort for IdentityToolkitAdapter {
    #[instrument(skip(self, token))]
    async fn verify_credential(&self, token: &str) -> AppResult<IdpUid> {
        let response = self
            .client
            .post(self.token_lookup_url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&TokenLookupRequest { id_token: token })
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::BAD_REQUEST {
            let message = error_message(response).await;
            if is_credential_error(&message) {
                debug!("Credential rejected: {}", message);
                return Err(AppError::CredentialInvalid { message });
            }
            warn!("Identity provider refused token lookup: {}", message);
            return Err(AppError::ExternalServiceError {
                message: format!("Identity provider refused token lookup: {}", message),
            });
        }

        let lookup = read_lookup(response, "token lookup").await?;
        let user = lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AppError::CredentialInvalid {
                message: "token does not resolve to an account".to_string(),
            })?;

        debug!("Credential verified for uid {}", user.local_id);
        Ok(IdpUid::from_trusted(user.local_id))
    }

    #[instrument(skip(self))]
    async fn get_account(&self, uid: &IdpUid) -> AppResult<IdentityAccount> {
        let users = self.lookup_accounts(&[uid.as_str()]).await?;
        users
            .into_iter()
            .next()
            .map(IdentityAccount::from)
            .ok_or(AppError::AccountNotFound)
    }

    #[instrument(skip(self, uids), fields(requested = uids.len()))]
    async fn get_accounts(&self, uids: &[IdpUid]) -> AppResult<Vec<IdentityAccount>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<&str> = uids.iter().map(IdpUid::as_str).collect();
        let batches = try_join_all(
            raw.chunks(self.lookup_batch_size)
                .map(|chunk| self.lookup_accounts(chunk)),
        )
        .await?;

        Ok(batches
            .into_iter()
            .flatten()
            .map(IdentityAccount::from)
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        let response = self
            .client
            .get(self.project_config_url())
            .bearer_auth(self.service_token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::ExternalServiceError {
                message: format!("Identity provider health check returned {}", status),
            })
        }
    }
}
