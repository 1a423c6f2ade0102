use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub identity_provider: IdentityProviderConfig,
    pub profiles: ProfileRulesConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
    pub run_migrations: bool,
}

impl Serialize for DbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbConfig", 4)?;
        state.serialize_field("database_url", "[REDACTED]")?;
        state.serialize_field("pool_size", &self.pool_size)?;
        state.serialize_field("query_timeout_secs", &self.query_timeout_secs)?;
        state.serialize_field("run_migrations", &self.run_migrations)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DbConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DbConfigHelper {
            database_url: String,
            pool_size: u32,
            query_timeout_secs: u64,
            run_migrations: bool,
        }

        let helper = DbConfigHelper::deserialize(deserializer)?;
        Ok(DbConfig {
            database_url: SecretString::from(helper.database_url),
            pool_size: helper.pool_size,
            query_timeout_secs: helper.query_timeout_secs,
            run_migrations: helper.run_migrations,
        })
    }
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

/// Identity Toolkit (Firebase Auth) endpoint settings.
///
/// `api_key` authenticates end-user token lookups, `service_token` is the bearer used for
/// the project-scoped admin lookups. Point `base_url` at the Auth emulator for local runs.
#[derive(Debug, Clone)]
pub struct IdentityProviderConfig {
    pub base_url: String,
    pub project_id: String,
    pub api_key: SecretString,
    pub service_token: SecretString,
    pub request_timeout_secs: u64,
    pub lookup_batch_size: usize,
}

impl Serialize for IdentityProviderConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("IdentityProviderConfig", 6)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("project_id", &self.project_id)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("service_token", "[REDACTED]")?;
        state.serialize_field("request_timeout_secs", &self.request_timeout_secs)?;
        state.serialize_field("lookup_batch_size", &self.lookup_batch_size)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for IdentityProviderConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct IdentityProviderConfigHelper {
            base_url: String,
            project_id: String,
            api_key: String,
            service_token: String,
            request_timeout_secs: u64,
            lookup_batch_size: usize,
        }

        let helper = IdentityProviderConfigHelper::deserialize(deserializer)?;
        Ok(IdentityProviderConfig {
            base_url: helper.base_url,
            project_id: helper.project_id,
            api_key: SecretString::from(helper.api_key),
            service_token: SecretString::from(helper.service_token),
            request_timeout_secs: helper.request_timeout_secs,
            lookup_batch_size: helper.lookup_batch_size,
        })
    }
}

impl IdentityProviderConfig {
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    #[must_use]
    pub fn service_token(&self) -> &str {
        self.service_token.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRulesConfig {
    pub public_identifier_min_length: usize,
    pub public_identifier_max_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com".to_string(),
            project_id: "idprofile-dev".to_string(),
            api_key: SecretString::from("dev-api-key"),
            service_token: SecretString::from("owner"),
            request_timeout_secs: 10,
            lookup_batch_size: 100,
        }
    }
}

impl Default for ProfileRulesConfig {
    fn default() -> Self {
        Self {
            public_identifier_min_length: 1,
            public_identifier_max_length: 64,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_origin: None,
            },
            db: DbConfig {
                database_url: SecretString::from("postgresql://localhost/idprofile"),
                pool_size: 10,
                query_timeout_secs: 5,
                run_migrations: true,
            },
            identity_provider: IdentityProviderConfig::default(),
            profiles: ProfileRulesConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.db.database_url.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "database_url cannot be empty".to_string(),
            });
        }

        if self.db.pool_size == 0 {
            return Err(AppError::ConfigError {
                message: "db pool_size must be greater than 0".to_string(),
            });
        }

        if self.db.query_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "db query_timeout_secs must be greater than 0".to_string(),
            });
        }

        self.validate_identity_provider()?;

        let rules = &self.profiles;
        if rules.public_identifier_min_length == 0 {
            return Err(AppError::ConfigError {
                message: "public_identifier_min_length must be at least 1".to_string(),
            });
        }

        if rules.public_identifier_min_length > rules.public_identifier_max_length {
            return Err(AppError::ConfigError {
                message: "public_identifier_min_length must be <= public_identifier_max_length"
                    .to_string(),
            });
        }

        Ok(())
    }

    fn validate_identity_provider(&self) -> AppResult<()> {
        let idp = &self.identity_provider;

        if url::Url::parse(&idp.base_url).is_err() {
            return Err(AppError::ConfigError {
                message: format!("identity_provider base_url is not a valid URL: {}", idp.base_url),
            });
        }

        if idp.project_id.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "identity_provider project_id cannot be empty".to_string(),
            });
        }

        if idp.api_key.expose_secret().is_empty() || idp.service_token.expose_secret().is_empty()
        {
            return Err(AppError::ConfigError {
                message: "identity_provider api_key and service_token must be set".to_string(),
            });
        }

        if idp.request_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "identity_provider request_timeout_secs must be greater than 0"
                    .to_string(),
            });
        }

        // The provider rejects lookups of more than 100 uids per request.
        if !(1..=100).contains(&idp.lookup_batch_size) {
            return Err(AppError::ConfigError {
                message: "identity_provider lookup_batch_size must be between 1 and 100"
                    .to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
