use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use idprofile_application::error::{AppError, AppResult};
use idprofile_application::infrastructure_config::Config;
use std::fs;
use std::path::Path;
use tracing::info;

pub const ENV_PREFIX: &str = "IDPROFILE_";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;

    let mut figment = default_figment();

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

/// Defaults layer. Secrets serialize redacted, so their real defaults are layered back in.
fn default_figment() -> Figment {
    let default_config = Config::default();

    Figment::from(Serialized::defaults(&default_config))
        .merge(Serialized::default(
            "db.database_url",
            default_config.db.database_url(),
        ))
        .merge(Serialized::default(
            "identity_provider.api_key",
            default_config.identity_provider.api_key(),
        ))
        .merge(Serialized::default(
            "identity_provider.service_token",
            default_config.identity_provider.service_token(),
        ))
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Please configure the identity provider secrets!");
    info!("IMPORTANT: .env contains sensitive data and is gitignored.");

    Ok(())
}
