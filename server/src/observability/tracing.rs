use std::{collections::HashMap, error::Error, io::stdout};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use idprofile_application::infrastructure_config::{Config, LogFormat};

pub const SERVICE_NAME: &str = "idprofile-service";

/// Dependencies that are chatty at debug level.
const QUIET_TARGETS: [&str; 4] = ["sqlx=warn", "hyper=info", "reqwest=info", "h2=info"];

pub fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.logging.level)))?;

    match config.logging.format {
        LogFormat::Json => {
            let default_fields = HashMap::from([(
                "environment".to_string(),
                serde_json::Value::from(config.environment.env.clone()),
            )]);
            let formatting_layer = BunyanFormattingLayer::with_default_fields(
                SERVICE_NAME.to_string(),
                stdout,
                default_fields,
            );

            tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(formatting_layer)
                .try_init()?;
        }
        LogFormat::Pretty => {
            let format = fmt::format()
                .with_target(true)
                .with_thread_ids(true)
                .compact();

            let mut subscriber = tracing_subscriber::fmt()
                .event_format(format)
                .with_env_filter(env_filter);

            if config.logging.include_location {
                subscriber = subscriber.with_file(true).with_line_number(true);
            }

            subscriber
                .try_init()
                .map_err(|e| -> Box<dyn Error> { e })?;
        }
    }

    Ok(())
}

fn default_directives(level: &str) -> String {
    let mut directives = vec![level];
    directives.extend(QUIET_TARGETS);
    directives.join(",")
}
