use crate::error::{AppError, AppResult};
use crate::infrastructure_config::ProfileRulesConfig;

/// Structural rules for a public identifier. The value is checked verbatim, never trimmed.
pub struct PublicIdentifierValidator {
    min_length: usize,
    max_length: usize,
}

impl Default for PublicIdentifierValidator {
    fn default() -> Self {
        Self::from_config(&ProfileRulesConfig::default())
    }
}

impl PublicIdentifierValidator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &ProfileRulesConfig) -> Self {
        Self {
            min_length: config.public_identifier_min_length.max(1),
            max_length: config.public_identifier_max_length,
        }
    }

    pub fn validate(&self, public_identifier: &str) -> AppResult<()> {
        if public_identifier.is_empty() {
            return Err(invalid("public_identifier is required".to_string()));
        }

        let length = public_identifier.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(invalid(format!(
                "public_identifier must be between {} and {} characters",
                self.min_length, self.max_length
            )));
        }

        if !public_identifier
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
        {
            return Err(invalid(
                "public_identifier must start with a letter or digit".to_string(),
            ));
        }

        if let Some(bad) = public_identifier
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(format!(
                "public_identifier contains unsupported character {bad:?}"
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> AppError {
    AppError::InvalidProfileInput { message }
}
