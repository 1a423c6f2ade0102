use std::fmt;
use std::io;
use thiserror::Error;

use domain::{error::DomainError, profile::ProfileConflict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    NotFound,
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Token verification failed: {message}")]
    TokenVerificationFailed { message: String },

    #[error("Email verification is required")]
    EmailNotVerified,

    #[error("Invalid profile input: {message}")]
    InvalidProfileInput { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Profile lookup failed: {reason}")]
    ProfileLookupFailed { reason: LookupFailure },

    #[error("Public identifier is already taken")]
    PublicIdentifierTaken,

    #[error("Credential is invalid: {message}")]
    CredentialInvalid { message: String },

    #[error("Identity account not found")]
    AccountNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Profile already exists (conflict on {conflict})")]
    ProfileAlreadyExists { conflict: ProfileConflict },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("External service error: {message}")]
    ExternalServiceError { message: String },

    #[error("Internal server error")]
    InternalServerError,
}

pub type AppResult<T> = Result<T, AppError>;
