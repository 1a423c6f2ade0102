use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid IdP uid: {0}")]
    InvalidUid(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
