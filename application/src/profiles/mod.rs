pub mod identifier_validator;
pub mod reconcile;
pub mod service;
