pub mod identity_toolkit_reqwest;
pub mod postgres_sqlx;
