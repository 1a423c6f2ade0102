// keep public for OpenAPI docs
pub mod health;
pub mod profiles;
