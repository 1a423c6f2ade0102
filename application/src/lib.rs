#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "sqlx",
    feature = "reqwest"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod error;
pub mod health;
pub mod infrastructure_config;
pub mod ports;
pub mod profiles;

#[cfg(test)]
pub(crate) mod test_support;
