#[cfg(feature = "docs")]
pub mod docs;

pub(crate) mod core;
pub(crate) mod error_mapper;

// keep public for OpenAPI docs
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
