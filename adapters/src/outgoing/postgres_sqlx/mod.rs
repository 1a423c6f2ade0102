pub mod migrations;
pub mod profile_store_postgres;
pub mod utils;
