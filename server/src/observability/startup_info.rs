use idprofile_application::infrastructure_config::{
    Config, IdentityProviderConfig, ProfileRulesConfig,
};
use tracing::info;

pub fn print_service_info(config: &Config) {
    print_api_documentation_info(config);
    print_configuration_info(config);
}

fn print_api_documentation_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 API:");
    info!("  🔐 Authenticate: POST {}/v1/authenticate", base_url);
    info!("  🩺 Health: GET {}/health", base_url);
    if cfg!(feature = "docs") {
        info!("  📖 Swagger UI: {}/docs", base_url);
        info!("  📄 OpenAPI JSON: {}/api-docs/openapi.json", base_url);
    }
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration ({}):", config.environment.env);
    print_database_configuration(config);
    print_identity_provider_configuration(&config.identity_provider);
    print_profile_rules(&config.profiles);
}

fn print_database_configuration(config: &Config) {
    info!(
        "  🗄️  Database: {} (pool {}, timeout {}s, migrations {})",
        config.db.redacted_url(),
        config.db.pool_size,
        config.db.query_timeout_secs,
        if config.db.run_migrations { "on" } else { "off" }
    );
}

fn print_identity_provider_configuration(idp: &IdentityProviderConfig) {
    info!(
        "  🪪 Identity provider: {} project {} (timeout {}s, batch {})",
        idp.base_url, idp.project_id, idp.request_timeout_secs, idp.lookup_batch_size
    );
}

fn print_profile_rules(rules: &ProfileRulesConfig) {
    info!(
        "  🏷️  Public identifiers: {}..={} chars",
        rules.public_identifier_min_length, rules.public_identifier_max_length
    );
}
