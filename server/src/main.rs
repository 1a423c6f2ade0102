use std::error::Error;
use std::future::pending;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use idprofile_application::infrastructure_config::Config;
use server::bootstrap::{router::create_router, state::AppState};
use server::config_loader;
use server::observability::{startup_info::print_service_info, tracing::setup_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;
    setup_logging(&config)?;

    info!(environment = %config.environment.env, "Starting identity profile service");
    serve(config).await?;

    info!("Identity profile service stopped");
    Ok(())
}

async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let address = config.server_address();
    let state = AppState::new(config.clone()).await?;
    let db_pool = state.db_pool().clone();

    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);
    print_service_info(&config);

    let served = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // In-flight requests have drained by now.
    db_pool.close().await;
    Ok(served?)
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::SignalKind;
        match signal::unix::signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = pending::<()>();

    let reason = tokio::select! {
        () = interrupt => "interrupt",
        () = terminate => "terminate",
    };
    info!(signal = reason, "Shutting down gracefully");
}
