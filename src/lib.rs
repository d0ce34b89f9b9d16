pub mod commands;
pub mod core;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::core::catalog::CatalogConfig;
use crate::core::state::AppState;

pub fn run() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,paper_setup_lib=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("PaperSetup starting...");

    // Every step is awaited in order on this one thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Could not start async runtime: {}", e);
            return;
        }
    };

    runtime.block_on(async {
        match AppState::new(CatalogConfig::default()) {
            Ok(state) => commands::run_terminal(&state).await,
            Err(e) => error!("Initialization failed: {}", e),
        }
    });
}
