//! Waypost application binary - composition root.
//!
//! 1. Parse CLI arguments and load the TOML configuration
//! 2. Initialize tracing
//! 3. Open the SQLite tag store
//! 4. Build the SMTP notification relay
//! 5. Serve the router on the enabled plaintext and TLS listeners
//!
//! Any startup failure returns an error from `main`, which exits with code 1
//! before a listener is bound.

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use waypost_api::server;
use waypost_api::{create_router, AppState};
use waypost_core::config::WaypostConfig;
use waypost_notify::SmtpRelay;
use waypost_storage::Database;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so its log_level can seed the filter.
    let config_file = args.resolve_config_path();
    let loaded = WaypostConfig::load(&config_file);

    let level =
        args.resolve_log_level(loaded.as_ref().ok().map(|c| c.general.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting Waypost v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config = match loaded {
        Ok(config) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Err(e) => {
            tracing::error!(path = %config_file.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    // Storage.
    let db = Database::new(Path::new(&config.general.database)).map_err(|e| {
        tracing::error!(path = %config.general.database, error = %e, "Failed to open database");
        e
    })?;
    tracing::info!(path = %config.general.database, "SQLite database opened");

    // Notification relay.
    let relay = SmtpRelay::from_config(&config.smtp).map_err(|e| {
        tracing::error!(error = %e, "Failed to configure SMTP relay");
        e
    })?;

    // API.
    let state = AppState::new(&config, db, Arc::new(relay))?;
    let router = create_router(state);

    if let Err(e) = server::serve(&config.general, router).await {
        tracing::error!(error = %e, "Server stopped");
        return Err(e.into());
    }

    Ok(())
}
