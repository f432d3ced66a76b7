//! Parlor server: user accounts with cropped, multi-format profile images.
//!
//! Main entry point that wires all crates together and starts the server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use parlor_core::config::AppConfig;
use parlor_core::error::AppError;
use parlor_database::{DatabasePool, PgUserStore, run_migrations};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "parlor-server", version, about)]
struct Cli {
    /// Directory holding `default.toml` and per-environment overlays.
    #[arg(long, env = "PARLOR_CONFIG_DIR", default_value = "config")]
    config: PathBuf,

    /// Environment overlay to apply, e.g. `development` or `production`.
    #[arg(long, env = "PARLOR_ENV", default_value = "development")]
    env: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(
        config_dir = %cli.config.display(),
        env = %cli.env,
        "Starting Parlor v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    let users = Arc::new(PgUserStore::new(db.pool().clone()));
    let result = parlor_api::run_server(config, users).await;

    db.close().await;
    result
}
