//! Krishi application binary - composition root.
//!
//! Ties the crates together into a single executable:
//! 1. Parse CLI arguments
//! 2. Initialize tracing
//! 3. Load configuration from TOML
//! 4. Load model and codec artifacts (degrading per artifact)
//! 5. Start the axum REST API server

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use krishi_api::state::AppState;
use krishi_core::config::KrishiConfig;
use krishi_model::ModelRegistry;

/// Expand ~ to the home directory in a path string.
fn resolve_models_dir(models_dir: &str) -> PathBuf {
    if let Some(rest) = models_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(models_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();

    // Tracing: --log-level wins, then RUST_LOG, then "info".
    let fallback = args
        .resolve_log_level()
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();

    tracing::info!("Starting Krishi v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = KrishiConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(dir) = args.resolve_models_dir() {
        config.general.models_dir = dir;
    }

    // Models. Missing artifacts disable their feature, never startup.
    let models_dir = resolve_models_dir(&config.general.models_dir);
    let models = Arc::new(ModelRegistry::load(&models_dir));
    let status = models.status();
    tracing::info!(
        groundwater = status.groundwater_model,
        crop = status.crop_model,
        districts = status.districts,
        crops = status.crops,
        "Model registry ready"
    );

    // API server.
    let port = config.general.port;
    let state = AppState::new(config, models);
    let router = krishi_api::create_router(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind — is another instance running?");
            tracing::error!("Try: KRISHI_PORT={} cargo run -p krishi-app", port + 1);
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
