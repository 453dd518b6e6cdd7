mod classifier;
mod cli;
mod config;
mod error;
mod report;
mod server;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use service_utils::logging::init_tracing;
use service_utils::shutdown::wait_for_shutdown;
use tokio::net::TcpListener;
use tracing::info;

use crate::classifier::HuggingFaceClassifier;
use crate::cli::Args;
use crate::config::load_service_config;
use crate::server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(
        "incident-classifier",
        args.log_dir.as_deref(),
        args.log_to_stderr,
    )?;

    let mut config = load_service_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    if let Some(listen_addr) = args.listen_addr {
        config.listen_addr = listen_addr;
    }
    info!(
        listen_addr = %config.listen_addr,
        config = %args.config.display(),
        model = %config.classifier.model,
        "incident classifier starting"
    );

    let api_key = config.classifier.resolve_api_key();
    if api_key.is_none() {
        tracing::warn!(
            api_key_env = %config.classifier.api_key_env,
            "no classifier api token configured; anonymous requests may be rate limited"
        );
    }
    let classifier = HuggingFaceClassifier::new(&config.classifier, api_key)
        .context("failed to build classifier client")?;
    let app = build_router(AppState::new(Arc::new(classifier)), &config.cors);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "incident classifier listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("incident classifier shutting down");
    Ok(())
}
