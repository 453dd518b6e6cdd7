mod analysis;
mod cli;
mod config;
mod error;
mod model;
mod server;
mod service;
mod store;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use service_utils::logging::init_tracing;
use service_utils::shutdown::wait_for_shutdown;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::Args;
use crate::config::load_analyzer_config;
use crate::model::OpenAiChatModel;
use crate::server::{build_router, AppState};
use crate::service::AnalysisService;
use crate::store::SqliteIncidentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(
        "incident-analyzer",
        args.log_dir.as_deref(),
        args.log_to_stderr,
    )?;

    let mut config = load_analyzer_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    if let Some(listen_addr) = args.listen_addr {
        config.listen_addr = listen_addr;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    info!(
        listen_addr = %config.listen_addr,
        config = %args.config.display(),
        database = %config.database_path.display(),
        model = %config.model.model,
        "incident analyzer starting"
    );

    let store = SqliteIncidentStore::open(&config.database_path)
        .with_context(|| format!("failed to open database {}", config.database_path.display()))?;
    let api_key = config.model.resolve_api_key();
    if api_key.is_none() {
        tracing::warn!(
            api_key_env = %config.model.api_key_env,
            "no model api key configured; requests are sent without authorization"
        );
    }
    let model =
        OpenAiChatModel::new(&config.model, api_key).context("failed to build model client")?;

    let service = AnalysisService::new(Arc::new(model), Arc::new(store));
    let app = build_router(AppState::new(service), &config.cors);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "incident analyzer listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("incident analyzer shutting down");
    Ok(())
}
