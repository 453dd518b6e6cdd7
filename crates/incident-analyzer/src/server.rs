use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use incident_protocol::{IncidentAnalysis, IncidentRecord, IncidentSubmission};
use service_utils::middleware::log_http_request;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;
use crate::error::ApiError;
use crate::service::AnalysisService;

#[derive(Clone)]
pub(crate) struct AppState {
    service: Arc<AnalysisService>,
}

impl AppState {
    pub(crate) fn new(service: AnalysisService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub(crate) fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_incident))
        .route("/api/incidents", get(list_incidents))
        .with_state(state)
        .layer(middleware::from_fn(log_http_request));
    if cors.enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    app
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze_incident(
    State(state): State<AppState>,
    payload: Result<Json<IncidentSubmission>, JsonRejection>,
) -> Result<Json<IncidentAnalysis>, ApiError> {
    let Json(submission) = payload?;
    match state.service.analyze(submission).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(err) => {
            tracing::error!(
                event = "analyze.failed",
                code = err.code(),
                error = %err,
            );
            Err(err)
        }
    }
}

async fn list_incidents(
    State(state): State<AppState>,
) -> Result<Json<Vec<IncidentRecord>>, ApiError> {
    let records = state.service.list().await?;
    tracing::info!(event = "incidents.listed", count = records.len());
    Ok(Json(records))
}
