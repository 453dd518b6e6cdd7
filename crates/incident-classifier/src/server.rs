use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use incident_protocol::{ClassificationResponse, ReportRequest};
use service_utils::middleware::log_http_request;
use tower_http::cors::{Any, CorsLayer};

use crate::classifier::ZeroShotClassifier;
use crate::config::CorsConfig;
use crate::error::ApiError;
use crate::report::classify_report;

#[derive(Clone)]
pub(crate) struct AppState {
    classifier: Arc<dyn ZeroShotClassifier>,
}

impl AppState {
    pub(crate) fn new(classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self { classifier }
    }
}

pub(crate) fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/analyze-incident", post(analyze_incident))
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
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ClassificationResponse>, ApiError> {
    let Json(request) = payload?;
    let started = Instant::now();
    match classify_report(state.classifier.as_ref(), &request.report).await {
        Ok(response) => {
            tracing::info!(
                event = "classify.completed",
                report_len = request.report.len(),
                root_cause = %response.root_cause,
                contributing_factors = %response.contributing_factors,
                factor_count = response.contributing_factor_list().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
            );
            Ok(Json(response))
        }
        Err(err) => {
            tracing::error!(event = "classify.failed", error = %err);
            Err(err.into())
        }
    }
}
