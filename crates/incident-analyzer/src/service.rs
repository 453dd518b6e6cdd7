use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use incident_protocol::{IncidentAnalysis, IncidentRecord, IncidentSubmission};

use crate::analysis::{build_prompt, parse_analysis_reply};
use crate::error::ApiError;
use crate::model::ChatModel;
use crate::store::{IncidentStore, NewIncident, StoreError};

/// Validate → call model → parse → store, one request at a time.
pub(crate) struct AnalysisService {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn IncidentStore>,
}

impl AnalysisService {
    pub(crate) fn new(model: Arc<dyn ChatModel>, store: Arc<dyn IncidentStore>) -> Self {
        Self { model, store }
    }

    pub(crate) async fn analyze(
        &self,
        submission: IncidentSubmission,
    ) -> Result<IncidentAnalysis, ApiError> {
        let started = Instant::now();
        let prompt = build_prompt(&submission);
        let reply = self.model.complete(&prompt).await?;
        let analysis = parse_analysis_reply(&reply).map_err(|err| {
            tracing::warn!(
                event = "analyze.reply_rejected",
                reply_len = reply.len(),
                error = %err,
            );
            err
        })?;

        // Nothing reaches the store until the reply parsed completely.
        let incident = NewIncident {
            submission,
            analysis,
            analyzed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        let store = Arc::clone(&self.store);
        let record = tokio::task::spawn_blocking(move || store.insert(incident))
            .await
            .map_err(StoreError::from)??;

        tracing::info!(
            event = "analyze.completed",
            id = record.id,
            analyzed_at = %record.analyzed_at,
            elapsed_ms = started.elapsed().as_millis() as u64,
        );
        Ok(record.analysis())
    }

    pub(crate) async fn list(&self) -> Result<Vec<IncidentRecord>, ApiError> {
        let store = Arc::clone(&self.store);
        let records = tokio::task::spawn_blocking(move || store.list())
            .await
            .map_err(StoreError::from)??;
        Ok(records)
    }
}
