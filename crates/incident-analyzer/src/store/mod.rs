//! Incident persistence.
//!
//! Records are append-only: a row is written once per successful analysis and
//! never updated or deleted.

mod sqlite;

use incident_protocol::{IncidentRecord, IncidentSubmission};

use crate::analysis::ModelAnalysis;

pub(crate) use sqlite::SqliteIncidentStore;

/// A fully analyzed incident that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub(crate) struct NewIncident {
    pub(crate) submission: IncidentSubmission,
    pub(crate) analysis: ModelAnalysis,
    pub(crate) analyzed_at: String,
}

pub(crate) trait IncidentStore: Send + Sync {
    /// Writes one row and returns it as stored, including the assigned id.
    fn insert(&self, incident: NewIncident) -> Result<IncidentRecord, StoreError>;

    /// All records, newest `analyzed_at` first; ties go to the higher id.
    fn list(&self) -> Result<Vec<IncidentRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("storage worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
