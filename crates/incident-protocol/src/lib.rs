use serde::{Deserialize, Serialize};

pub mod labels;

/// Incident details submitted to `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSubmission {
    pub date: String,
    pub location: String,
    pub description: String,
    pub people_involved: String,
    pub immediate_causes: String,
    pub contributing_factors: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncidentAnalysis {
    pub root_cause: String,
    pub underlying_causes: String,
    pub corrective_actions: String,
    pub analyzed_at: String,
}

/// A stored incident as returned by `GET /api/incidents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub id: i64,
    pub date: String,
    pub location: String,
    pub description: String,
    pub people_involved: String,
    pub immediate_causes: String,
    pub contributing_factors: String,
    pub root_cause: String,
    pub underlying_causes: String,
    pub corrective_actions: String,
    pub analyzed_at: String,
}

impl IncidentRecord {
    pub fn analysis(&self) -> IncidentAnalysis {
        IncidentAnalysis {
            root_cause: self.root_cause.clone(),
            underlying_causes: self.underlying_causes.clone(),
            corrective_actions: self.corrective_actions.clone(),
            analyzed_at: self.analyzed_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Free-text report submitted to `POST /analyze-incident`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRequest {
    pub report: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationResponse {
    pub root_cause: String,
    pub contributing_factors: String,
}

impl ClassificationResponse {
    pub fn contributing_factor_list(&self) -> Vec<&str> {
        self.contributing_factors
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}
