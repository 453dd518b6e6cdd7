mod huggingface;

use async_trait::async_trait;

pub(crate) use huggingface::HuggingFaceClassifier;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LabelScore {
    pub(crate) label: String,
    pub(crate) score: f64,
}

impl LabelScore {
    pub(crate) fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Scores `text` against a closed set of candidate labels.
///
/// Implementations may return labels in any order and may omit labels; callers
/// rank and filter the result themselves.
#[async_trait]
pub(crate) trait ZeroShotClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ClassifierError {
    #[error("invalid classifier configuration: {0}")]
    InvalidConfig(String),

    #[error("classifier request failed: {0}")]
    Unavailable(String),

    #[error("classifier request timed out")]
    Timeout,

    #[error("classifier request rejected status={status} body={body}")]
    Rejected { status: u16, body: String },

    #[error("classifier output invalid: {0}")]
    InvalidOutput(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
