mod openai;

use async_trait::async_trait;

pub(crate) use openai::OpenAiChatModel;

/// A chat-completion backend that answers a single user prompt with text.
#[async_trait]
pub(crate) trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ModelError {
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("model request failed: {0}")]
    Unavailable(String),

    #[error("model request timed out")]
    Timeout,

    #[error("model request rejected status={status} body={body}")]
    Rejected { status: u16, body: String },

    #[error("model response malformed: {0}")]
    MalformedResponse(String),

    #[error("model response missing content")]
    EmptyReply,
}

impl ModelError {
    /// True when the provider answered but the answer was unusable.
    pub(crate) fn is_invalid_output(&self) -> bool {
        matches!(self, Self::MalformedResponse(_) | Self::EmptyReply)
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
