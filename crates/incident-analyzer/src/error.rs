use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use incident_protocol::ErrorBody;

use crate::analysis::ReplyError;
use crate::model::ModelError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model reply rejected: {0}")]
    InvalidModelOutput(#[from] ReplyError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Model(err) if err.is_invalid_output() => "invalid_model_output",
            Self::Model(_) => "model_unavailable",
            Self::InvalidModelOutput(_) => "invalid_model_output",
            Self::Storage(_) => "storage_error",
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Model(_) | Self::InvalidModelOutput(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(err) => {
                tracing::error!(event = "storage.failed", error = %err);
                "storage failure".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody::new(self.code(), message);
        (status, Json(body)).into_response()
    }
}
