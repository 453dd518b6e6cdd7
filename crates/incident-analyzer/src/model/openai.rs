use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use service_utils::http::join_base_path;

use super::{ChatModel, ModelError};
use crate::config::ModelConfig;

/// OpenAI-compatible `chat/completions` client.
pub(crate) struct OpenAiChatModel {
    http_client: Client,
    url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiChatModel {
    pub(crate) fn new(config: &ModelConfig, api_key: Option<String>) -> Result<Self, ModelError> {
        let url =
            join_base_path(&config.base_url, &config.chat_path).map_err(ModelError::InvalidConfig)?;
        let http_client = Client::builder()
            .user_agent(concat!("incident-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ModelError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            http_client,
            url,
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
            timeout: config.request_timeout,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": self.temperature,
        });

        let mut request = self
            .http_client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload);
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.bearer_auth(api_key);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            tracing::warn!(
                event = "model.request_failed",
                url = %self.url,
                is_timeout = err.is_timeout(),
                is_connect = err.is_connect(),
                error = %err,
            );
            ModelError::from(err)
        })?;

        let status = response.status();
        let body = response.text().await?;
        tracing::info!(
            event = "model.response",
            model = %self.model,
            status = status.as_u16(),
            body_len = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
        );
        if !status.is_success() {
            return Err(ModelError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        extract_reply_content(&body)
    }
}

fn extract_reply_content(body: &str) -> Result<String, ModelError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| ModelError::MalformedResponse(err.to_string()))?;
    let content = value
        .pointer("/choices/0/message/content")
        .and_then(|val| val.as_str())
        .or_else(|| value.pointer("/choices/0/text").and_then(|val| val.as_str()))
        .unwrap_or("")
        .trim();
    if content.is_empty() {
        return Err(ModelError::EmptyReply);
    }
    Ok(content.to_string())
}
