use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use service_utils::http::join_base_path;

use super::{ClassifierError, LabelScore, ZeroShotClassifier};
use crate::config::ClassifierConfig;

/// Hugging Face inference API, `zero-shot-classification` task.
pub(crate) struct HuggingFaceClassifier {
    http_client: Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ZeroShotOutput {
    labels: Vec<String>,
    scores: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotReply {
    Single(ZeroShotOutput),
    Batch(Vec<ZeroShotOutput>),
}

impl HuggingFaceClassifier {
    pub(crate) fn new(
        config: &ClassifierConfig,
        api_key: Option<String>,
    ) -> Result<Self, ClassifierError> {
        let path = format!("/models/{}", config.model.trim());
        let url = join_base_path(&config.base_url, &path).map_err(ClassifierError::InvalidConfig)?;
        let http_client = Client::builder()
            .user_agent(concat!("incident-classifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ClassifierError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            http_client,
            url,
            api_key,
            timeout: config.request_timeout,
        })
    }
}

#[async_trait]
impl ZeroShotClassifier for HuggingFaceClassifier {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        let payload = json!({
            "inputs": text,
            "parameters": {
                "candidate_labels": candidate_labels,
                "multi_label": false,
            },
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
                event = "classifier.request_failed",
                url = %self.url,
                is_timeout = err.is_timeout(),
                is_connect = err.is_connect(),
                error = %err,
            );
            ClassifierError::from(err)
        })?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            event = "classifier.response",
            status = status.as_u16(),
            body_len = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
        );
        if !status.is_success() {
            return Err(ClassifierError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        parse_zero_shot_reply(&body)
    }
}

fn parse_zero_shot_reply(body: &str) -> Result<Vec<LabelScore>, ClassifierError> {
    let reply: ZeroShotReply = serde_json::from_str(body)
        .map_err(|err| ClassifierError::InvalidOutput(err.to_string()))?;
    let output = match reply {
        ZeroShotReply::Single(output) => output,
        ZeroShotReply::Batch(outputs) => outputs
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::InvalidOutput("empty result list".to_string()))?,
    };
    if output.labels.len() != output.scores.len() {
        return Err(ClassifierError::InvalidOutput(format!(
            "{} labels but {} scores",
            output.labels.len(),
            output.scores.len()
        )));
    }
    Ok(output
        .labels
        .into_iter()
        .zip(output.scores)
        .map(|(label, score)| LabelScore::new(label, score))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_server;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    fn config_for(base_url: String) -> ClassifierConfig {
        ClassifierConfig {
            base_url,
            request_timeout: Duration::from_millis(500),
            ..Default::default()
        }
    }

    #[test]
    fn parses_single_and_batched_replies() {
        let single = r#"{"sequence":"x","labels":["b","a"],"scores":[0.7,0.3]}"#;
        let parsed = parse_zero_shot_reply(single).unwrap();
        assert_eq!(
            parsed,
            vec![LabelScore::new("b", 0.7), LabelScore::new("a", 0.3)]
        );

        let batch = r#"[{"sequence":"x","labels":["a"],"scores":[1.0]}]"#;
        assert_eq!(
            parse_zero_shot_reply(batch).unwrap(),
            vec![LabelScore::new("a", 1.0)]
        );
    }

    #[test]
    fn rejects_mismatched_or_unknown_shapes() {
        let mismatched = r#"{"labels":["a","b"],"scores":[1.0]}"#;
        assert!(matches!(
            parse_zero_shot_reply(mismatched),
            Err(ClassifierError::InvalidOutput(_))
        ));
        assert!(matches!(
            parse_zero_shot_reply(r#"{"error":"Model is loading"}"#),
            Err(ClassifierError::InvalidOutput(_))
        ));
        assert!(matches!(
            parse_zero_shot_reply("[]"),
            Err(ClassifierError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn posts_candidate_labels_to_model_route() {
        let app = Router::new().route(
            "/models/:org/:name",
            post(
                |Path((org, name)): Path<(String, String)>, Json(body): Json<Value>| async move {
                    assert_eq!(format!("{org}/{name}"), "facebook/bart-large-mnli");
                    assert_eq!(body["parameters"]["multi_label"], false);
                    let labels = body["parameters"]["candidate_labels"].clone();
                    let count = labels.as_array().map(Vec::len).unwrap_or(0);
                    let scores: Vec<f64> = (0..count).map(|i| 1.0 / (i as f64 + 1.0)).collect();
                    Json(serde_json::json!({
                        "sequence": body["inputs"],
                        "labels": labels,
                        "scores": scores,
                    }))
                },
            ),
        );
        let addr = spawn_server(app).await;

        let classifier =
            HuggingFaceClassifier::new(&config_for(format!("http://{addr}")), None).unwrap();
        let scores = classifier
            .classify("Ladder collapsed", &["Equipment failure", "Human error"])
            .await
            .unwrap();
        assert_eq!(
            scores,
            vec![
                LabelScore::new("Equipment failure", 1.0),
                LabelScore::new("Human error", 0.5)
            ]
        );
    }

    #[tokio::test]
    async fn model_loading_status_is_rejected() {
        let app = Router::new().route(
            "/models/:org/:name",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    r#"{"error":"Model facebook/bart-large-mnli is currently loading"}"#,
                )
            }),
        );
        let addr = spawn_server(app).await;

        let classifier =
            HuggingFaceClassifier::new(&config_for(format!("http://{addr}")), None).unwrap();
        let err = classifier.classify("text", &["a"]).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Rejected { status: 503, .. }));
    }
}
