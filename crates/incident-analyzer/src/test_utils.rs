use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::Router;
use incident_protocol::IncidentSubmission;
use tokio::net::TcpListener;

use crate::model::{ChatModel, ModelError};

pub(crate) fn temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{prefix}-{nanos}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Serves `app` on an ephemeral localhost port for the rest of the test.
pub(crate) async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

pub(crate) fn sample_submission() -> IncidentSubmission {
    IncidentSubmission {
        date: "2024-05-01".to_string(),
        location: "Warehouse aisle 4".to_string(),
        description: "Worker slipped on wet floor while carrying boxes".to_string(),
        people_involved: "J. Rivera".to_string(),
        immediate_causes: "Spilled cleaning fluid".to_string(),
        contributing_factors: "Poor lighting near the dock door".to_string(),
    }
}

pub(crate) struct FakeChatModel {
    reply: Result<String, fn() -> ModelError>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeChatModel {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn failing(make_error: fn() -> ModelError) -> Self {
        Self {
            reply: Err(make_error),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl ChatModel for FakeChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}
