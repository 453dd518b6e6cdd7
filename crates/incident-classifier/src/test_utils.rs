use std::net::SocketAddr;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;

use crate::classifier::{ClassifierError, LabelScore, ZeroShotClassifier};

/// Serves `app` on an ephemeral localhost port for the rest of the test.
pub(crate) async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

const KEYWORDS: &[(&str, &[&str])] = &[
    ("Human error", &["slipped", "mistake", "forgot"]),
    ("Equipment failure", &["failed", "broke", "brakes", "collapsed"]),
    ("Inadequate training", &["untrained", "new hire", "training"]),
    ("Procedural failure", &["procedure", "permit", "harness"]),
    ("Poor maintenance", &["leak", "worn", "maintenance"]),
    ("Poor lighting", &["lighting", "dark"]),
    ("Slippery surface", &["slip", "wet", "icy"]),
    ("Fatigue", &["tired", "fatigue", "overtime"]),
    ("Time pressure", &["rushed", "deadline", "hurry"]),
    ("Lack of supervision", &["unsupervised", "alone", "supervisor"]),
];

pub(crate) enum FakeClassifier {
    /// Scores each candidate by how many of its keywords appear in the text.
    KeywordScorer,
    /// Returns the same scores whatever the input.
    Fixed(Vec<LabelScore>),
    Failing(fn() -> ClassifierError),
}

impl FakeClassifier {
    pub(crate) fn keyword_scorer() -> Self {
        Self::KeywordScorer
    }

    pub(crate) fn fixed(scores: Vec<LabelScore>) -> Self {
        Self::Fixed(scores)
    }

    pub(crate) fn failing(make_error: fn() -> ClassifierError) -> Self {
        Self::Failing(make_error)
    }
}

#[async_trait]
impl ZeroShotClassifier for FakeClassifier {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        match self {
            Self::KeywordScorer => {
                let text = text.to_lowercase();
                Ok(candidate_labels
                    .iter()
                    .map(|label| {
                        let hits = KEYWORDS
                            .iter()
                            .find(|(name, _)| name == label)
                            .map(|(_, words)| {
                                words.iter().filter(|word| text.contains(*word)).count()
                            })
                            .unwrap_or(0);
                        LabelScore::new(*label, hits as f64)
                    })
                    .collect())
            }
            Self::Fixed(scores) => Ok(scores.clone()),
            Self::Failing(make_error) => Err(make_error()),
        }
    }
}
