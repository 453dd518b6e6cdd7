use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8001";
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "facebook/bart-large-mnli";
const DEFAULT_API_KEY_ENV: &str = "HF_API_TOKEN";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ClassifierServiceConfig {
    pub(crate) listen_addr: String,
    pub(crate) classifier: ClassifierConfig,
    pub(crate) cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ClassifierConfig {
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) api_key: Option<String>,
    pub(crate) api_key_env: String,
    #[serde(deserialize_with = "service_utils::duration::deserialize")]
    pub(crate) request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct CorsConfig {
    pub(crate) enabled: bool,
}

impl Default for ClassifierServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            classifier: ClassifierConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ClassifierConfig {
    pub(crate) fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

fn validate_service_config(config: &ClassifierServiceConfig) -> anyhow::Result<()> {
    config
        .listen_addr
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid listen_addr {}", config.listen_addr))?;
    if config.classifier.base_url.trim().is_empty() {
        anyhow::bail!("classifier.base_url cannot be empty");
    }
    let model = config.classifier.model.trim();
    if model.is_empty() || model.starts_with('/') {
        anyhow::bail!("classifier.model must be a model id such as {DEFAULT_MODEL}");
    }
    Ok(())
}

pub(crate) fn load_service_config(path: &Path) -> anyhow::Result<ClassifierServiceConfig> {
    if !path.exists() {
        tracing::info!(
            config = %path.display(),
            "config file not found, using defaults"
        );
        return Ok(ClassifierServiceConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ClassifierServiceConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_service_config(&config)?;
    Ok(config)
}
