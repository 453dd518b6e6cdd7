use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_DATABASE_PATH: &str = "incidents.db";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct AnalyzerConfig {
    pub(crate) listen_addr: String,
    pub(crate) database_path: PathBuf,
    pub(crate) model: ModelConfig,
    pub(crate) cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ModelConfig {
    pub(crate) base_url: String,
    pub(crate) chat_path: String,
    pub(crate) model: String,
    pub(crate) temperature: f32,
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

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            model: ModelConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
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

impl ModelConfig {
    /// The literal `api_key` wins over the environment variable named by `api_key_env`.
    pub(crate) fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

fn validate_analyzer_config(config: &AnalyzerConfig) -> anyhow::Result<()> {
    config
        .listen_addr
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid listen_addr {}", config.listen_addr))?;
    if config.database_path.as_os_str().is_empty() {
        anyhow::bail!("database_path cannot be empty");
    }
    if config.model.base_url.trim().is_empty() {
        anyhow::bail!("model.base_url cannot be empty");
    }
    if config.model.model.trim().is_empty() {
        anyhow::bail!("model.model cannot be empty");
    }
    if !(0.0..=2.0).contains(&config.model.temperature) {
        anyhow::bail!(
            "model.temperature must be between 0 and 2, got {}",
            config.model.temperature
        );
    }
    Ok(())
}

/// Loads the TOML config, falling back to defaults when the file does not exist.
pub(crate) fn load_analyzer_config(path: &Path) -> anyhow::Result<AnalyzerConfig> {
    if !path.exists() {
        tracing::info!(
            config = %path.display(),
            "config file not found, using defaults"
        );
        return Ok(AnalyzerConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AnalyzerConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_analyzer_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let parsed: AnalyzerConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(parsed.database_path, PathBuf::from("incidents.db"));
        assert_eq!(parsed.model.model, "gpt-4");
        assert_eq!(parsed.model.temperature, 0.5);
        assert_eq!(parsed.model.request_timeout, Duration::from_secs(60));
        assert!(parsed.cors.enabled);
        assert!(validate_analyzer_config(&parsed).is_ok());
    }

    #[test]
    fn partial_model_section_keeps_other_defaults() {
        let input = r#"
database_path = "/var/lib/incidents/incidents.db"

[model]
model = "gpt-4o-mini"
request_timeout = "15s"
"#;
        let parsed: AnalyzerConfig = toml::from_str(input).unwrap();
        assert_eq!(parsed.model.model, "gpt-4o-mini");
        assert_eq!(parsed.model.chat_path, DEFAULT_CHAT_PATH);
        assert_eq!(parsed.model.request_timeout, Duration::from_secs(15));
        assert_eq!(
            parsed.database_path,
            PathBuf::from("/var/lib/incidents/incidents.db")
        );
    }

    #[test]
    fn rejects_bad_listen_addr() {
        let parsed: AnalyzerConfig = toml::from_str(r#"listen_addr = "localhost""#).unwrap();
        let err = validate_analyzer_config(&parsed).unwrap_err().to_string();
        assert!(err.contains("listen_addr"));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let input = r#"
[model]
temperature = 3.5
"#;
        let parsed: AnalyzerConfig = toml::from_str(input).unwrap();
        assert!(validate_analyzer_config(&parsed).is_err());
    }

    #[test]
    fn literal_api_key_wins_over_env() {
        let config = ModelConfig {
            api_key: Some(" sk-test ".to_string()),
            api_key_env: "INCIDENT_ANALYZER_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));

        let config = ModelConfig {
            api_key: None,
            api_key_env: "INCIDENT_ANALYZER_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_analyzer_config(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
    }
}
