//! `humantime` strings ("30s", "1m 30s") in config files.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(raw.trim())
        .map_err(|err| format!("invalid duration {raw:?}: {err}"))?;
    if duration.is_zero() {
        return Err(format!("duration {raw:?} must be greater than zero"));
    }
    Ok(duration)
}

/// For `#[serde(deserialize_with = "...")]` on `Duration` fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Timeouts {
        #[serde(deserialize_with = "super::deserialize")]
        request_timeout: Duration,
    }

    #[test]
    fn parses_humantime_values() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration(" 1m 30s ").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn deserializes_from_toml() {
        let parsed: Timeouts = toml::from_str(r#"request_timeout = "250ms""#).unwrap();
        assert_eq!(parsed.request_timeout, Duration::from_millis(250));
        let err = toml::from_str::<Timeouts>(r#"request_timeout = "never""#);
        assert!(err.is_err());
    }
}
