//! Runtime configuration.
//!
//! Read once at startup from `RECAP_*` environment variables; every value
//! has a default so the binary runs with no environment at all.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DB_PATH: &str = ".recap_db";
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434/";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "llama3.2";
pub const DEFAULT_LANGUAGE_MODEL: &str = "llama3.2";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    pub ai: AiConfig,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the Ollama daemon, always ending in `/`.
    pub base_url: Url,
    pub summarizer_model: String,
    pub language_model: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_str = get("RECAP_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|e| AppError::Config(format!("RECAP_BIND `{}` is invalid: {}", bind_str, e)))?;

        let db_path = PathBuf::from(get("RECAP_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()));

        let url_str = get("RECAP_OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let base_url = parse_base_url(&url_str)?;

        let timeout_secs = match get("RECAP_AI_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                AppError::Config(format!(
                    "RECAP_AI_TIMEOUT_SECS must be a positive number of seconds, got `{}`",
                    raw
                ))
            })?,
            None => DEFAULT_AI_TIMEOUT_SECS,
        };

        Ok(Self {
            bind,
            db_path,
            ai: AiConfig {
                base_url,
                summarizer_model: get("RECAP_SUMMARIZER_MODEL")
                    .unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string()),
                language_model: get("RECAP_LANGUAGE_MODEL")
                    .unwrap_or_else(|| DEFAULT_LANGUAGE_MODEL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    /// The address the popup is served from.
    pub fn popup_url(&self) -> String {
        format!("http://{}/", self.bind)
    }
}

fn parse_base_url(raw: &str) -> AppResult<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| AppError::Config(format!("RECAP_OLLAMA_URL `{}` is invalid: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!(
            "RECAP_OLLAMA_URL must use http or https, got `{}`",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.ai.base_url.as_str(), DEFAULT_OLLAMA_URL);
        assert_eq!(config.ai.summarizer_model, DEFAULT_SUMMARIZER_MODEL);
        assert_eq!(config.ai.timeout, Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS));
        assert_eq!(config.popup_url(), "http://127.0.0.1:3000/");
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = config_from(&[("RECAP_OLLAMA_URL", "http://gpu-box:11434")]).unwrap();
        assert_eq!(config.ai.base_url.as_str(), "http://gpu-box:11434/");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("RECAP_LANGUAGE_MODEL", "   ")]).unwrap();
        assert_eq!(config.ai.language_model, DEFAULT_LANGUAGE_MODEL);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("RECAP_BIND", "nowhere")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("RECAP_OLLAMA_URL", "ftp://host/")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("RECAP_AI_TIMEOUT_SECS", "0")]),
            Err(AppError::Config(_))
        ));
    }
}
