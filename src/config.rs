// Runtime configuration, loaded once at startup from the environment (and .env).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AssistantError, Result};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "SOCIALBOT_MODEL";
pub const TIMEOUT_VAR: &str = "SOCIALBOT_HTTP_TIMEOUT_SECS";
pub const TEMPLATE_DIR_VAR: &str = "SOCIALBOT_TEMPLATE_DIR";
pub const STATIC_DIR_VAR: &str = "SOCIALBOT_STATIC_DIR";

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    /// Applied to both page fetches and completion calls. `None` keeps the
    /// client default, which never times out.
    pub http_timeout: Option<Duration>,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
}

// Keep the credential out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("http_timeout", &self.http_timeout)
            .field("template_dir", &self.template_dir)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Config {
    /// Build a config with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_timeout: None,
            template_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
        }
    }

    /// Read the process environment. Fails if the API key is absent or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AssistantError::Config(format!("{API_KEY_VAR} is not set")))?;

        let mut config = Self::new(api_key);

        if let Some(base) = lookup(API_BASE_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AssistantError::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"))
            })?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(dir) = lookup(TEMPLATE_DIR_VAR) {
            config.template_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, "gpt-4");
        assert!(config.http_timeout.is_none());
        assert_eq!(config.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "sk-test"),
            (API_BASE_VAR, "http://localhost:8080/v1/"),
            (MODEL_VAR, "gpt-4o-mini"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "sk-test"), (TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::new("sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
