//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::duration::Duration;
use crate::domain::mood::{
    default_resources, EmergencyResource, SafetyPolicy, DEFAULT_RISK_PHRASES,
    DEFAULT_SAFETY_MESSAGE,
};
use crate::domain::prompt::{PromptLimits, DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_INPUT_CHARS};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Models tried, in order, when the primary model is not available
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &["gemini-2.5-pro", "gemini-2.0-flash"];

/// Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Loopback address the web app binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 7860;

/// Safety policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyConfig {
    pub message: Option<String>,
    pub phrases: Option<Vec<String>>,
    pub resources: Option<Vec<EmergencyResource>>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub fallback_models: Option<Vec<String>>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub journal: Option<bool>,
    pub journal_path: Option<String>,
    pub history_window: Option<usize>,
    pub max_input_chars: Option<usize>,
    pub safety: Option<SafetyConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            fallback_models: Some(DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()),
            base_url: None,
            timeout: Some(Duration::default_timeout().to_string()),
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            journal: Some(true),
            journal_path: None,
            history_window: Some(DEFAULT_HISTORY_WINDOW),
            max_input_chars: Some(DEFAULT_MAX_INPUT_CHARS),
            safety: Some(SafetyConfig {
                message: Some(DEFAULT_SAFETY_MESSAGE.to_string()),
                phrases: Some(DEFAULT_RISK_PHRASES.iter().map(|p| p.to_string()).collect()),
                resources: Some(default_resources()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            fallback_models: other.fallback_models.or(self.fallback_models),
            base_url: other.base_url.or(self.base_url),
            timeout: other.timeout.or(self.timeout),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            journal: other.journal.or(self.journal),
            journal_path: other.journal_path.or(self.journal_path),
            history_window: other.history_window.or(self.history_window),
            max_input_chars: other.max_input_chars.or(self.max_input_chars),
            safety: Self::merge_safety_config(self.safety, other.safety),
        }
    }

    /// Merge safety config sections
    fn merge_safety_config(
        base: Option<SafetyConfig>,
        other: Option<SafetyConfig>,
    ) -> Option<SafetyConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(SafetyConfig {
                message: o.message.or(b.message),
                phrases: o.phrases.or(b.phrases),
                resources: o.resources.or(b.resources),
            }),
        }
    }

    /// Get the API key if set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn fallback_models_or_default(&self) -> Vec<String> {
        self.fallback_models
            .clone()
            .unwrap_or_else(|| DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect())
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Get timeout as parsed Duration, or default if not set/invalid
    pub fn timeout_or_default(&self) -> Duration {
        self.timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_timeout)
    }

    pub fn host_or_default(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether turns are persisted to the journal file, true if not set
    pub fn journal_or_default(&self) -> bool {
        self.journal.unwrap_or(true)
    }

    /// Journal file path, or `<data_dir>/emoticare/journal.jsonl`
    pub fn journal_path_or_default(&self) -> PathBuf {
        match self.journal_path.as_deref() {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("emoticare")
                .join("journal.jsonl"),
        }
    }

    /// Prompt limits; a zero input limit falls back to the default
    pub fn prompt_limits(&self) -> PromptLimits {
        PromptLimits {
            max_input_chars: self
                .max_input_chars
                .filter(|max| *max > 0)
                .unwrap_or(DEFAULT_MAX_INPUT_CHARS),
            history_window: self.history_window.unwrap_or(DEFAULT_HISTORY_WINDOW),
        }
    }

    /// Build the safety policy, filling unset parts with defaults
    pub fn safety_policy(&self) -> SafetyPolicy {
        let safety = self.safety.clone().unwrap_or_default();
        let message = safety
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SAFETY_MESSAGE.to_string());
        let resources = safety.resources.unwrap_or_else(default_resources);

        match safety.phrases {
            Some(phrases) => SafetyPolicy::new(phrases, message, resources),
            None => SafetyPolicy::new(DEFAULT_RISK_PHRASES.iter().copied(), message, resources),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, Some("gemini-2.5-flash".to_string()));
        assert_eq!(config.timeout, Some("30s".to_string()));
        assert_eq!(config.host, Some("127.0.0.1".to_string()));
        assert_eq!(config.port, Some(7860));
        assert_eq!(config.journal, Some(true));
        assert_eq!(config.history_window, Some(3));
        assert_eq!(config.max_input_chars, Some(2000));
        let safety = config.safety.as_ref().unwrap();
        assert!(safety.phrases.as_ref().unwrap().len() > 10);
        assert_eq!(safety.resources.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.model.is_none());
        assert!(config.timeout.is_none());
        assert!(config.safety.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            model: Some("base-model".to_string()),
            port: Some(8000),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            model: None,
            port: Some(9000),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.model, Some("base-model".to_string()));
        assert_eq!(merged.port, Some(9000));
    }

    #[test]
    fn merge_safety_sections_field_by_field() {
        let base = AppConfig {
            safety: Some(SafetyConfig {
                message: Some("base message".to_string()),
                phrases: Some(vec!["base phrase".to_string()]),
                resources: None,
            }),
            ..Default::default()
        };
        let other = AppConfig {
            safety: Some(SafetyConfig {
                message: Some("other message".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        let safety = merged.safety.unwrap();
        assert_eq!(safety.message, Some("other message".to_string()));
        assert_eq!(safety.phrases, Some(vec!["base phrase".to_string()]));
    }

    #[test]
    fn api_key_ignores_blank_values() {
        let config = AppConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.api_key().is_none());

        let config = AppConfig {
            api_key: Some(" key ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_key(), Some("key"));
    }

    #[test]
    fn timeout_or_default_parses_and_falls_back() {
        let config = AppConfig {
            timeout: Some("45s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.timeout_or_default().as_secs(), 45);

        let config = AppConfig {
            timeout: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.timeout_or_default().as_secs(), 30);
    }

    #[test]
    fn scalar_defaults_on_empty() {
        let config = AppConfig::empty();
        assert_eq!(config.model_or_default(), DEFAULT_MODEL);
        assert_eq!(config.base_url_or_default(), DEFAULT_BASE_URL);
        assert_eq!(config.host_or_default(), "127.0.0.1");
        assert_eq!(config.port_or_default(), 7860);
        assert!(config.journal_or_default());
        assert_eq!(config.fallback_models_or_default().len(), 2);
    }

    #[test]
    fn journal_path_default_ends_with_file_name() {
        let path = AppConfig::empty().journal_path_or_default();
        assert!(path.ends_with("emoticare/journal.jsonl"));

        let config = AppConfig {
            journal_path: Some("/tmp/custom.jsonl".to_string()),
            ..Default::default()
        };
        assert_eq!(config.journal_path_or_default(), PathBuf::from("/tmp/custom.jsonl"));
    }

    #[test]
    fn prompt_limits_reject_zero_input_limit() {
        let config = AppConfig {
            max_input_chars: Some(0),
            history_window: Some(5),
            ..Default::default()
        };
        let limits = config.prompt_limits();
        assert_eq!(limits.max_input_chars, DEFAULT_MAX_INPUT_CHARS);
        assert_eq!(limits.history_window, 5);
    }

    #[test]
    fn safety_policy_uses_configured_phrases() {
        let config = AppConfig {
            safety: Some(SafetyConfig {
                phrases: Some(vec!["give up on everything".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let policy = config.safety_policy();
        assert!(policy.matches("I just want to give up on everything"));
        assert!(!policy.matches("I want to hurt myself"));
        assert_eq!(policy.message(), DEFAULT_SAFETY_MESSAGE);
        assert_eq!(policy.resources().len(), 3);
    }

    #[test]
    fn safety_policy_defaults_when_unset() {
        let policy = AppConfig::empty().safety_policy();
        assert_eq!(policy, SafetyPolicy::default());
    }
}
