//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, SafetyConfig};
use crate::domain::duration::Duration;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;

    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;

    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &display_value(&config, key).unwrap_or_else(|| "(not set)".to_string()),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` and store it under `key`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "model" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Model name must not be empty"));
            }
            config.model = Some(value.trim().to_string());
        }
        "base_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(key, "Value must start with http:// or https://"));
            }
            config.base_url = Some(value.to_string());
        }
        "timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.timeout = Some(value.to_string());
        }
        "host" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Host must not be empty"));
            }
            config.host = Some(value.trim().to_string());
        }
        "port" => {
            let port = value
                .parse::<u16>()
                .map_err(|_| invalid(key, "Value must be a port number (0-65535)"))?;
            config.port = Some(port);
        }
        "journal" => {
            config.journal = Some(
                parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?,
            )
        }
        "journal_path" => config.journal_path = Some(value.to_string()),
        "history_window" => {
            config.history_window = Some(
                value
                    .parse::<usize>()
                    .map_err(|_| invalid(key, "Value must be a non-negative integer"))?,
            )
        }
        "max_input_chars" => {
            let max = value
                .parse::<usize>()
                .map_err(|_| invalid(key, "Value must be a positive integer"))?;
            if max == 0 {
                return Err(invalid(key, "Value must be a positive integer"));
            }
            config.max_input_chars = Some(max);
        }
        "safety.message" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Safety message must not be empty"));
            }
            config
                .safety
                .get_or_insert_with(SafetyConfig::default)
                .message = Some(value.to_string());
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

/// Value shown by `get`/`list`; the API key is masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "model" => config.model.clone(),
        "base_url" => config.base_url.clone(),
        "timeout" => config.timeout.clone(),
        "host" => config.host.clone(),
        "port" => config.port.map(|p| p.to_string()),
        "journal" => config.journal.map(|b| b.to_string()),
        "journal_path" => config.journal_path.clone(),
        "history_window" => config.history_window.map(|n| n.to_string()),
        "max_input_chars" => config.max_input_chars.map(|n| n.to_string()),
        "safety.message" => config.safety.as_ref().and_then(|s| s.message.clone()),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
