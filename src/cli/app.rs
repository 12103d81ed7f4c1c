//! App runners for the web server and the one-shot commands

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{CompletionClient, ConfigStore};
use crate::application::render::{render_history, render_transcript};
use crate::application::{CheckInUseCase, SessionJournal};
use crate::domain::config::AppConfig;
use crate::infrastructure::{GeminiClient, JsonlJournalStore, XdgConfigStore};
use crate::web::{app_router, AppState, SharedCheckIn};

use super::presenter::Presenter;
use super::signals::shutdown_signal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

const MISSING_API_KEY: &str = "Missing API key. Set GEMINI_API_KEY (environment or .env file) or run 'emoticare config set api_key <key>'";

/// Run the local web app
pub async fn run_serve(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let api_key = match get_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let checkin = build_checkin(&config, api_key, &presenter);
    let addr = format!("{}:{}", config.host_or_default(), config.port_or_default());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            presenter.error(&format!("Failed to bind {}: {}", addr, e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    tracing::info!(addr = %local, model = config.model_or_default(), "server starting");
    presenter.success(&format!("EmotiCare is running at http://{}", local));
    presenter.info("Press Ctrl+C to stop");

    let app = app_router(AppState::new(checkin));
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        presenter.error(&format!("Server error: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    tracing::info!("server stopped");
    ExitCode::from(EXIT_SUCCESS)
}

/// Run a single check-in from the terminal
pub async fn run_ask(config: AppConfig, text: &str) -> ExitCode {
    let mut presenter = Presenter::new();

    let api_key = match get_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let checkin = build_checkin(&config, api_key, &presenter);

    presenter.start_spinner("Listening...");
    match checkin.execute(text).await {
        Ok(output) => {
            presenter.spinner_success("Check-in recorded");
            presenter.checkin(&output.payload);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Check-in failed");
            presenter.error(&e.user_message());
            if let Some(notice) = checkin.safety_for_input(text) {
                presenter.safety(&notice);
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Show recent check-ins, or export the whole session
pub async fn run_history(config: AppConfig, limit: usize, export: Option<&Path>) -> ExitCode {
    let presenter = Presenter::new();

    if !config.journal_or_default() {
        presenter.warn("Journal is disabled; no history is stored between runs");
    }
    let journal = build_journal(&config, &presenter);
    let turns = journal.all();

    if let Some(path) = export {
        let transcript = render_transcript(&turns, &config.safety_policy());
        return match tokio::fs::write(path, transcript).await {
            Ok(()) => {
                presenter.success(&format!(
                    "Exported {} entries to {}",
                    turns.len(),
                    path.display()
                ));
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                presenter.error(&format!("Failed to write {}: {}", path.display(), e));
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let mut view = render_history(&turns);
    view.entries.truncate(limit);
    presenter.history(&view);
    ExitCode::from(EXIT_SUCCESS)
}

/// API key from the merged config (environment already folded in)
pub fn get_api_key(config: &AppConfig) -> Result<String, String> {
    config
        .api_key()
        .map(str::to_string)
        .ok_or_else(|| MISSING_API_KEY.to_string())
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %store.path().display(), error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Journal per config; falls back to memory when the file cannot be read
pub fn build_journal(config: &AppConfig, presenter: &Presenter) -> SessionJournal {
    if !config.journal_or_default() {
        return SessionJournal::in_memory();
    }

    let path = config.journal_path_or_default();
    match SessionJournal::open(Box::new(JsonlJournalStore::new(&path))) {
        Ok(journal) => journal,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "journal unavailable");
            presenter.warn(&format!(
                "Could not read journal ({}); history will not be saved this session",
                e
            ));
            SessionJournal::in_memory()
        }
    }
}

/// Gemini client per config
pub fn build_client(config: &AppConfig, api_key: String) -> GeminiClient {
    GeminiClient::new(api_key)
        .with_model(config.model_or_default())
        .with_fallback_models(config.fallback_models_or_default())
        .with_base_url(config.base_url_or_default())
        .with_timeout(config.timeout_or_default())
}

/// Wire the check-in use case
pub fn build_checkin(config: &AppConfig, api_key: String, presenter: &Presenter) -> SharedCheckIn {
    let client: Arc<dyn CompletionClient> = Arc::new(build_client(config, api_key));
    Arc::new(CheckInUseCase::new(
        client,
        Arc::new(build_journal(config, presenter)),
        config.safety_policy(),
        config.prompt_limits(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_required() {
        assert!(get_api_key(&AppConfig::defaults()).is_err());

        let config = AppConfig {
            api_key: Some(" key ".to_string()),
            ..AppConfig::defaults()
        };
        assert_eq!(get_api_key(&config), Ok("key".to_string()));
    }

    #[test]
    fn disabled_journal_is_in_memory() {
        let config = AppConfig {
            journal: Some(false),
            journal_path: Some("/nonexistent/dir/journal.jsonl".to_string()),
            ..AppConfig::defaults()
        };
        let journal = build_journal(&config, &Presenter::new());
        assert!(journal.location().is_none());
    }

    #[test]
    fn enabled_journal_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let config = AppConfig {
            journal_path: Some(path.to_string_lossy().to_string()),
            ..AppConfig::defaults()
        };
        let journal = build_journal(&config, &Presenter::new());
        assert_eq!(journal.location(), Some(path.as_path()));
    }
}
