//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default number of entries shown by `history`
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// EmotiCare - mood check-ins with supportive coaching
#[derive(Parser, Debug)]
#[command(name = "emoticare")]
#[command(version)]
#[command(about = "Mood check-in companion with supportive coaching, powered by Google Gemini")]
#[command(long_about = None)]
pub struct Cli {
    /// Journal file (JSON Lines)
    #[arg(long, global = true, value_name = "PATH")]
    pub journal: Option<PathBuf>,

    /// Keep the journal in memory only
    #[arg(long, global = true)]
    pub no_journal: bool,

    /// Gemini model to use
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Upstream request timeout (e.g., 30s, 1m)
    #[arg(short = 't', long, global = true, value_name = "TIME")]
    pub timeout: Option<String>,

    /// Server options when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Web server options
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the local web app (default)
    Serve(ServeArgs),
    /// Check in once from the terminal
    Ask {
        /// How you are feeling
        text: String,
    },
    /// Show recent check-ins
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,

        /// Write the full session transcript to a file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "model",
    "base_url",
    "timeout",
    "host",
    "port",
    "journal",
    "journal_path",
    "history_window",
    "max_input_chars",
    "safety.message",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["emoticare"]);
        assert!(cli.command.is_none());
        assert!(cli.journal.is_none());
        assert!(!cli.no_journal);
        assert!(cli.model.is_none());
        assert!(cli.timeout.is_none());
        assert_eq!(cli.serve, ServeArgs::default());
    }

    #[test]
    fn cli_parses_top_level_serve_options() {
        let cli = Cli::parse_from(["emoticare", "--host", "0.0.0.0", "-p", "8080"]);
        assert_eq!(cli.serve.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.serve.port, Some(8080));
    }

    #[test]
    fn cli_parses_serve_subcommand() {
        let cli = Cli::parse_from(["emoticare", "serve", "--port", "9000"]);
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.port, Some(9000)),
            other => panic!("Expected Serve command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_ask_with_globals() {
        let cli = Cli::parse_from([
            "emoticare",
            "ask",
            "I feel great today!",
            "--no-journal",
            "-m",
            "gemini-2.5-pro",
            "-t",
            "10s",
        ]);
        assert!(cli.no_journal);
        assert_eq!(cli.model, Some("gemini-2.5-pro".to_string()));
        assert_eq!(cli.timeout, Some("10s".to_string()));
        match cli.command {
            Some(Commands::Ask { text }) => assert_eq!(text, "I feel great today!"),
            other => panic!("Expected Ask command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_history() {
        let cli = Cli::parse_from(["emoticare", "history"]);
        match cli.command {
            Some(Commands::History { limit, export }) => {
                assert_eq!(limit, DEFAULT_HISTORY_LIMIT);
                assert!(export.is_none());
            }
            other => panic!("Expected History command, got {other:?}"),
        }

        let cli = Cli::parse_from([
            "emoticare",
            "--journal",
            "/tmp/j.jsonl",
            "history",
            "-n",
            "5",
            "--export",
            "out.txt",
        ]);
        assert_eq!(cli.journal, Some(PathBuf::from("/tmp/j.jsonl")));
        match cli.command {
            Some(Commands::History { limit, export }) => {
                assert_eq!(limit, 5);
                assert_eq!(export, Some(PathBuf::from("out.txt")));
            }
            other => panic!("Expected History command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["emoticare", "config", "set", "port", "9000"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "port");
            assert_eq!(value, "9000");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("safety.message"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
