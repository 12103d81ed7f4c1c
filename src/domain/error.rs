//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a mood label cannot be recognized
#[derive(Debug, Clone, Error)]
#[error("Invalid mood: \"{input}\". Valid moods are: happy, sad, anxious, angry, neutral, overwhelmed, depressive, other")]
pub struct InvalidMoodError {
    pub input: String,
}

/// Error when user input cannot be turned into a prompt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please share your thoughts first: the message is empty")]
    Empty,

    #[error("Message is too long ({len} characters). Please keep it under {max} characters.")]
    TooLarge { len: usize, max: usize },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
