//! Domain layer - Core business logic
//!
//! Contains value objects, entities, the mood classifier and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod duration;
pub mod error;
pub mod journal;
pub mod mood;
pub mod prompt;

// Re-export common types
pub use config::AppConfig;
pub use duration::Duration;
pub use error::*;
pub use journal::{Turn, TurnId};
pub use mood::{classify, Classification, MoodLabel, SafetyPolicy};
pub use prompt::{CoachPrompt, PromptLimits};
