//! Prompt domain module

mod coach_prompt;

pub use coach_prompt::{CoachPrompt, PromptLimits, DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_INPUT_CHARS};
