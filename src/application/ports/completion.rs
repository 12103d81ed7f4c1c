//! Completion port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::duration::Duration;
use crate::domain::prompt::CoachPrompt;

/// Completion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Missing or invalid API key. Set GEMINI_API_KEY or run 'emoticare config set api_key <key>'")]
    Auth,

    #[error("Upstream request failed: {cause}")]
    Upstream { cause: String },

    #[error("Upstream request timed out after {after}")]
    Timeout { after: Duration },
}

impl CompletionError {
    pub fn upstream(cause: impl Into<String>) -> Self {
        Self::Upstream {
            cause: cause.into(),
        }
    }
}

/// Port for the hosted text-completion service
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a prompt and return the raw completion text.
    ///
    /// # Arguments
    /// * `prompt` - The composed coaching prompt
    ///
    /// # Returns
    /// The raw completion text or an error
    async fn complete(&self, prompt: &CoachPrompt) -> Result<String, CompletionError>;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, prompt: &CoachPrompt) -> Result<String, CompletionError> {
        (**self).complete(prompt).await
    }
}
