//! Check-in use case: compose, complete, classify, record, render

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::domain::error::InputError;
use crate::domain::journal::Turn;
use crate::domain::mood::{classify, SafetyPolicy};
use crate::domain::prompt::{CoachPrompt, PromptLimits};

use super::journal::SessionJournal;
use super::ports::{CompletionClient, CompletionError};
use super::render::{render, safety_notice, DisplayPayload, SafetyNotice};

/// Errors from the check-in use case
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckInError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl CheckInError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(InputError::Empty) => "validation",
            Self::Input(InputError::TooLarge { .. }) => "input_too_large",
            Self::Completion(CompletionError::Auth) => "auth",
            Self::Completion(CompletionError::Upstream { .. }) => "upstream",
            Self::Completion(CompletionError::Timeout { .. }) => "timeout",
        }
    }

    /// Whether resubmitting (possibly with edited text) can succeed without
    /// changing the configuration
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Completion(CompletionError::Auth))
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(e) => e.to_string(),
            Self::Completion(CompletionError::Auth) => {
                "The AI service rejected our credentials. Please check the configured API key."
                    .to_string()
            }
            Self::Completion(CompletionError::Upstream { .. }) => {
                "Sorry, the AI service could not respond right now. Please try again in a moment."
                    .to_string()
            }
            Self::Completion(CompletionError::Timeout { after }) => format!(
                "The AI service took longer than {} to respond. Please try again.",
                after
            ),
        }
    }
}

/// Output from the check-in use case
#[derive(Debug, Clone)]
pub struct CheckInOutput {
    /// The recorded turn
    pub turn: Turn,
    /// The rendered payload for the turn
    pub payload: DisplayPayload,
}

/// One-turn coaching pipeline.
///
/// The completion call is the only suspension point. The turn is appended to
/// the journal only after a fully classified result exists, so an upstream
/// failure or an abandoned request never records anything.
pub struct CheckInUseCase<C>
where
    C: CompletionClient,
{
    client: C,
    journal: Arc<SessionJournal>,
    policy: SafetyPolicy,
    limits: PromptLimits,
}

impl<C> CheckInUseCase<C>
where
    C: CompletionClient,
{
    /// Create a new use case instance
    pub fn new(
        client: C,
        journal: Arc<SessionJournal>,
        policy: SafetyPolicy,
        limits: PromptLimits,
    ) -> Self {
        Self {
            client,
            journal,
            policy,
            limits,
        }
    }

    pub fn journal(&self) -> &Arc<SessionJournal> {
        &self.journal
    }

    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    /// Safety card for `input_text`, if it contains risk language.
    /// Lets surfaces show emergency resources even when the pipeline failed.
    pub fn safety_for_input(&self, input_text: &str) -> Option<SafetyNotice> {
        self.policy
            .matches(input_text)
            .then(|| safety_notice(&self.policy))
    }

    /// Execute the check-in workflow
    pub async fn execute(&self, input_text: &str) -> Result<CheckInOutput, CheckInError> {
        let history = self.journal.recent(self.limits.history_window);
        let prompt = CoachPrompt::compose(input_text, &history, self.limits)?;

        tracing::debug!(
            prompt_chars = prompt.content().chars().count(),
            history = history.len(),
            "requesting completion"
        );

        let raw = self.client.complete(&prompt).await.map_err(|e| {
            tracing::warn!(error = %e, "completion failed");
            e
        })?;

        let classification = classify(&raw, input_text, &self.policy);
        let turn = self.journal.append(Utc::now(), input_text, classification);

        if turn.risk_flag() {
            tracing::warn!(turn = %turn.id(), "risk language detected; showing safety resources");
        }
        tracing::info!(
            turn = %turn.id(),
            mood = %turn.mood_label(),
            risk = turn.risk_flag(),
            "check-in classified"
        );

        let payload = render(&turn, &self.policy);

        Ok(CheckInOutput { turn, payload })
    }
}
