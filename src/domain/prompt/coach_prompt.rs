//! Coaching prompt value object

use crate::domain::error::InputError;
use crate::domain::journal::Turn;

/// Default maximum length of a single check-in, in characters
pub const DEFAULT_MAX_INPUT_CHARS: usize = 2000;

/// Default number of prior turns included as context
pub const DEFAULT_HISTORY_WINDOW: usize = 3;

/// Length of each prior-turn excerpt in the history section
const HISTORY_EXCERPT_CHARS: usize = 80;

/// Fixed instruction preamble: mood detection plus coaching persona
const PREAMBLE: &str = r#"You are EmotiCare, a compassionate, empathetic wellbeing coach and an expert mood analyzer.

Instructions:
- Determine the user's current mood from their message
- Classify the mood as exactly one of: Happy, Sad, Anxious, Angry, Neutral, Overwhelmed, Depressive
- Estimate your confidence in that label from 0 to 100
- Then write a warm, supportive, non-judgmental reply of two to four sentences
- Acknowledge and validate their feelings and offer a comforting perspective or one small, gentle next step
- Do NOT diagnose and do NOT give medical advice

- Summarize the user's situation in 7 to 10 words
- Suggest three short, actionable coping steps: a breathing or grounding exercise for right now, one small step to take now, and one longer-term action
- Name up to three key themes or emotions in the message and suggest two specific journaling prompts

Respond in exactly this format:
MOOD: <Label>
CONFIDENCE: <0-100>
SUMMARY: <7-10 word summary>
<your supportive reply>
ACTIONS:
- Breathe: <breathing or grounding exercise>
- Do now: <small step>
- Plan: <longer-term action>
THEMES: <theme>, <theme>, <theme>
PROMPTS:
- <journaling prompt>
- <journaling prompt>"#;

/// Limits applied when composing a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLimits {
    /// Maximum input length in characters; longer input is rejected, never truncated
    pub max_input_chars: usize,
    /// Number of most recent turns included as context
    pub history_window: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

/// Value object representing the complete outbound prompt.
/// Combines the fixed preamble, a bounded history window and the user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachPrompt {
    content: String,
}

impl CoachPrompt {
    /// Compose a prompt for `input_text`.
    ///
    /// Only the last `limits.history_window` entries of `history` are used.
    /// The user text is embedded verbatim.
    pub fn compose(
        input_text: &str,
        history: &[Turn],
        limits: PromptLimits,
    ) -> Result<Self, InputError> {
        if input_text.trim().is_empty() {
            return Err(InputError::Empty);
        }

        let len = input_text.chars().count();
        if len > limits.max_input_chars {
            return Err(InputError::TooLarge {
                len,
                max: limits.max_input_chars,
            });
        }

        let mut content = String::from(PREAMBLE);

        let skip = history.len().saturating_sub(limits.history_window);
        let window = &history[skip..];
        if !window.is_empty() {
            content.push_str("\n\nRecent check-ins (oldest first):");
            for turn in window {
                content.push_str(&format!(
                    "\n- [{}] {}",
                    turn.mood_label(),
                    turn.input_excerpt(HISTORY_EXCERPT_CHARS)
                ));
            }
        }

        content.push_str("\n\nUser input:\n\"\"\"\n");
        content.push_str(input_text);
        content.push_str("\n\"\"\"");

        Ok(Self { content })
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the content
    pub fn into_content(self) -> String {
        self.content
    }
}
