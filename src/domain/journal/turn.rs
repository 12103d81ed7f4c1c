//! Turn entity: one recorded check-in

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::mood::{Classification, CopingActions, JournalingPrompts, MoodLabel};

/// Monotonic turn identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(u64);

impl TurnId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The identifier following this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user interaction.
/// Immutable once created; the journal only ever appends turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    timestamp: DateTime<Utc>,
    input_text: String,
    mood_label: MoodLabel,
    #[serde(default)]
    confidence: Option<u8>,
    coaching_text: String,
    risk_flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actions: Option<CopingActions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    journaling: Option<JournalingPrompts>,
}

impl Turn {
    /// Build a turn from a classified completion
    pub fn new(
        id: TurnId,
        timestamp: DateTime<Utc>,
        input_text: impl Into<String>,
        classification: Classification,
    ) -> Self {
        Self {
            id,
            timestamp,
            input_text: input_text.into(),
            mood_label: classification.mood_label,
            confidence: classification.confidence,
            coaching_text: classification.coaching_text,
            risk_flag: classification.risk_flag,
            summary: classification.summary,
            actions: classification.actions,
            journaling: classification.journaling,
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn mood_label(&self) -> MoodLabel {
        self.mood_label
    }

    pub fn confidence(&self) -> Option<u8> {
        self.confidence
    }

    pub fn coaching_text(&self) -> &str {
        &self.coaching_text
    }

    pub fn risk_flag(&self) -> bool {
        self.risk_flag
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn actions(&self) -> Option<&CopingActions> {
        self.actions.as_ref()
    }

    pub fn journaling(&self) -> Option<&JournalingPrompts> {
        self.journaling.as_ref()
    }

    /// Input text shortened to `max_chars`, with an ellipsis when cut
    pub fn input_excerpt(&self, max_chars: usize) -> String {
        excerpt(&self.input_text, max_chars)
    }
}

/// Shorten `text` to at most `max_chars` characters (plus "...") on one line
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let cut: String = single_line.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn classification() -> Classification {
        Classification {
            mood_label: MoodLabel::Happy,
            confidence: Some(90),
            coaching_text: "Keep going.".to_string(),
            risk_flag: false,
            summary: Some("Good news at work".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn new_copies_classification() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let turn = Turn::new(TurnId::new(7), ts, "hello", classification());
        assert_eq!(turn.id(), TurnId::new(7));
        assert_eq!(turn.timestamp(), ts);
        assert_eq!(turn.input_text(), "hello");
        assert_eq!(turn.mood_label(), MoodLabel::Happy);
        assert_eq!(turn.confidence(), Some(90));
        assert_eq!(turn.coaching_text(), "Keep going.");
        assert!(!turn.risk_flag());
        assert_eq!(turn.summary(), Some("Good news at work"));
        assert!(turn.actions().is_none());
    }

    #[test]
    fn turn_id_next_is_monotonic() {
        let id = TurnId::new(1);
        assert!(id.next() > id);
        assert_eq!(id.next().value(), 2);
    }

    #[test]
    fn excerpt_short_text_unchanged() {
        assert_eq!(excerpt("short text", 50), "short text");
    }

    #[test]
    fn excerpt_long_text_is_cut_on_char_boundary() {
        let text = "é".repeat(60);
        let cut = excerpt(&text, 50);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 53);
    }

    #[test]
    fn excerpt_flattens_newlines() {
        assert_eq!(excerpt("one\ntwo\n\nthree", 50), "one two three");
    }

    #[test]
    fn serializes_as_flat_record() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let turn = Turn::new(TurnId::new(3), ts, "hi", classification());
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["mood_label"], "Happy");
        assert_eq!(json["risk_flag"], false);
    }

    #[test]
    fn missing_confidence_deserializes_as_none() {
        let line = r#"{"id":1,"timestamp":"2026-01-02T03:04:05Z","input_text":"x","mood_label":"Sad","coaching_text":"y","risk_flag":false}"#;
        let turn: Turn = serde_json::from_str(line).unwrap();
        assert_eq!(turn.confidence(), None);
        assert_eq!(turn.mood_label(), MoodLabel::Sad);
        assert_eq!(turn.summary(), None);
        assert!(turn.journaling().is_none());
    }

    #[test]
    fn guidance_round_trips_through_json() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let classification = Classification {
            actions: CopingActions::from_items(&["Breathe: Slow exhale"]),
            journaling: JournalingPrompts::from_lists(vec![], vec!["What helped?".to_string()]),
            ..classification()
        };
        let turn = Turn::new(TurnId::new(4), ts, "hi", classification);
        let line = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&line).unwrap();
        assert_eq!(back, turn);
        assert_eq!(
            back.actions().and_then(|a| a.breathe.as_deref()),
            Some("Slow exhale")
        );
    }
}
