//! Safety policy: risk phrases, canned safety message, emergency resources

use serde::{Deserialize, Serialize};

/// High-risk phrases checked against both the user text and the completion.
/// Matching is done on normalized text, so apostrophes and hyphens in these
/// entries are optional in the input.
pub const DEFAULT_RISK_PHRASES: &[&str] = &[
    "kill myself",
    "killing myself",
    "hurt myself",
    "hurting myself",
    "harm myself",
    "self-harm",
    "cut myself",
    "cutting myself",
    "end my life",
    "end it all",
    "take my own life",
    "suicide",
    "suicidal",
    "want to die",
    "wanna die",
    "better off dead",
    "better off without me",
    "no reason to live",
    "nothing to live for",
    "don't want to live",
    "don't want to be alive",
    "don't want to be here anymore",
    "don't want to be here any more",
    "overdose",
];

/// Message shown in place of model coaching when risk is detected
pub const DEFAULT_SAFETY_MESSAGE: &str = "It sounds like you are carrying something really painful right now, and you deserve support. Please reach out to someone you trust, or contact one of the crisis lines below. If you are in immediate danger, call your local emergency number.";

/// A crisis contact shown alongside the safety message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyResource {
    pub region: String,
    pub contact: String,
}

impl EmergencyResource {
    pub fn new(region: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            contact: contact.into(),
        }
    }
}

/// Default crisis contacts
pub fn default_resources() -> Vec<EmergencyResource> {
    vec![
        EmergencyResource::new("USA", "988 (Suicide & Crisis Lifeline)"),
        EmergencyResource::new("India", "9152987821 (iCall)"),
        EmergencyResource::new("Global", "https://findahelpline.com"),
    ]
}

/// Reviewable safety policy.
///
/// Phrases are stored normalized (see [`normalize_for_matching`]); empty and
/// duplicate entries are dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyPolicy {
    phrases: Vec<String>,
    message: String,
    resources: Vec<EmergencyResource>,
}

impl SafetyPolicy {
    pub fn new<I, S>(phrases: I, message: impl Into<String>, resources: Vec<EmergencyResource>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = normalize_for_matching(phrase.as_ref());
            if !phrase.is_empty() && !normalized.contains(&phrase) {
                normalized.push(phrase);
            }
        }

        Self {
            phrases: normalized,
            message: message.into(),
            resources,
        }
    }

    /// Normalized phrase list
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Canned safety message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Emergency contacts
    pub fn resources(&self) -> &[EmergencyResource] {
        &self.resources
    }

    /// First configured phrase found in `text`, if any
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let haystack = format!(" {} ", normalize_for_matching(text));
        self.phrases
            .iter()
            .find(|phrase| haystack.contains(&format!(" {} ", phrase)))
            .map(String::as_str)
    }

    /// Whether `text` contains any configured phrase
    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RISK_PHRASES.iter().copied(),
            DEFAULT_SAFETY_MESSAGE,
            default_resources(),
        )
    }
}

/// Normalize text for phrase matching: lowercase, apostrophes dropped,
/// every other non-alphanumeric run collapsed to a single space.
pub fn normalize_for_matching(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if matches!(ch, '\'' | '\u{2019}' | '\u{2018}' | '`') {
            continue;
        }
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}
