//! Presentation adapter: maps turns into display payloads

use serde::Serialize;

use crate::domain::journal::Turn;
use crate::domain::mood::{
    CopingActions, EmergencyResource, JournalingPrompts, SafetyPolicy, ALL_MOODS,
};

use super::journal::count_moods;

/// Headline of the safety card
pub const SAFETY_HEADLINE: &str = "Critical safety warning";

/// Lead sentence of the safety card
pub const SAFETY_LEAD: &str =
    "We detected content indicating high distress. Please prioritize your safety.";

/// Timestamp format used for display
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Length of the input excerpt in history entries
const HISTORY_EXCERPT_CHARS: usize = 50;

/// Emergency card shown whenever risk is detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyNotice {
    pub headline: String,
    pub lead: String,
    pub message: String,
    pub resources: Vec<EmergencyResource>,
}

/// Everything the UI needs to show one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    pub id: u64,
    pub timestamp: String,
    pub mood: String,
    pub mood_color: String,
    pub confidence: Option<u8>,
    pub coaching_text: String,
    pub risk: bool,
    pub safety: Option<SafetyNotice>,
    pub summary: Option<String>,
    pub actions: Option<CopingActions>,
    pub journaling: Option<JournalingPrompts>,
}

/// One row of the history panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp: String,
    pub mood: String,
    pub mood_color: String,
    pub excerpt: String,
    pub summary: Option<String>,
    pub risk: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodCount {
    pub mood: String,
    pub count: usize,
}

/// History panel: newest entries first plus per-mood totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntry>,
    pub mood_counts: Vec<MoodCount>,
}

/// Build the safety card from the policy
pub fn safety_notice(policy: &SafetyPolicy) -> SafetyNotice {
    SafetyNotice {
        headline: SAFETY_HEADLINE.to_string(),
        lead: SAFETY_LEAD.to_string(),
        message: policy.message().to_string(),
        resources: policy.resources().to_vec(),
    }
}

/// Map a turn into its display payload.
///
/// `safety` is `Some` exactly when the turn carries the risk flag.
pub fn render(turn: &Turn, policy: &SafetyPolicy) -> DisplayPayload {
    let mood = turn.mood_label();
    DisplayPayload {
        id: turn.id().value(),
        timestamp: turn.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        mood: mood.label().to_string(),
        mood_color: mood.color().to_string(),
        confidence: turn.confidence(),
        coaching_text: turn.coaching_text().to_string(),
        risk: turn.risk_flag(),
        safety: turn.risk_flag().then(|| safety_notice(policy)),
        summary: turn.summary().map(str::to_string),
        actions: turn.actions().cloned(),
        journaling: turn.journaling().cloned(),
    }
}

/// Map journal turns (oldest first) into the history panel
pub fn render_history(turns: &[Turn]) -> HistoryView {
    let entries = turns
        .iter()
        .rev()
        .map(|turn| HistoryEntry {
            id: turn.id().value(),
            timestamp: turn.timestamp().format(TIMESTAMP_FORMAT).to_string(),
            mood: turn.mood_label().label().to_string(),
            mood_color: turn.mood_label().color().to_string(),
            excerpt: turn.input_excerpt(HISTORY_EXCERPT_CHARS),
            summary: turn.summary().map(str::to_string),
            risk: turn.risk_flag(),
        })
        .collect();

    let counts = count_moods(turns);
    let mood_counts = ALL_MOODS
        .iter()
        .filter_map(|mood| {
            counts.get(mood).map(|count| MoodCount {
                mood: mood.label().to_string(),
                count: *count,
            })
        })
        .collect();

    HistoryView {
        entries,
        mood_counts,
    }
}

/// Plain-text export of a session, oldest turn first
pub fn render_transcript(turns: &[Turn], policy: &SafetyPolicy) -> String {
    let mut out = String::from("EmotiCare Session\n=================\n");

    if turns.is_empty() {
        out.push_str("\nNo entries yet.\n");
        return out;
    }

    for turn in turns {
        let payload = render(turn, policy);
        out.push('\n');
        out.push_str(&format!("[{}] Mood: {}", payload.timestamp, payload.mood));
        if let Some(confidence) = payload.confidence {
            out.push_str(&format!(" ({}%)", confidence));
        }
        out.push('\n');
        out.push_str(&format!("You: {}\n", turn.input_text()));
        if let Some(summary) = &payload.summary {
            out.push_str(&format!("Summary: {}\n", summary));
        }
        out.push_str(&format!("Coach: {}\n", payload.coaching_text));
        if let Some(actions) = &payload.actions {
            out.push_str("Coping strategy:\n");
            for (title, text) in actions.entries() {
                out.push_str(&format!("  - {}: {}\n", title, text));
            }
        }
        if let Some(journaling) = &payload.journaling {
            if !journaling.themes.is_empty() {
                out.push_str(&format!("Themes: {}\n", journaling.themes.join(", ")));
            }
            if !journaling.prompts.is_empty() {
                out.push_str("Reflect on this:\n");
                for (index, prompt) in journaling.prompts.iter().enumerate() {
                    out.push_str(&format!("  {}. {}\n", index + 1, prompt));
                }
            }
        }
        if let Some(notice) = payload.safety {
            out.push_str(&format!("{}:\n", notice.headline));
            for resource in &notice.resources {
                out.push_str(&format!("  - {}: {}\n", resource.region, resource.contact));
            }
        }
    }

    out
}
