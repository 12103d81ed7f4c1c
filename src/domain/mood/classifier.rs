//! Completion parser and risk classifier
//!
//! Two completion shapes are recognized:
//!
//! - Marker text, as requested by the coaching prompt:
//!   `MOOD: <Label>`, optionally `CONFIDENCE: <0-100>` and `SUMMARY: <text>`,
//!   the coaching text, then optional `ACTIONS:`, `THEMES:` and `PROMPTS:`
//!   sections. Markers may be wrapped in `**` or quotes.
//! - A JSON object with a `mood` field and optional `confidence`,
//!   `response`/`coaching`/`message`, `summary`, `actions`, `themes` and
//!   `prompts` fields.
//!
//! Anything else degrades to [`MoodLabel::Other`]. Classification never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::guidance::{CopingActions, JournalingPrompts};
use super::label::MoodLabel;
use super::safety::SafetyPolicy;

/// Coaching text used when the completion carries nothing but markers
pub const FALLBACK_COACHING: &str = "Thank you for sharing how you feel. Whatever you are going through, your feelings are valid. Take a slow breath and be gentle with yourself today.";

/// `MOOD: <label>` at the start of a line
static MOOD_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^[\s>"*_-]*mood["*_]*\s*[:=][\s"*_]*([a-z][a-z_-]*)["*_]*"#)
        .expect("mood marker pattern is valid")
});

/// `CONFIDENCE: <n>` anywhere in a line
static CONFIDENCE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["*_]*\bconfidence["*_]*\s*[:=][\s"*_]*(\d{1,3})\s*%?["*_]*"#)
        .expect("confidence marker pattern is valid")
});

/// `SUMMARY: <text>` on its own line
static SUMMARY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^[\s>"*_-]*summary["*_]*\s*[:=][\s"*_]*(.*?)["*_]*\s*$"#)
        .expect("summary marker pattern is valid")
});

/// Section header such as `ACTIONS:` or `**Prompts:**`, with optional inline content
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^[\s>#*_]*(coping actions|actions|themes|journaling prompts|prompts)["*_]*\s*[:=]["*_]*\s*(.*)$"#,
    )
    .expect("section header pattern is valid")
});

/// JSON fields that may carry coaching text, in priority order
const JSON_TEXT_FIELDS: &[&str] = &["response", "coaching", "message", "text"];

/// Characters trimmed from what follows a removed marker on the same line
const LEADING_SEPARATORS: &[char] = &['.', ',', ':', ';', '-', '|', '\u{2013}', '\u{2014}'];

/// Result of classifying one completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub mood_label: MoodLabel,
    pub confidence: Option<u8>,
    pub coaching_text: String,
    pub risk_flag: bool,
    /// Short summary of the user's situation
    pub summary: Option<String>,
    pub actions: Option<CopingActions>,
    pub journaling: Option<JournalingPrompts>,
}

/// Everything extracted from a completion before the safety check
struct ParsedCompletion {
    mood: MoodLabel,
    confidence: Option<u8>,
    body: String,
    summary: Option<String>,
    actions: Option<CopingActions>,
    journaling: Option<JournalingPrompts>,
}

/// Classify a raw completion.
///
/// Risk is checked on both `input_text` and `raw_text`. When risk is found the
/// policy's canned message replaces whatever coaching the model produced, and
/// the model's summary, actions and journaling prompts are dropped.
pub fn classify(raw_text: &str, input_text: &str, policy: &SafetyPolicy) -> Classification {
    let cleaned = strip_code_fences(raw_text);
    let parsed = parse_json(&cleaned).unwrap_or_else(|| parse_markers(&cleaned));

    let risk_flag = policy.matches(input_text) || policy.matches(raw_text);

    if risk_flag {
        return Classification {
            mood_label: parsed.mood,
            confidence: parsed.confidence,
            coaching_text: policy.message().to_string(),
            risk_flag,
            ..Default::default()
        };
    }

    let coaching_text = if parsed.body.is_empty() {
        FALLBACK_COACHING.to_string()
    } else {
        parsed.body
    };

    Classification {
        mood_label: parsed.mood,
        confidence: parsed.confidence,
        coaching_text,
        risk_flag,
        summary: parsed.summary,
        actions: parsed.actions,
        journaling: parsed.journaling,
    }
}

/// Drop markdown fence lines (```json, ```)
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_json(text: &str) -> Option<ParsedCompletion> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    let object = value.as_object()?;

    let mood = object
        .get("mood")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .map(clamp_confidence);

    let body = JSON_TEXT_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let summary = object
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Some(ParsedCompletion {
        mood,
        confidence,
        body,
        summary,
        actions: object.get("actions").and_then(json_actions),
        journaling: JournalingPrompts::from_lists(
            json_strings(object.get("themes")),
            json_strings(object.get("prompts")),
        ),
    })
}

/// `{"breathing", "immediate", "long_term"}` object or a plain list
fn json_actions(value: &Value) -> Option<CopingActions> {
    match value {
        Value::Object(map) => {
            let items: Vec<String> = map
                .iter()
                .filter_map(|(key, v)| v.as_str().map(|text| format!("{}: {}", key, text)))
                .collect();
            CopingActions::from_items(&items)
        }
        Value::Array(_) => CopingActions::from_items(&json_strings(Some(value))),
        _ => None,
    }
}

fn json_strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Clone, Copy)]
enum Section {
    Body,
    Actions,
    Themes,
    Prompts,
}

fn parse_markers(text: &str) -> ParsedCompletion {
    let mut mood = None;
    let mut confidence = None;
    let mut summary = None;

    let mut section = Section::Body;
    let mut body = Vec::new();
    let mut actions = Vec::new();
    let mut themes = Vec::new();
    let mut prompts = Vec::new();

    for raw_line in text.lines() {
        if let Some(caps) = SUMMARY_MARKER.captures(raw_line) {
            let value = caps.get(1).map_or("", |m| m.as_str().trim());
            if !value.is_empty() {
                summary.get_or_insert_with(|| value.to_string());
                continue;
            }
        }

        if let Some(caps) = SECTION_HEADER.captures(raw_line) {
            section = match caps[1].to_lowercase().as_str() {
                "themes" => Section::Themes,
                "prompts" | "journaling prompts" => Section::Prompts,
                _ => Section::Actions,
            };
            let inline = caps.get(2).map_or("", |m| m.as_str().trim());
            if inline.is_empty() {
                continue;
            }
            push_line(section, inline.to_string(), &mut body, &mut actions, &mut themes, &mut prompts);
            continue;
        }

        let line = strip_line_markers(raw_line, &mut mood, &mut confidence);
        push_line(section, line, &mut body, &mut actions, &mut themes, &mut prompts);
    }

    ParsedCompletion {
        mood: mood.unwrap_or_default(),
        confidence,
        body: tidy(&body),
        summary,
        actions: CopingActions::from_items(&actions),
        journaling: JournalingPrompts::from_items(&themes, &prompts),
    }
}

fn push_line(
    section: Section,
    line: String,
    body: &mut Vec<String>,
    actions: &mut Vec<String>,
    themes: &mut Vec<String>,
    prompts: &mut Vec<String>,
) {
    match section {
        Section::Body => body.push(line),
        Section::Actions => actions.push(line),
        Section::Themes => themes.push(line),
        Section::Prompts => prompts.push(line),
    }
}

/// Remove recognized mood and confidence markers from one line.
///
/// The first recognized mood marker sets the mood; a `mood:` prefix whose
/// label does not parse is ordinary prose and stays. Separators are trimmed
/// only from text that followed a removed marker.
fn strip_line_markers(
    line: &str,
    mood: &mut Option<MoodLabel>,
    confidence: &mut Option<u8>,
) -> String {
    let mut removed = false;

    let rest = match MOOD_MARKER.captures(line) {
        Some(caps) => match caps[1].parse::<MoodLabel>() {
            Ok(label) => {
                mood.get_or_insert(label);
                removed = true;
                &line[caps.get(0).map_or(0, |m| m.end())..]
            }
            Err(_) => line,
        },
        None => line,
    };

    let rest = match CONFIDENCE_MARKER.captures(rest) {
        Some(caps) => {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                confidence.get_or_insert(clamp_confidence(value));
            }
            removed = true;
            CONFIDENCE_MARKER.replace_all(rest, "").into_owned()
        }
        None => rest.to_string(),
    };

    if removed {
        rest.trim_start_matches(|c: char| LEADING_SEPARATORS.contains(&c) || c.is_whitespace())
            .to_string()
    } else {
        rest
    }
}

fn clamp_confidence(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Trim each line and collapse runs of blank lines
fn tidy(lines: &[String]) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            if !previous_blank {
                kept.push("");
            }
            previous_blank = true;
        } else {
            kept.push(line);
            previous_blank = false;
        }
    }

    kept.join("\n").trim().to_string()
}
