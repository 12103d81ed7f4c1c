//! Coping actions and journaling prompts that accompany the coaching reply

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading list marker: `-`, `*`, `•`, `1.` or `1)`
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]|\d{1,2}[.)])\s+").expect("list marker pattern is valid")
});

/// Three short coping steps: one for right now, one small step, one plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopingActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breathe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_now: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl CopingActions {
    /// Build from the lines of an `ACTIONS:` section.
    ///
    /// Labelled items (`Breathe:`, `Do now:`, `Plan:` and close variants) go
    /// to their slot; unlabelled items fill the remaining slots in order.
    /// Returns `None` when no item is found.
    pub fn from_items<S: AsRef<str>>(items: &[S]) -> Option<Self> {
        let mut actions = Self::default();
        let mut unlabelled = Vec::new();

        for item in items {
            let item = strip_list_marker(item.as_ref());
            if item.is_empty() {
                continue;
            }
            match split_label(item) {
                Some((slot, text)) if !text.is_empty() => {
                    let target = actions.slot_mut(slot);
                    if target.is_none() {
                        *target = Some(text.to_string());
                    }
                }
                Some(_) => {}
                None => unlabelled.push(item.to_string()),
            }
        }

        for text in unlabelled {
            if let Some(slot) = [Slot::Breathe, Slot::DoNow, Slot::Plan]
                .into_iter()
                .find(|slot| actions.slot_mut(*slot).is_none())
            {
                *actions.slot_mut(slot) = Some(text);
            }
        }

        (!actions.is_empty()).then_some(actions)
    }

    pub fn is_empty(&self) -> bool {
        self.breathe.is_none() && self.do_now.is_none() && self.plan.is_none()
    }

    /// Present steps with their display titles, in order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Breathe", self.breathe.as_deref()),
            ("Do now", self.do_now.as_deref()),
            ("Plan", self.plan.as_deref()),
        ]
        .into_iter()
        .filter_map(|(title, text)| text.map(|t| (title, t)))
        .collect()
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Breathe => &mut self.breathe,
            Slot::DoNow => &mut self.do_now,
            Slot::Plan => &mut self.plan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Breathe,
    DoNow,
    Plan,
}

/// `Label: text` where the label names a known slot
fn split_label(item: &str) -> Option<(Slot, &str)> {
    let (label, text) = item.split_once(':')?;
    let label = label
        .trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
        .to_lowercase()
        .replace(['-', '_'], " ");

    let slot = match label.as_str() {
        "breathe" | "breathing" | "grounding" | "breathing/grounding" => Slot::Breathe,
        "do now" | "now" | "immediate" | "small step" => Slot::DoNow,
        "plan" | "long term" | "long term action" => Slot::Plan,
        _ => return None,
    };
    Some((slot, text.trim_matches(|c: char| c == '*' || c.is_whitespace())))
}

/// Journaling themes and reflection prompts for one check-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalingPrompts {
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub prompts: Vec<String>,
}

impl JournalingPrompts {
    /// Build from `THEMES:` and `PROMPTS:` section lines.
    ///
    /// Theme lines may hold several comma separated themes. Returns `None`
    /// when both lists come out empty.
    pub fn from_items<S: AsRef<str>>(theme_lines: &[S], prompt_lines: &[S]) -> Option<Self> {
        let themes = theme_lines
            .iter()
            .flat_map(|line| strip_list_marker(line.as_ref()).split([',', ';']))
            .map(clean_item)
            .filter(|theme| !theme.is_empty())
            .collect();

        let prompts = prompt_lines
            .iter()
            .map(|line| clean_item(strip_list_marker(line.as_ref())))
            .filter(|prompt| !prompt.is_empty())
            .collect();

        Self::from_lists(themes, prompts)
    }

    /// Wrap already-split lists; `None` when both are empty
    pub fn from_lists(themes: Vec<String>, prompts: Vec<String>) -> Option<Self> {
        let journaling = Self { themes, prompts };
        (!journaling.is_empty()).then_some(journaling)
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty() && self.prompts.is_empty()
    }
}

fn strip_list_marker(line: &str) -> &str {
    match LIST_MARKER.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

fn clean_item(item: &str) -> String {
    item.trim_matches(|c: char| c == '"' || c == '*' || c.is_whitespace())
        .to_string()
}
