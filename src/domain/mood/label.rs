//! Mood label value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidMoodError;

/// All mood labels, in display order
pub const ALL_MOODS: &[MoodLabel] = &[
    MoodLabel::Happy,
    MoodLabel::Sad,
    MoodLabel::Anxious,
    MoodLabel::Angry,
    MoodLabel::Neutral,
    MoodLabel::Overwhelmed,
    MoodLabel::Depressive,
    MoodLabel::Other,
];

/// Mood category derived from a model completion.
///
/// `Other` is the total fallback: anything the classifier cannot
/// recognize resolves to it, so a turn always carries a defined mood.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum MoodLabel {
    Happy,
    Sad,
    Anxious,
    Angry,
    Neutral,
    Overwhelmed,
    Depressive,
    #[default]
    Other,
}

impl MoodLabel {
    /// Get the human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Anxious => "Anxious",
            Self::Angry => "Angry",
            Self::Neutral => "Neutral",
            Self::Overwhelmed => "Overwhelmed",
            Self::Depressive => "Depressive",
            Self::Other => "Other",
        }
    }

    /// Get the string identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
            Self::Overwhelmed => "overwhelmed",
            Self::Depressive => "depressive",
            Self::Other => "other",
        }
    }

    /// Accent colour used when displaying this mood (hex RGB)
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Happy => "#10b981",
            Self::Sad => "#3b82f6",
            Self::Anxious => "#f59e0b",
            Self::Angry => "#ef4444",
            Self::Neutral => "#6b7280",
            Self::Overwhelmed => "#d97706",
            Self::Depressive => "#1d4ed8",
            Self::Other => "#6b7280",
        }
    }
}

impl FromStr for MoodLabel {
    type Err = InvalidMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '.')
            .to_lowercase();

        match cleaned.as_str() {
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            "anxious" => Ok(Self::Anxious),
            "angry" => Ok(Self::Angry),
            "neutral" => Ok(Self::Neutral),
            "overwhelmed" => Ok(Self::Overwhelmed),
            "depressive" => Ok(Self::Depressive),
            "other" | "unclassified" | "unknown" => Ok(Self::Other),
            _ => Err(InvalidMoodError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_labels() {
        for mood in ALL_MOODS {
            assert_eq!(mood.label().parse::<MoodLabel>().unwrap(), *mood);
            assert_eq!(mood.as_str().parse::<MoodLabel>().unwrap(), *mood);
        }
    }

    #[test]
    fn parse_tolerates_quotes_and_emphasis() {
        assert_eq!("\"Sad\"".parse::<MoodLabel>().unwrap(), MoodLabel::Sad);
        assert_eq!("**ANGRY**".parse::<MoodLabel>().unwrap(), MoodLabel::Angry);
        assert_eq!(" happy. ".parse::<MoodLabel>().unwrap(), MoodLabel::Happy);
    }

    #[test]
    fn unclassified_maps_to_other() {
        assert_eq!("Unclassified".parse::<MoodLabel>().unwrap(), MoodLabel::Other);
        assert_eq!("unknown".parse::<MoodLabel>().unwrap(), MoodLabel::Other);
    }

    #[test]
    fn parse_invalid() {
        assert!("ecstatic".parse::<MoodLabel>().is_err());
        assert!("Suicidal-Risk".parse::<MoodLabel>().is_err());
        assert!("".parse::<MoodLabel>().is_err());
    }

    #[test]
    fn default_is_other() {
        assert_eq!(MoodLabel::default(), MoodLabel::Other);
    }

    #[test]
    fn colors_are_hex() {
        for mood in ALL_MOODS {
            let color = mood.color();
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
        }
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(MoodLabel::Overwhelmed.to_string(), "Overwhelmed");
    }
}
