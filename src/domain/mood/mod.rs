//! Mood domain module

mod classifier;
mod guidance;
mod label;
mod safety;

pub use classifier::{classify, Classification, FALLBACK_COACHING};
pub use guidance::{CopingActions, JournalingPrompts};
pub use label::{MoodLabel, ALL_MOODS};
pub use safety::{
    default_resources, normalize_for_matching, EmergencyResource, SafetyPolicy,
    DEFAULT_RISK_PHRASES, DEFAULT_SAFETY_MESSAGE,
};
