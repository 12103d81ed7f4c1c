//! Application layer - Use cases and port interfaces
//!
//! Contains the check-in pipeline, the session journal, the presentation
//! adapter and trait definitions for external system interactions.

pub mod checkin;
pub mod journal;
pub mod ports;
pub mod render;

// Re-export use cases
pub use checkin::{CheckInError, CheckInOutput, CheckInUseCase};
pub use journal::SessionJournal;
pub use render::{
    render, render_history, render_transcript, DisplayPayload, HistoryEntry, HistoryView,
    MoodCount, SafetyNotice,
};
