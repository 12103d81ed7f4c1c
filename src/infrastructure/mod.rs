//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the Gemini API and the filesystem.

pub mod completion;
pub mod config;
pub mod journal;

// Re-export adapters
pub use completion::GeminiClient;
pub use config::XdgConfigStore;
pub use journal::JsonlJournalStore;
