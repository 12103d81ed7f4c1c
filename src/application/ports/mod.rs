//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod completion;
pub mod config;
pub mod journal;

// Re-export common types
pub use completion::{CompletionClient, CompletionError};
pub use config::ConfigStore;
pub use journal::{JournalError, JournalStore};
