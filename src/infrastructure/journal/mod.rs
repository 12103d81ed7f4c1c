//! Journal storage adapters

mod jsonl;

pub use jsonl::JsonlJournalStore;
