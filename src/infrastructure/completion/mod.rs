//! Completion adapters

mod gemini;

pub use gemini::GeminiClient;
