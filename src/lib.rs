//! EmotiCare - mood check-ins with supportive coaching
//!
//! This crate forwards a short check-in to Google Gemini, classifies the reply
//! into a mood, detects risk language, and keeps an append-only journal of
//! turns. It is served as a local web app and as a small CLI.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Prompt composition, mood classification, safety policy, turns
//! - **Application**: The check-in use case, session journal, presentation
//!   adapter and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (Gemini, JSONL journal, XDG config)
//! - **Web**: Axum routes and the server-rendered page
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod web;
