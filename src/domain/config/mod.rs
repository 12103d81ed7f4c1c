//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, SafetyConfig, DEFAULT_BASE_URL, DEFAULT_FALLBACK_MODELS, DEFAULT_HOST,
    DEFAULT_MODEL, DEFAULT_PORT,
};
