//! Configuration value objects

mod app_config;

pub use app_config::{AppConfig, DEFAULT_AUTOSAVE_SECS, DEFAULT_TICK_MS};
