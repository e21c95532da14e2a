//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, the filesystem, etc.

pub mod audio;
pub mod config;
pub mod haptics;
pub mod permissions;
pub mod storage;
pub mod transcription;

// Re-export adapters
pub use audio::CpalCapture;
pub use config::XdgConfigStore;
pub use haptics::NoOpHaptics;
pub use permissions::StaticPermissions;
pub use storage::{JsonFileStore, JsonRecordingSink, MemoryStore};
pub use transcription::{NoOpTranscriber, NoOpTranslator};
