//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio;
pub mod config;
pub mod haptics;
pub mod permissions;
pub mod recordings;
pub mod storage;
pub mod transcriber;
pub mod translator;

// Re-export common types
pub use audio::{AudioCapture, AudioCaptureError, CapturedAudio};
pub use config::ConfigStore;
pub use haptics::{Haptics, HapticsError};
pub use permissions::{PermissionService, PermissionStatus};
pub use recordings::{RecordingSink, SinkError};
pub use storage::{KeyValueStore, StorageError};
pub use transcriber::{
    ConnectionStatus, StreamingTranscriber, TranscriberError, TranscriberEvent,
    TranscriptionOptions,
};
pub use translator::{TranslationError, Translator};
