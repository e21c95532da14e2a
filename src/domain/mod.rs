//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod transcription;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{
    AmplitudeHistory, FinishedRecording, Highlight, InvalidStateTransition, RecordingDraft,
    RecordingSession, SessionState,
};
pub use transcription::{
    SegmentConsolidator, SegmentPatch, TranscriptEvent, TranscriptSegment, TranslationStatus,
};
