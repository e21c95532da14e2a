//! Transcription adapters

mod noop;

pub use noop::{NoOpTranscriber, NoOpTranslator};
