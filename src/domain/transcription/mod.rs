//! Transcription domain: segment types and the partial/committed consolidator

pub mod consolidator;
pub mod segment;

pub use consolidator::SegmentConsolidator;
pub use segment::{SegmentPatch, TranscriptEvent, TranscriptSegment, TranslationStatus};
