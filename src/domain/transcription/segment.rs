//! Transcript segment types

use serde::{Deserialize, Serialize};

/// Per-segment translation state, independent of transcription state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    /// Translation not requested for this segment
    #[default]
    None,
    /// Submitted to the translator, awaiting a result
    Pending,
    Done,
    Error,
}

/// One fragment of the transcript.
///
/// Partial segments may be replaced in place by later updates carrying the
/// same identifier; once committed a segment is immutable history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: String,
    pub text: String,
    pub is_partial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default)]
    pub translation_status: TranslationStatus,
}

/// Segment content carried by a transcriber event
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPatch {
    pub id: String,
    pub text: String,
    pub speaker: Option<String>,
    pub timestamp_ms: Option<u64>,
}

impl SegmentPatch {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            speaker: None,
            timestamp_ms: None,
        }
    }

    pub(crate) fn into_segment(self, is_partial: bool) -> TranscriptSegment {
        TranscriptSegment {
            id: self.id,
            text: self.text,
            is_partial,
            speaker: self.speaker,
            timestamp_ms: self.timestamp_ms,
            translation: None,
            translation_status: TranslationStatus::None,
        }
    }
}

/// An ordered event from the streaming transcription collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    /// Revision of an in-flight segment; replaces any previous partial
    /// carrying the same identifier
    Partial(SegmentPatch),
    /// Finalization of a segment; appended to the immutable history
    Committed(SegmentPatch),
}

impl TranscriptEvent {
    pub fn segment_id(&self) -> &str {
        match self {
            Self::Partial(patch) | Self::Committed(patch) => &patch.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TranslationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&TranslationStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn segment_json_omits_empty_options() {
        let segment = SegmentPatch::new("a", "hello").into_segment(true);
        let json = serde_json::to_string(&segment).unwrap();
        assert!(!json.contains("speaker"));
        assert!(!json.contains("translation\""));
    }

    #[test]
    fn event_exposes_segment_id() {
        let event = TranscriptEvent::Committed(SegmentPatch::new("seg-9", "done"));
        assert_eq!(event.segment_id(), "seg-9");
    }
}
