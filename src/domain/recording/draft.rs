//! Crash-recovery draft snapshot

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::domain::recording::Highlight;
use crate::domain::transcription::TranscriptSegment;

/// Storage key for the draft slot. A single key suffices because at most one
/// session is ever active; the session id travels inside the record.
pub const DRAFT_KEY: &str = "recording.draft";

/// Periodically persisted snapshot of an in-progress session.
///
/// Exists in durable storage only while a session is active (or was active
/// when the process died). Used solely for crash recovery of session
/// metadata; the audio itself is not recoverable from a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingDraft {
    pub session_id: String,
    pub duration_ms: u64,
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub amplitude_history: Vec<f32>,
    pub saved_at_ms: u64,
}

impl RecordingDraft {
    /// Snapshot the given session data, stamped with the current wall clock
    pub fn snapshot(
        session_id: &str,
        duration_ms: u64,
        highlights: Vec<Highlight>,
        segments: Vec<TranscriptSegment>,
        amplitude_history: Vec<f32>,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            duration_ms,
            highlights,
            segments,
            amplitude_history,
            saved_at_ms: now_ms(),
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_json() {
        let draft = RecordingDraft::snapshot(
            "session-1",
            12_500,
            vec![Highlight::at(3.2, Some("intro".into()))],
            Vec::new(),
            vec![-20.0, -18.5],
        );

        let json = serde_json::to_string(&draft).unwrap();
        let parsed: RecordingDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
        assert!((parsed.duration_secs() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"session_id":"s","duration_ms":1000,"highlights":[],"saved_at_ms":0}"#;
        let parsed: RecordingDraft = serde_json::from_str(json).unwrap();
        assert!(parsed.segments.is_empty());
        assert!(parsed.amplitude_history.is_empty());
    }

    #[test]
    fn snapshot_is_timestamped() {
        let draft = RecordingDraft::snapshot("s", 0, Vec::new(), Vec::new(), Vec::new());
        assert!(draft.saved_at_ms > 0);
    }
}
