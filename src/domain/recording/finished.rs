//! Finished recording payload

use serde::{Deserialize, Serialize};

use crate::domain::recording::Highlight;
use crate::domain::transcription::TranscriptSegment;

/// The assembled result of a stopped recording session.
///
/// Produced by the session controller and handed to the external recording
/// sink; the controller itself never stores these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedRecording {
    pub id: String,
    /// Stable reference to the captured audio (file path or URI)
    pub audio_uri: String,
    pub duration_ms: u64,
    pub highlights: Vec<Highlight>,
    /// Fixed-length display waveform in [0, 1]
    pub waveform: Vec<f32>,
    /// Consolidated transcript, when realtime transcription was enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Consolidated translation, when translation was enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Per-segment transcript detail, when realtime transcription was enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<TranscriptSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_omits_absent_transcript() {
        let recording = FinishedRecording {
            id: "r1".into(),
            audio_uri: "/tmp/r1.wav".into(),
            duration_ms: 4200,
            highlights: Vec::new(),
            waveform: vec![0.1; 4],
            transcript: None,
            translation: None,
            segments: Vec::new(),
        };
        let json = serde_json::to_string(&recording).unwrap();
        assert!(!json.contains("transcript"));
        assert!(!json.contains("segments"));
    }
}
