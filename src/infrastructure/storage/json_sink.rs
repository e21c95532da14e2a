//! JSON-file recording sink adapter
//!
//! Persists finished recordings as pretty-printed JSON, one file per
//! recording id, in an application data directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{RecordingSink, SinkError};
use crate::domain::recording::FinishedRecording;

/// Recording sink writing one JSON document per finished recording
pub struct JsonRecordingSink {
    dir: PathBuf,
}

impl JsonRecordingSink {
    /// Create a sink under the platform data directory
    pub fn new() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("voicenote")
            .join("recordings");
        Self { dir }
    }

    /// Create with a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory recordings are written into
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl Default for JsonRecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordingSink for JsonRecordingSink {
    async fn save(&self, recording: &FinishedRecording) -> Result<(), SinkError> {
        let fail = |message: String| SinkError::SaveFailed {
            id: recording.id.clone(),
            message,
        };

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| fail(e.to_string()))?;

        let json = serde_json::to_string_pretty(recording).map_err(|e| fail(e.to_string()))?;
        let path = self.dir.join(format!("{}.json", recording.id));
        fs::write(&path, json)
            .await
            .map_err(|e| fail(e.to_string()))?;

        debug!(path = %path.display(), "finished recording persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(id: &str) -> FinishedRecording {
        FinishedRecording {
            id: id.into(),
            audio_uri: format!("/tmp/{id}.wav"),
            duration_ms: 1234,
            highlights: Vec::new(),
            waveform: vec![0.5; 4],
            transcript: Some("hello world".into()),
            translation: None,
            segments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn writes_one_file_per_recording() {
        let dir = tempdir().unwrap();
        let sink = JsonRecordingSink::with_dir(dir.path());

        sink.save(&sample("rec-1")).await.unwrap();
        sink.save(&sample("rec-2")).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("rec-1.json")).unwrap();
        let parsed: FinishedRecording = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, sample("rec-1"));
        assert!(dir.path().join("rec-2.json").exists());
    }
}
