//! Finished-recording sink port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::FinishedRecording;

/// Recording sink errors
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("Failed to persist recording '{id}': {message}")]
    SaveFailed { id: String, message: String },
}

/// Port for the external collaborator that owns finished recordings.
///
/// The session controller hands each completed payload off exactly once on a
/// successful stop; on failure the payload is retained for retry.
#[async_trait]
pub trait RecordingSink: Send + Sync {
    async fn save(&self, recording: &FinishedRecording) -> Result<(), SinkError>;
}
