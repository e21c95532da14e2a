//! Streaming transcription port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::transcription::TranscriptEvent;

/// Streaming transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriberError {
    #[error("Failed to open streaming session: {0}")]
    StartFailed(String),

    #[error("Failed to close streaming session: {0}")]
    StopFailed(String),

    #[error("Streaming session dropped: {0}")]
    ConnectionLost(String),
}

/// Connection state reported by the streaming collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Options for a streaming session
#[derive(Debug, Clone, Default)]
pub struct TranscriptionOptions {
    /// Spoken language hint (BCP-47 tag), if known
    pub language: Option<String>,
    /// Ask the collaborator for speaker labels
    pub diarize: bool,
}

/// Event emitted by the streaming collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriberEvent {
    Status(ConnectionStatus),
    Segment(TranscriptEvent),
}

/// Port for the streaming transcription collaborator.
///
/// Events are pushed into the provided channel; they are internally ordered
/// per segment but arrive asynchronously with respect to the session timers.
#[async_trait]
pub trait StreamingTranscriber: Send + Sync {
    /// Open a streaming session keyed by the recording session id
    async fn start_session(
        &self,
        session_id: &str,
        options: TranscriptionOptions,
        events: UnboundedSender<TranscriberEvent>,
    ) -> Result<(), TranscriberError>;

    /// Close the streaming session. Idempotent.
    async fn stop_session(&self) -> Result<(), TranscriberError>;
}
