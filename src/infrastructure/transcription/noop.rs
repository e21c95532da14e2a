//! No-op streaming transcription adapter
//!
//! Used when no transcription backend is configured. Reports itself
//! connected and emits no segments, so recording proceeds with an empty
//! live transcript rather than a degraded-connection banner.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::application::ports::{
    ConnectionStatus, StreamingTranscriber, TranscriberError, TranscriberEvent,
    TranscriptionOptions,
};

/// Streaming transcriber that produces no segments
pub struct NoOpTranscriber;

impl NoOpTranscriber {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamingTranscriber for NoOpTranscriber {
    async fn start_session(
        &self,
        _session_id: &str,
        _options: TranscriptionOptions,
        events: UnboundedSender<TranscriberEvent>,
    ) -> Result<(), TranscriberError> {
        let _ = events.send(TranscriberEvent::Status(ConnectionStatus::Connected));
        Ok(())
    }

    async fn stop_session(&self) -> Result<(), TranscriberError> {
        Ok(())
    }
}

/// Translator that declines every request.
/// Stands in when translation is enabled without a configured backend;
/// segments end in the error state instead of blocking the session.
pub struct NoOpTranslator;

impl NoOpTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl crate::application::ports::Translator for NoOpTranslator {
    async fn translate(
        &self,
        _text: &str,
        target_language: &str,
    ) -> Result<String, crate::application::ports::TranslationError> {
        Err(crate::application::ports::TranslationError::UnsupportedLanguage(
            target_language.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::Translator;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn noop_transcriber_reports_connected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transcriber = NoOpTranscriber::new();
        transcriber
            .start_session("s", TranscriptionOptions::default(), tx)
            .await
            .unwrap();

        assert_eq!(
            rx.recv().await,
            Some(TranscriberEvent::Status(ConnectionStatus::Connected))
        );
        assert!(transcriber.stop_session().await.is_ok());
    }

    #[tokio::test]
    async fn noop_translator_declines() {
        assert!(NoOpTranslator::new().translate("hola", "en").await.is_err());
    }
}
