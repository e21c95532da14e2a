//! Translation port interface

use async_trait::async_trait;
use thiserror::Error;

/// Translation errors
#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    #[error("Translation request failed: {0}")]
    RequestFailed(String),

    #[error("Unsupported target language: {0}")]
    UnsupportedLanguage(String),
}

/// Port for per-segment batch translation.
///
/// Invoked fire-and-forget per segment; results may complete out of order.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text into the target language
    async fn translate(&self, text: &str, target_language: &str)
        -> Result<String, TranslationError>;
}
