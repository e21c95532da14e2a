//! Haptic feedback port interface

use async_trait::async_trait;
use thiserror::Error;

/// Haptics errors
#[derive(Debug, Clone, Error)]
pub enum HapticsError {
    #[error("Haptic feedback failed: {0}")]
    Failed(String),
}

/// Port for best-effort haptic feedback on recording controls.
/// Failures are ignored by callers.
#[async_trait]
pub trait Haptics: Send + Sync {
    async fn tap(&self) -> Result<(), HapticsError>;
}
