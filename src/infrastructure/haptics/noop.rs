//! No-op haptics adapter
//!
//! Used on hosts without a vibration motor (desktop, headless).

use async_trait::async_trait;

use crate::application::ports::{Haptics, HapticsError};

/// No-op haptics that does nothing
pub struct NoOpHaptics;

impl NoOpHaptics {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpHaptics {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Haptics for NoOpHaptics {
    async fn tap(&self) -> Result<(), HapticsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_returns_ok() {
        assert!(NoOpHaptics::new().tap().await.is_ok());
    }
}
