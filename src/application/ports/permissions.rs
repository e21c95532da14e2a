//! Permission port interface

use async_trait::async_trait;

/// Result of a permission request.
/// Denial is an ordinary value, not an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Port for platform permission checks
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Request (or re-check) microphone access
    async fn request_microphone(&self) -> PermissionStatus;
}
