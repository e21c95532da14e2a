//! Permission adapters

use async_trait::async_trait;

use crate::application::ports::{PermissionService, PermissionStatus};

/// Permission service with a fixed answer.
///
/// Desktop hosts have no microphone permission broker; access failures
/// surface from the audio device instead. Tests use the denying variant.
pub struct StaticPermissions {
    status: PermissionStatus,
}

impl StaticPermissions {
    pub fn granted() -> Self {
        Self {
            status: PermissionStatus::Granted,
        }
    }

    pub fn denied() -> Self {
        Self {
            status: PermissionStatus::Denied,
        }
    }
}

#[async_trait]
impl PermissionService for StaticPermissions {
    async fn request_microphone(&self) -> PermissionStatus {
        self.status
    }
}
