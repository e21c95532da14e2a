//! Audio capture port interface

use async_trait::async_trait;
use thiserror::Error;

/// Audio capture errors
#[derive(Debug, Clone, Error)]
pub enum AudioCaptureError {
    #[error("Failed to acquire audio device: {0}")]
    AcquireFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Failed to finalize captured audio: {0}")]
    FinalizeFailed(String),
}

/// Stable reference to captured audio, produced when capture stops.
///
/// Backends resolve their platform-specific output (temp file, blob, stream
/// buffer) into one stable URI here; callers never see the difference.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedAudio {
    pub uri: String,
    pub duration_ms: u64,
}

/// Port for the exclusive audio capture resource.
///
/// Exactly one capture may be open at a time; the session controller is
/// responsible for enforcing that before calling `record`.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Acquire the hardware resource and prepare a capture
    async fn prepare(&self) -> Result<(), AudioCaptureError>;

    /// Begin capturing audio
    async fn record(&self) -> Result<(), AudioCaptureError>;

    /// Suspend capture without releasing the resource
    async fn pause(&self) -> Result<(), AudioCaptureError>;

    /// Resume a paused capture
    async fn resume(&self) -> Result<(), AudioCaptureError>;

    /// Stop capturing and finalize the audio to a stable reference
    async fn stop(&self) -> Result<CapturedAudio, AudioCaptureError>;

    /// Stop capturing and discard the audio
    async fn cancel(&self) -> Result<(), AudioCaptureError>;

    /// Current input loudness in dBFS, if the backend meters it.
    /// Polled once per duration tick.
    fn metering_level(&self) -> Option<f32>;
}
