//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod session;

// Re-export the controller surface
pub use session::{ControllerConfig, ControllerError, PlatformServices, RecordingController};
