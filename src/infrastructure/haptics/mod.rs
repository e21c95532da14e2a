//! Haptics adapters

mod noop;

pub use noop::NoOpHaptics;
