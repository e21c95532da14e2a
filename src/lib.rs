//! Voicenote - voice-note recorder with live waveform and crash recovery
//!
//! This crate records voice notes from the microphone with a live level
//! meter, optional streaming transcription with translation, periodic
//! draft autosave for crash recovery, and a normalized display waveform.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session state machine, amplitude history, waveform
//!   normalization, transcript consolidation, drafts
//! - **Application**: The recording session controller and port interfaces
//!   (traits)
//! - **Infrastructure**: Adapter implementations (cpal capture, JSON file
//!   storage, config, no-op transcription)
//! - **CLI**: Command-line interface, argument parsing, and output

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
