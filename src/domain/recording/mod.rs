//! Recording domain: session state machine, amplitude history, waveform,
//! highlights, and the crash-recovery draft

pub mod amplitude;
pub mod draft;
pub mod finished;
pub mod session;
pub mod waveform;

pub use amplitude::{AmplitudeHistory, MAX_HISTORY, RECENT_CAPACITY, SILENCE_DB};
pub use draft::{RecordingDraft, DRAFT_KEY};
pub use finished::FinishedRecording;
pub use session::{Highlight, InvalidStateTransition, RecordingSession, SessionState};
pub use waveform::WAVEFORM_LEN;
