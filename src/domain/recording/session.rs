//! Recording session entity and state machine

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Starting,
    Recording,
    Paused,
    Stopping,
    Cancelling,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Stopping => "stopping",
            Self::Cancelling => "cancelling",
        }
    }

    /// True while audio capture is held (recording or paused)
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// A user-placed mark at an offset into the recording.
/// Append-only for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: String,
    pub offset_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Highlight {
    pub fn at(offset_secs: f64, label: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            offset_secs,
            label,
        }
    }
}

/// In-memory recording session entity.
///
/// State machine:
///   IDLE -> STARTING (begin_start, reentrancy guard)
///   STARTING -> RECORDING (activate) | IDLE (abort_start)
///   RECORDING <-> PAUSED (toggle_pause)
///   RECORDING | PAUSED -> STOPPING (begin_stop) -> IDLE (finish)
///   RECORDING | PAUSED | STOPPING -> CANCELLING (begin_cancel) -> IDLE (finish)
#[derive(Debug)]
pub struct RecordingSession {
    id: String,
    state: SessionState,
    duration_ms: u64,
    highlights: Vec<Highlight>,
    realtime_enabled: bool,
    target_language: Option<String>,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            state: SessionState::Idle,
            duration_ms: 0,
            highlights: Vec::new(),
            realtime_enabled: false,
            target_language: None,
        }
    }

    /// Get the session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Elapsed capture time in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Elapsed capture time in seconds
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Highlights placed so far, in append order
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Whether streaming transcription was requested for this session
    pub fn realtime_enabled(&self) -> bool {
        self.realtime_enabled
    }

    /// Translation target language, when enabled
    pub fn target_language(&self) -> Option<&str> {
        self.target_language.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Transition from IDLE to STARTING and reset per-session data.
    /// A fresh identifier is minted; duration and highlights are cleared.
    pub fn begin_start(
        &mut self,
        realtime: bool,
        target_language: Option<String>,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start recording".to_string(),
            });
        }
        self.id = Uuid::new_v4().to_string();
        self.duration_ms = 0;
        self.highlights.clear();
        self.realtime_enabled = realtime;
        self.target_language = target_language;
        self.state = SessionState::Starting;
        Ok(())
    }

    /// Transition from STARTING to RECORDING once the audio resource is held
    pub fn activate(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Starting {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "activate recording".to_string(),
            });
        }
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Return a failed start to IDLE
    pub fn abort_start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Starting {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "abort start".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Toggle between RECORDING and PAUSED.
    /// Returns the state after the toggle.
    pub fn toggle_pause(&mut self) -> Result<SessionState, InvalidStateTransition> {
        match self.state {
            SessionState::Recording => {
                self.state = SessionState::Paused;
                Ok(self.state)
            }
            SessionState::Paused => {
                self.state = SessionState::Recording;
                Ok(self.state)
            }
            _ => Err(InvalidStateTransition {
                current_state: self.state,
                action: "toggle pause".to_string(),
            }),
        }
    }

    /// Transition from RECORDING/PAUSED to STOPPING
    pub fn begin_stop(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.state.is_active() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "stop recording".to_string(),
            });
        }
        self.state = SessionState::Stopping;
        Ok(())
    }

    /// Transition to CANCELLING.
    /// Valid from RECORDING/PAUSED, and from STOPPING so a stop that failed
    /// at a collaborator can still be abandoned.
    pub fn begin_cancel(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.state.is_active() && self.state != SessionState::Stopping {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "cancel recording".to_string(),
            });
        }
        self.state = SessionState::Cancelling;
        Ok(())
    }

    /// Complete a stop or cancel, returning to IDLE
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            SessionState::Stopping | SessionState::Cancelling => {
                self.state = SessionState::Idle;
                Ok(())
            }
            _ => Err(InvalidStateTransition {
                current_state: self.state,
                action: "finish session".to_string(),
            }),
        }
    }

    /// Force the session back to IDLE regardless of state.
    /// Used on the cancellation path, which must be unconditionally terminal.
    pub fn force_idle(&mut self) {
        self.state = SessionState::Idle;
        self.duration_ms = 0;
        self.highlights.clear();
    }

    /// Advance the duration timer. Only valid input while RECORDING;
    /// ticks arriving in any other state are ignored.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.state == SessionState::Recording {
            self.duration_ms += elapsed_ms;
        }
    }

    /// Append a highlight at the current duration offset
    pub fn add_highlight(
        &mut self,
        label: Option<String>,
    ) -> Result<Highlight, InvalidStateTransition> {
        if !self.state.is_active() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "add highlight".to_string(),
            });
        }
        let highlight = Highlight::at(self.duration_secs(), label);
        self.highlights.push(highlight.clone());
        Ok(highlight)
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
