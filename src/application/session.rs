//! Recording session controller use case

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::domain::config::AppConfig;
use crate::domain::recording::{
    waveform, AmplitudeHistory, FinishedRecording, Highlight, InvalidStateTransition,
    RecordingDraft, RecordingSession, SessionState, DRAFT_KEY, SILENCE_DB, WAVEFORM_LEN,
};
use crate::domain::transcription::{SegmentConsolidator, TranscriptEvent, TranscriptSegment};

use super::ports::{
    AudioCapture, AudioCaptureError, ConnectionStatus, Haptics, KeyValueStore, PermissionService,
    PermissionStatus, RecordingSink, SinkError, StorageError, StreamingTranscriber,
    TranscriberEvent, TranscriptionOptions, Translator,
};

/// Errors from the session controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Audio capture failed: {0}")]
    Audio(#[from] AudioCaptureError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Recording handoff failed: {0}")]
    Handoff(#[from] SinkError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Platform capabilities injected into the controller.
/// Keeps the controller itself platform-agnostic and testable headless.
#[derive(Clone)]
pub struct PlatformServices {
    pub audio: Arc<dyn AudioCapture>,
    pub permissions: Arc<dyn PermissionService>,
    pub storage: Arc<dyn KeyValueStore>,
    pub haptics: Arc<dyn Haptics>,
}

/// Controller configuration, resolved from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Open a streaming transcription session alongside capture
    pub realtime: bool,
    /// Translation target language; requires `realtime`
    pub target_language: Option<String>,
    /// Also submit in-flight partial segments for translation
    pub translate_partials: bool,
    /// Spoken language hint passed to the transcriber
    pub language_hint: Option<String>,
    /// Duration/metering tick period
    pub tick_interval: Duration,
    /// Draft autosave period
    pub autosave_interval: Duration,
    /// Length of the normalized display waveform
    pub waveform_len: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::defaults())
    }
}

impl ControllerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            realtime: config.realtime_or_default(),
            target_language: config.target_language.clone(),
            translate_partials: config.translate_partials_or_default(),
            language_hint: None,
            tick_interval: config.tick_interval(),
            autosave_interval: config.autosave_interval(),
            waveform_len: WAVEFORM_LEN,
        }
    }
}

/// Mutable session state shared with the background tasks
struct Inner {
    session: RecordingSession,
    amplitude: AmplitudeHistory,
    consolidator: SegmentConsolidator,
    connection_status: ConnectionStatus,
    /// Assembled payload from a stop whose handoff failed, kept for retry
    pending_handoff: Option<FinishedRecording>,
    /// Duration tick, autosave tick, and transcriber event pump
    tasks: Vec<JoinHandle<()>>,
}

impl Inner {
    fn new() -> Self {
        Self {
            session: RecordingSession::new(),
            amplitude: AmplitudeHistory::new(),
            consolidator: SegmentConsolidator::new(),
            connection_status: ConnectionStatus::Disconnected,
            pending_handoff: None,
            tasks: Vec::new(),
        }
    }

    fn draft(&self) -> RecordingDraft {
        RecordingDraft::snapshot(
            self.session.id(),
            self.session.duration_ms(),
            self.session.highlights().to_vec(),
            self.consolidator.snapshot(),
            self.amplitude.snapshot(),
        )
    }

    fn clear_buffers(&mut self) {
        self.amplitude.clear();
        self.consolidator.reset();
        self.connection_status = ConnectionStatus::Disconnected;
        self.pending_handoff = None;
    }
}

/// Coordinates the exclusive audio resource, amplitude history, streaming
/// transcription overlay, and crash-recovery drafts for one recording
/// session at a time.
///
/// All collaborators are ports; the controller has no platform or UI
/// dependencies of its own.
pub struct RecordingController {
    services: PlatformServices,
    transcriber: Arc<dyn StreamingTranscriber>,
    translator: Arc<dyn Translator>,
    sink: Arc<dyn RecordingSink>,
    config: ControllerConfig,
    inner: Arc<Mutex<Inner>>,
}

impl RecordingController {
    /// Create a new controller in idle state
    pub fn new(
        services: PlatformServices,
        transcriber: Arc<dyn StreamingTranscriber>,
        translator: Arc<dyn Translator>,
        sink: Arc<dyn RecordingSink>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            services,
            transcriber,
            translator,
            sink,
            config,
            inner: Arc::new(Mutex::new(Inner::new())),
        }
    }

    /// Check microphone access before starting.
    /// Denial is a result value; `start()` itself never performs this check.
    pub async fn request_microphone_permission(&self) -> PermissionStatus {
        self.services.permissions.request_microphone().await
    }

    /// Get the current session state
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.session.state()
    }

    /// Elapsed capture time in milliseconds
    pub async fn elapsed_ms(&self) -> u64 {
        self.inner.lock().await.session.duration_ms()
    }

    /// Recent loudness samples for the live level meter, oldest first
    pub async fn recent_levels(&self) -> Vec<f32> {
        self.inner.lock().await.amplitude.recent().collect()
    }

    /// Live transcript view: committed segments followed by in-flight
    /// partials
    pub async fn live_segments(&self) -> Vec<TranscriptSegment> {
        self.inner.lock().await.consolidator.snapshot()
    }

    /// Streaming connection status, Disconnected when realtime is off
    pub async fn connection_status(&self) -> ConnectionStatus {
        self.inner.lock().await.connection_status
    }

    /// Start a new recording session.
    ///
    /// A start while a session is already starting or active is a no-op, not
    /// an error: the audio resource is exclusive and concurrent requests are
    /// dropped rather than queued. Audio acquisition failure returns the
    /// controller to idle and surfaces the error; it is not retried.
    pub async fn start(&self) -> Result<(), ControllerError> {
        {
            let mut inner = self.inner.lock().await;
            if !inner.session.is_idle() {
                debug!(state = %inner.session.state(), "start ignored, session already underway");
                return Ok(());
            }
            inner
                .session
                .begin_start(self.config.realtime, self.config.target_language.clone())?;
            inner.clear_buffers();
        }

        if let Err(e) = self.acquire_audio().await {
            let mut inner = self.inner.lock().await;
            let _ = inner.session.abort_start();
            return Err(e.into());
        }

        let session_id = {
            let mut inner = self.inner.lock().await;
            inner.session.activate()?;
            inner.session.id().to_string()
        };

        self.spawn_duration_tick().await;
        self.spawn_autosave_tick().await;

        if self.config.realtime {
            self.open_streaming(&session_id).await;
        }

        debug!(session_id = %session_id, "recording started");
        Ok(())
    }

    async fn acquire_audio(&self) -> Result<(), AudioCaptureError> {
        self.services.audio.prepare().await?;
        self.services.audio.record().await
    }

    /// Toggle between recording and paused.
    ///
    /// Pausing suspends the duration timer and amplitude sampling; the
    /// streaming connection, if open, is left to the collaborator.
    /// Returns the state after the toggle.
    pub async fn pause_resume(&self) -> Result<SessionState, ControllerError> {
        let new_state = {
            let mut inner = self.inner.lock().await;
            inner.session.toggle_pause()?
        };
        match new_state {
            SessionState::Paused => self.services.audio.pause().await?,
            _ => self.services.audio.resume().await?,
        }
        let _ = self.services.haptics.tap().await;
        Ok(new_state)
    }

    /// Append a highlight at the current duration offset
    pub async fn add_highlight(
        &self,
        label: Option<String>,
    ) -> Result<Highlight, ControllerError> {
        let highlight = {
            let mut inner = self.inner.lock().await;
            inner.session.add_highlight(label)?
        };
        let _ = self.services.haptics.tap().await;
        Ok(highlight)
    }

    /// Stop the session and hand the finished recording off.
    ///
    /// Tears down both timers and the streaming session before completing so
    /// no late event lands on a discarded session. Failure leaves the
    /// session retryable rather than wedged: if the handoff to the recording
    /// sink fails, every buffer is retained and a later `stop()` retries
    /// only the handoff; if the audio collaborator fails to finalize, the
    /// session stays in stopping and a later `stop()` resumes from there
    /// (or `cancel()` discards it). The audio never needs re-recording.
    pub async fn stop(&self) -> Result<FinishedRecording, ControllerError> {
        // Retry path from a previously failed handoff
        let pending = { self.inner.lock().await.pending_handoff.clone() };
        if let Some(recording) = pending {
            return self.hand_off(recording).await;
        }

        let realtime = {
            let mut inner = self.inner.lock().await;
            // Retry path from a previously failed audio finalize
            if inner.session.state() != SessionState::Stopping {
                inner.session.begin_stop()?;
            }
            inner.session.realtime_enabled()
        };

        self.teardown_tasks().await;

        if realtime {
            if let Err(e) = self.transcriber.stop_session().await {
                warn!(error = %e, "failed to close streaming session");
            }
        }

        let captured = self.services.audio.stop().await?;

        let recording = {
            let inner = self.inner.lock().await;
            let transcript = inner
                .session
                .realtime_enabled()
                .then(|| inner.consolidator.consolidate());
            let translation = if inner.session.target_language().is_some() {
                inner.consolidator.consolidated_translation()
            } else {
                None
            };
            let segments: Vec<TranscriptSegment> = inner
                .consolidator
                .snapshot()
                .into_iter()
                .filter(|s| !s.is_partial)
                .collect();
            FinishedRecording {
                id: inner.session.id().to_string(),
                audio_uri: captured.uri,
                duration_ms: inner.session.duration_ms(),
                highlights: inner.session.highlights().to_vec(),
                waveform: waveform::normalize(inner.amplitude.full(), self.config.waveform_len),
                transcript,
                translation,
                segments,
            }
        };

        self.hand_off(recording).await
    }

    async fn hand_off(
        &self,
        recording: FinishedRecording,
    ) -> Result<FinishedRecording, ControllerError> {
        if let Err(e) = self.sink.save(&recording).await {
            warn!(error = %e, "recording handoff failed, buffers retained for retry");
            self.inner.lock().await.pending_handoff = Some(recording);
            return Err(e.into());
        }

        if let Err(e) = self.services.storage.remove(DRAFT_KEY).await {
            warn!(error = %e, "failed to remove draft after stop");
        }

        let mut inner = self.inner.lock().await;
        inner.clear_buffers();
        inner.session.finish()?;
        debug!(recording_id = %recording.id, "recording handed off");
        Ok(recording)
    }

    /// Cancel the session and discard all buffers.
    ///
    /// Unconditionally terminal once begun: collaborator failures during
    /// teardown are logged, the state machine always lands idle, and the
    /// draft is removed.
    pub async fn cancel(&self) -> Result<(), ControllerError> {
        {
            let mut inner = self.inner.lock().await;
            inner.session.begin_cancel()?;
        }

        self.teardown_tasks().await;

        let realtime = { self.inner.lock().await.session.realtime_enabled() };
        if realtime {
            if let Err(e) = self.transcriber.stop_session().await {
                warn!(error = %e, "failed to close streaming session on cancel");
            }
        }

        if let Err(e) = self.services.audio.cancel().await {
            warn!(error = %e, "audio cancel failed, discarding session anyway");
        }

        if let Err(e) = self.services.storage.remove(DRAFT_KEY).await {
            warn!(error = %e, "failed to remove draft on cancel");
        }

        let mut inner = self.inner.lock().await;
        inner.clear_buffers();
        inner.session.force_idle();
        debug!("recording cancelled");
        Ok(())
    }

    /// Read any draft left behind by an unclean shutdown.
    ///
    /// Valid before a session starts. A clean `stop()`/`cancel()` removes
    /// the draft, so a leftover one is evidence of a crash or process kill.
    /// Unreadable drafts are treated as absent, never as a startup failure.
    pub async fn check_for_recovery(&self) -> Option<RecordingDraft> {
        match self.services.storage.get(DRAFT_KEY).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable recovery draft");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read recovery draft");
                None
            }
        }
    }

    /// Discard a recovered draft the user chose not to keep
    pub async fn clear_recovery_draft(&self) -> Result<(), ControllerError> {
        self.services.storage.remove(DRAFT_KEY).await?;
        Ok(())
    }

    /// Persist a draft snapshot immediately, outside the autosave cadence
    /// (e.g. when the host application is backgrounded)
    pub async fn save_draft_now(&self) -> Result<(), ControllerError> {
        let draft = {
            let inner = self.inner.lock().await;
            if !inner.session.state().is_active() {
                return Ok(());
            }
            inner.draft()
        };
        write_draft(&*self.services.storage, &draft).await?;
        Ok(())
    }

    async fn spawn_duration_tick(&self) {
        let inner = Arc::clone(&self.inner);
        let audio = Arc::clone(&self.services.audio);
        let tick = self.config.tick_interval;
        let handle = tokio::spawn(async move {
            let mut timer = interval(tick);
            // Consume the immediate first tick so time starts at zero
            timer.tick().await;
            loop {
                timer.tick().await;
                let mut guard = inner.lock().await;
                if guard.session.state() == SessionState::Recording {
                    guard.session.tick(tick.as_millis() as u64);
                    let db = audio.metering_level().unwrap_or(SILENCE_DB);
                    guard.amplitude.push(db);
                }
            }
        });
        self.inner.lock().await.tasks.push(handle);
    }

    async fn spawn_autosave_tick(&self) {
        let inner = Arc::clone(&self.inner);
        let storage = Arc::clone(&self.services.storage);
        let period = self.config.autosave_interval;
        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.tick().await;
            loop {
                timer.tick().await;
                let draft = {
                    let guard = inner.lock().await;
                    if !guard.session.state().is_active() {
                        continue;
                    }
                    guard.draft()
                };
                if let Err(e) = write_draft(&*storage, &draft).await {
                    warn!(error = %e, "draft autosave failed");
                }
            }
        });
        self.inner.lock().await.tasks.push(handle);
    }

    /// Open the streaming session and spawn the event pump.
    /// Failure degrades gracefully: recording continues without a live
    /// transcript.
    async fn open_streaming(&self, session_id: &str) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.inner.lock().await.connection_status = ConnectionStatus::Connecting;

        let options = TranscriptionOptions {
            language: self.config.language_hint.clone(),
            diarize: false,
        };
        if let Err(e) = self
            .transcriber
            .start_session(session_id, options, tx)
            .await
        {
            warn!(error = %e, "streaming transcription unavailable, continuing without it");
            self.inner.lock().await.connection_status = ConnectionStatus::Error;
            return;
        }

        let inner = Arc::clone(&self.inner);
        let translator = Arc::clone(&self.translator);
        let target = self.config.target_language.clone();
        let translate_partials = self.config.translate_partials;
        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    TranscriberEvent::Status(status) => {
                        inner.lock().await.connection_status = status;
                    }
                    TranscriberEvent::Segment(segment_event) => {
                        consume_segment_event(
                            &inner,
                            &translator,
                            target.as_deref(),
                            translate_partials,
                            segment_event,
                        )
                        .await;
                    }
                }
            }
        });
        self.inner.lock().await.tasks.push(handle);
    }

    /// Abort and await the background tasks so no late tick or segment
    /// event lands after teardown
    async fn teardown_tasks(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut inner = self.inner.lock().await;
            inner.tasks.drain(..).collect()
        };
        for handle in handles {
            handle.abort();
            let _ = handle.await;
        }
    }
}

async fn write_draft(
    storage: &dyn KeyValueStore,
    draft: &RecordingDraft,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(draft).map_err(|e| StorageError::WriteFailed {
        key: DRAFT_KEY.to_string(),
        message: e.to_string(),
    })?;
    storage.set(DRAFT_KEY, &json).await
}

/// Fold one segment event into the consolidator and, when translation is
/// enabled, submit the text fire-and-forget keyed by segment id.
async fn consume_segment_event(
    inner: &Arc<Mutex<Inner>>,
    translator: &Arc<dyn Translator>,
    target: Option<&str>,
    translate_partials: bool,
    event: TranscriptEvent,
) {
    let segment_id = event.segment_id().to_string();
    let (text, translate) = match &event {
        TranscriptEvent::Committed(patch) => (patch.text.clone(), target.is_some()),
        TranscriptEvent::Partial(patch) => {
            (patch.text.clone(), target.is_some() && translate_partials)
        }
    };

    // A stale event (late partial for a committed segment, duplicate
    // commit) must not touch translation state either
    let translate = {
        let mut guard = inner.lock().await;
        let applied = guard.consolidator.apply(event);
        if applied && translate {
            guard.consolidator.mark_translation_pending(&segment_id);
        }
        applied && translate
    };

    if let (true, Some(language)) = (translate, target) {
        let inner = Arc::clone(inner);
        let translator = Arc::clone(translator);
        let language = language.to_string();
        tokio::spawn(async move {
            let outcome = translator.translate(&text, &language).await;
            let mut guard = inner.lock().await;
            match outcome {
                Ok(translated) => guard.consolidator.set_translation(&segment_id, Ok(translated)),
                Err(e) => {
                    warn!(segment_id = %segment_id, error = %e, "segment translation failed");
                    guard.consolidator.set_translation(&segment_id, Err(()));
                }
            }
        });
    }
}
