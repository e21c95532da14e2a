//! Crash-recovery integration tests
//!
//! Drives the session controller against the real file-backed stores to
//! verify drafts survive an unclean process termination.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::tempdir;

use voicenote::application::ports::{
    AudioCapture, AudioCaptureError, CapturedAudio, KeyValueStore,
};
use voicenote::application::{ControllerConfig, PlatformServices, RecordingController};
use voicenote::domain::recording::DRAFT_KEY;
use voicenote::infrastructure::{
    JsonFileStore, JsonRecordingSink, NoOpHaptics, NoOpTranscriber, NoOpTranslator,
    StaticPermissions,
};

/// Audio capture stub; recordings finalize to a fixed URI
struct FakeAudio;

#[async_trait]
impl AudioCapture for FakeAudio {
    async fn prepare(&self) -> Result<(), AudioCaptureError> {
        Ok(())
    }

    async fn record(&self) -> Result<(), AudioCaptureError> {
        Ok(())
    }

    async fn pause(&self) -> Result<(), AudioCaptureError> {
        Ok(())
    }

    async fn resume(&self) -> Result<(), AudioCaptureError> {
        Ok(())
    }

    async fn stop(&self) -> Result<CapturedAudio, AudioCaptureError> {
        Ok(CapturedAudio {
            uri: "/tmp/fake.wav".into(),
            duration_ms: 1500,
        })
    }

    async fn cancel(&self) -> Result<(), AudioCaptureError> {
        Ok(())
    }

    fn metering_level(&self) -> Option<f32> {
        Some(-18.0)
    }
}

fn controller_over(dir: &std::path::Path, sink_dir: &std::path::Path) -> RecordingController {
    let services = PlatformServices {
        audio: Arc::new(FakeAudio),
        permissions: Arc::new(StaticPermissions::granted()),
        storage: Arc::new(JsonFileStore::with_dir(dir)),
        haptics: Arc::new(NoOpHaptics::new()),
    };
    RecordingController::new(
        services,
        Arc::new(NoOpTranscriber::new()),
        Arc::new(NoOpTranslator::new()),
        Arc::new(JsonRecordingSink::with_dir(sink_dir)),
        ControllerConfig::default(),
    )
}

#[tokio::test]
async fn draft_survives_process_restart() {
    let state_dir = tempdir().unwrap();
    let sink_dir = tempdir().unwrap();

    let first = controller_over(state_dir.path(), sink_dir.path());
    first.start().await.unwrap();
    first.add_highlight(Some("important".into())).await.unwrap();
    first.save_draft_now().await.unwrap();
    drop(first); // process dies without stopping

    let second = controller_over(state_dir.path(), sink_dir.path());
    let draft = second
        .check_for_recovery()
        .await
        .expect("draft should survive");
    assert_eq!(draft.highlights.len(), 1);
    assert_eq!(draft.highlights[0].label.as_deref(), Some("important"));

    second.clear_recovery_draft().await.unwrap();
    assert!(second.check_for_recovery().await.is_none());
}

#[tokio::test]
async fn corrupt_draft_reads_as_absent() {
    let state_dir = tempdir().unwrap();
    let sink_dir = tempdir().unwrap();

    let store = JsonFileStore::with_dir(state_dir.path());
    store.set(DRAFT_KEY, "{not valid json").await.unwrap();

    let controller = controller_over(state_dir.path(), sink_dir.path());
    assert!(controller.check_for_recovery().await.is_none());
}

#[tokio::test]
async fn clean_stop_removes_draft_and_persists_recording() {
    let state_dir = tempdir().unwrap();
    let sink_dir = tempdir().unwrap();

    let controller = controller_over(state_dir.path(), sink_dir.path());
    controller.start().await.unwrap();
    controller.save_draft_now().await.unwrap();

    let store = JsonFileStore::with_dir(state_dir.path());
    assert!(store.get(DRAFT_KEY).await.unwrap().is_some());

    let recording = controller.stop().await.unwrap();
    assert_eq!(recording.audio_uri, "/tmp/fake.wav");

    assert!(store.get(DRAFT_KEY).await.unwrap().is_none());
    assert!(sink_dir
        .path()
        .join(format!("{}.json", recording.id))
        .exists());
}
