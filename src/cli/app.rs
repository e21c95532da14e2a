//! CLI application wiring and command handlers

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};

use crate::application::{ControllerConfig, PlatformServices, RecordingController};
use crate::cli::args::ConfigAction;
use crate::cli::presenter::Presenter;
use crate::domain::config::AppConfig;
use crate::domain::recording::SessionState;
use crate::infrastructure::{
    CpalCapture, JsonFileStore, JsonRecordingSink, NoOpHaptics, NoOpTranscriber, NoOpTranslator,
    StaticPermissions, XdgConfigStore,
};

use crate::application::ports::ConfigStore;

pub const EXIT_ERROR: u8 = 1;

/// Wire a controller from the default desktop adapters
fn build_controller(config: &AppConfig) -> (RecordingController, Arc<JsonRecordingSink>) {
    let services = PlatformServices {
        audio: Arc::new(CpalCapture::new()),
        permissions: Arc::new(StaticPermissions::granted()),
        storage: Arc::new(JsonFileStore::new()),
        haptics: Arc::new(NoOpHaptics::new()),
    };
    let sink = Arc::new(JsonRecordingSink::new());
    let controller = RecordingController::new(
        services,
        Arc::new(NoOpTranscriber::new()),
        Arc::new(NoOpTranslator::new()),
        sink.clone(),
        ControllerConfig::from_app_config(config),
    );
    (controller, sink)
}

/// Load file config and overlay CLI flags
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Run the record command until Ctrl-C (stop) or the max duration
pub async fn run_record(config: AppConfig, max_secs: Option<u64>) -> ExitCode {
    let mut presenter = Presenter::new();
    let (controller, sink) = build_controller(&config);

    if controller.check_for_recovery().await.is_some() {
        presenter.warn(
            "A previous recording was interrupted; run 'voicenote recover' to inspect or discard it",
        );
    }

    if !controller.request_microphone_permission().await.is_granted() {
        presenter.error("Microphone access denied");
        return ExitCode::from(EXIT_ERROR);
    }

    if let Err(e) = controller.start().await {
        presenter.error(&format!("Could not start recording: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.info("Recording. Enter pauses/resumes, 'c' discards, Ctrl-C stops.");
    presenter.start_spinner("0:00");

    let mut ticker = interval(Duration::from_millis(200));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let deadline = max_secs.map(Duration::from_secs);
    let started = tokio::time::Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(limit) = deadline {
                    if started.elapsed() >= limit {
                        break;
                    }
                }
                let elapsed = controller.elapsed_ms().await;
                let levels = controller.recent_levels().await;
                let state = controller.state().await;
                let label = if state == SessionState::Paused { " (paused)" } else { "" };
                presenter.update_spinner(&format!(
                    "{}{} {}",
                    Presenter::clock(elapsed),
                    label,
                    Presenter::level_meter(&levels),
                ));
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) if matches!(input.trim(), "c" | "cancel") => {
                        presenter.stop_spinner();
                        if let Err(e) = controller.cancel().await {
                            presenter.error(&format!("Could not discard recording: {}", e));
                            return ExitCode::from(EXIT_ERROR);
                        }
                        presenter.success("Recording discarded");
                        return ExitCode::SUCCESS;
                    }
                    Ok(Some(_)) => {
                        if let Err(e) = controller.pause_resume().await {
                            presenter.warn(&format!("Cannot pause: {}", e));
                        }
                    }
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    presenter.stop_spinner();
    match controller.stop().await {
        Ok(recording) => {
            presenter.success(&format!(
                "Saved recording {} ({})",
                recording.id,
                Presenter::clock(recording.duration_ms)
            ));
            println!("{}", Presenter::waveform(&recording.waveform));
            if let Some(transcript) = &recording.transcript {
                if !transcript.is_empty() {
                    println!("{}", transcript);
                }
            }
            presenter.info(&format!("Audio: {}", recording.audio_uri));
            presenter.info(&format!("Metadata: {}", sink.dir().display()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            presenter.error(&format!("Failed to finish recording: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the recover command
pub async fn run_recover(discard: bool) -> ExitCode {
    let presenter = Presenter::new();
    let (controller, _) = build_controller(&AppConfig::defaults());

    match controller.check_for_recovery().await {
        None => {
            presenter.info("No interrupted recording found");
            ExitCode::SUCCESS
        }
        Some(draft) => {
            presenter.warn(&format!(
                "Found an interrupted recording: {} recorded, {} highlight(s), {} transcript segment(s)",
                Presenter::clock(draft.duration_ms),
                draft.highlights.len(),
                draft.segments.len(),
            ));
            if !draft.amplitude_history.is_empty() {
                let waveform =
                    crate::domain::recording::waveform::normalize_default(&draft.amplitude_history);
                println!("{}", Presenter::waveform(&waveform));
            }
            if discard {
                match controller.clear_recovery_draft().await {
                    Ok(()) => {
                        presenter.success("Draft discarded");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        presenter.error(&format!("Could not discard draft: {}", e));
                        ExitCode::from(EXIT_ERROR)
                    }
                }
            } else {
                presenter.info("The audio itself cannot be recovered; use --discard to remove the draft");
                ExitCode::SUCCESS
            }
        }
    }
}

/// Run a config subcommand
pub async fn handle_config_command(action: ConfigAction) -> ExitCode {
    let presenter = Presenter::new();
    let store = XdgConfigStore::new();
    match action {
        ConfigAction::Path => {
            println!("{}", store.path().display());
            ExitCode::SUCCESS
        }
        ConfigAction::Show => match store.load().await {
            Ok(config) => {
                let effective = AppConfig::defaults().merge(config);
                match toml::to_string_pretty(&effective) {
                    Ok(text) => {
                        print!("{}", text);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        presenter.error(&format!("Could not render config: {}", e));
                        ExitCode::from(EXIT_ERROR)
                    }
                }
            }
            Err(e) => {
                presenter.error(&e.to_string());
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}
