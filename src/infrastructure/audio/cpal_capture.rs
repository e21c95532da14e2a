//! Cross-platform microphone capture using cpal
//!
//! Captures mono PCM at the device rate, meters input loudness per buffer,
//! and finalizes the capture to a WAV file as the stable audio reference.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{AudioCapture, AudioCaptureError, CapturedAudio};

/// Meter value meaning "no signal yet"
const METER_FLOOR_DB: f32 = -60.0;

/// Audio capture adapter over cpal.
///
/// The stream is owned by a background thread because cpal::Stream is not
/// Send; control flows through atomics shared with the stream callback.
pub struct CpalCapture {
    /// Captured mono samples at the device sample rate
    buffer: Arc<StdMutex<Vec<i16>>>,
    device_sample_rate: Arc<AtomicU32>,
    is_capturing: Arc<AtomicBool>,
    is_paused: Arc<AtomicBool>,
    /// Latest RMS loudness in dBFS, stored as f32 bits
    meter_db_bits: Arc<AtomicU32>,
    /// Directory WAV files are finalized into
    output_dir: PathBuf,
}

impl CpalCapture {
    /// Create a capture adapter writing WAV files under the platform data
    /// directory
    pub fn new() -> Self {
        let output_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("voicenote")
            .join("audio");
        Self::with_output_dir(output_dir)
    }

    /// Create with a custom output directory
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_capturing: Arc::new(AtomicBool::new(false)),
            is_paused: Arc::new(AtomicBool::new(false)),
            meter_db_bits: Arc::new(AtomicU32::new(METER_FLOOR_DB.to_bits())),
            output_dir: output_dir.into(),
        }
    }

    fn get_input_device() -> Result<cpal::Device, AudioCaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(AudioCaptureError::NoAudioDevice)
    }

    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), AudioCaptureError> {
        let supported = device.supported_input_configs().map_err(|e| {
            AudioCaptureError::AcquireFailed(format!("Failed to get configs: {}", e))
        })?;

        // Prefer mono i16/f32 configs; mix stereo down otherwise
        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }
            let is_better = match &best {
                None => true,
                Some(current) => config.channels() < current.channels(),
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or(AudioCaptureError::AcquireFailed(
            "No suitable input config found".into(),
        ))?;

        let sample_format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate: range.max_sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        Ok((config, sample_format))
    }

    /// Mix interleaved frames down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }
        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// RMS loudness of a buffer in dBFS
    fn rms_db(samples: &[i16]) -> f32 {
        if samples.is_empty() {
            return METER_FLOOR_DB;
        }
        let sum_sq: f64 = samples
            .iter()
            .map(|&s| {
                let v = s as f64 / i16::MAX as f64;
                v * v
            })
            .sum();
        let rms = (sum_sq / samples.len() as f64).sqrt();
        if rms <= 0.0 {
            METER_FLOOR_DB
        } else {
            (20.0 * rms.log10()).max(METER_FLOOR_DB as f64) as f32
        }
    }

    fn write_wav(
        path: &std::path::Path,
        samples: &[i16],
        sample_rate: u32,
    ) -> Result<(), AudioCaptureError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| AudioCaptureError::FinalizeFailed(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| AudioCaptureError::FinalizeFailed(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioCaptureError::FinalizeFailed(e.to_string()))
    }

    fn halt_capture(&self) {
        self.is_capturing.store(false, Ordering::SeqCst);
        self.is_paused.store(false, Ordering::SeqCst);
        self.meter_db_bits
            .store(METER_FLOOR_DB.to_bits(), Ordering::SeqCst);
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn prepare(&self) -> Result<(), AudioCaptureError> {
        if self.is_capturing.load(Ordering::SeqCst) {
            return Err(AudioCaptureError::AcquireFailed(
                "Capture already in progress".into(),
            ));
        }
        // Probe the device up front so acquisition failures surface on
        // start, not mid-capture
        let device = Self::get_input_device()?;
        Self::get_input_config(&device)?;
        self.buffer.lock().unwrap().clear();
        Ok(())
    }

    async fn record(&self) -> Result<(), AudioCaptureError> {
        if self.is_capturing.load(Ordering::SeqCst) {
            return Err(AudioCaptureError::AcquireFailed(
                "Capture already in progress".into(),
            ));
        }
        self.is_capturing.store(true, Ordering::SeqCst);
        self.is_paused.store(false, Ordering::SeqCst);

        let buffer = Arc::clone(&self.buffer);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let is_capturing = Arc::clone(&self.is_capturing);
        let is_paused = Arc::clone(&self.is_paused);
        let meter = Arc::clone(&self.meter_db_bits);

        // The stream lives on a dedicated thread; it is torn down when
        // is_capturing clears
        std::thread::spawn(move || {
            let device = match CpalCapture::get_input_device() {
                Ok(d) => d,
                Err(_) => {
                    is_capturing.store(false, Ordering::SeqCst);
                    return;
                }
            };
            let (config, sample_format) = match CpalCapture::get_input_config(&device) {
                Ok(c) => c,
                Err(_) => {
                    is_capturing.store(false, Ordering::SeqCst);
                    return;
                }
            };
            let channels = config.channels;
            device_sample_rate.store(config.sample_rate.0, Ordering::SeqCst);

            let on_samples = {
                let buffer = Arc::clone(&buffer);
                let is_paused = Arc::clone(&is_paused);
                let meter = Arc::clone(&meter);
                move |samples: Vec<i16>| {
                    if is_paused.load(Ordering::SeqCst) {
                        return;
                    }
                    let mono = CpalCapture::mix_to_mono(&samples, channels);
                    meter.store(CpalCapture::rms_db(&mono).to_bits(), Ordering::SeqCst);
                    if let Ok(mut buffer) = buffer.lock() {
                        buffer.extend_from_slice(&mono);
                    }
                }
            };

            let stream_result = match sample_format {
                SampleFormat::I16 => {
                    let on_samples = on_samples.clone();
                    device.build_input_stream(
                        &config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            on_samples(data.to_vec());
                        },
                        |err| warn!(error = %err, "audio stream error"),
                        None,
                    )
                }
                SampleFormat::F32 => device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        on_samples(i16_data);
                    },
                    |err| warn!(error = %err, "audio stream error"),
                    None,
                ),
                _ => {
                    is_capturing.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(_) => {
                    is_capturing.store(false, Ordering::SeqCst);
                    return;
                }
            };
            if stream.play().is_err() {
                is_capturing.store(false, Ordering::SeqCst);
                return;
            }

            while is_capturing.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            drop(stream);
        });

        // Give the thread a moment to open the stream
        sleep(TokioDuration::from_millis(50)).await;

        if !self.is_capturing.load(Ordering::SeqCst) {
            return Err(AudioCaptureError::AcquireFailed(
                "Failed to open input stream".into(),
            ));
        }
        debug!("audio capture started");
        Ok(())
    }

    async fn pause(&self) -> Result<(), AudioCaptureError> {
        self.is_paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), AudioCaptureError> {
        self.is_paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<CapturedAudio, AudioCaptureError> {
        if !self.is_capturing.load(Ordering::SeqCst) {
            return Err(AudioCaptureError::CaptureFailed(
                "No capture in progress".into(),
            ));
        }
        self.halt_capture();

        // Let the stream thread wind down before draining the buffer
        sleep(TokioDuration::from_millis(100)).await;

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(AudioCaptureError::CaptureFailed(
                "Sample rate not set".into(),
            ));
        }

        let samples = {
            let mut buffer = self.buffer.lock().unwrap();
            std::mem::take(&mut *buffer)
        };
        if samples.is_empty() {
            return Err(AudioCaptureError::CaptureFailed(
                "No audio data captured".into(),
            ));
        }
        let duration_ms = samples.len() as u64 * 1000 / sample_rate as u64;

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| AudioCaptureError::FinalizeFailed(e.to_string()))?;
        let path = self.output_dir.join(format!("{}.wav", Uuid::new_v4()));

        // WAV encoding is CPU-bound; keep it off the async workers
        let write_path = path.clone();
        tokio::task::spawn_blocking(move || Self::write_wav(&write_path, &samples, sample_rate))
            .await
            .map_err(|e| AudioCaptureError::FinalizeFailed(format!("Write task error: {}", e)))??;

        debug!(path = %path.display(), duration_ms, "capture finalized");
        Ok(CapturedAudio {
            uri: path.to_string_lossy().into_owned(),
            duration_ms,
        })
    }

    async fn cancel(&self) -> Result<(), AudioCaptureError> {
        self.halt_capture();
        sleep(TokioDuration::from_millis(100)).await;
        self.buffer.lock().unwrap().clear();
        Ok(())
    }

    fn metering_level(&self) -> Option<f32> {
        if self.is_capturing.load(Ordering::SeqCst) {
            Some(f32::from_bits(self.meter_db_bits.load(Ordering::SeqCst)))
        } else {
            None
        }
    }
}
