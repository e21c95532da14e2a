//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Glyphs for rendering amplitude bars, quiet to loud
const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Render recent loudness samples (dBFS) as a bar string for the live
    /// meter
    pub fn level_meter(levels: &[f32]) -> String {
        levels
            .iter()
            .map(|&db| {
                let unit = ((db + 60.0) / 60.0).clamp(0.0, 1.0);
                let idx = (unit * (BAR_GLYPHS.len() - 1) as f32).round() as usize;
                BAR_GLYPHS[idx]
            })
            .collect()
    }

    /// Render a normalized waveform (values in [0, 1]) as a bar string
    pub fn waveform(values: &[f32]) -> String {
        values
            .iter()
            .map(|&v| {
                let idx = (v.clamp(0.0, 1.0) * (BAR_GLYPHS.len() - 1) as f32).round() as usize;
                BAR_GLYPHS[idx]
            })
            .collect()
    }

    /// Format a millisecond duration as m:ss
    pub fn clock(duration_ms: u64) -> String {
        let total_secs = duration_ms / 1000;
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
