//! Bounded amplitude history with lossy downsampling

use std::collections::VecDeque;

/// Samples kept for the live level meter
pub const RECENT_CAPACITY: usize = 50;

/// Hard cap on the full history (~10 minutes at 100 ms ticks)
pub const MAX_HISTORY: usize = 6000;

/// Silence floor in dBFS, used when the meter has no reading
pub const SILENCE_DB: f32 = -60.0;

/// Loudness history for one recording session.
///
/// Keeps two views of the per-tick decibel samples:
/// - a small ring of recent samples for live visual feedback
/// - the full history, bounded by pairwise-averaging downsampling so memory
///   stays constant for arbitrarily long recordings
#[derive(Debug, Clone)]
pub struct AmplitudeHistory {
    recent: VecDeque<f32>,
    full: Vec<f32>,
    recent_capacity: usize,
    max_history: usize,
}

impl AmplitudeHistory {
    /// Create a history with the default capacities
    pub fn new() -> Self {
        Self::with_capacities(RECENT_CAPACITY, MAX_HISTORY)
    }

    /// Create a history with custom capacities.
    /// `max_history` must be at least 2 so downsampling can make progress.
    pub fn with_capacities(recent_capacity: usize, max_history: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(recent_capacity),
            full: Vec::new(),
            recent_capacity,
            max_history: max_history.max(2),
        }
    }

    /// Record one loudness sample in decibels.
    ///
    /// When the full history hits its cap, consecutive pairs are averaged in
    /// place, halving the stored length before the new sample is appended.
    /// Temporal resolution halves each time the cap is reached; the envelope
    /// shape is preserved.
    pub fn push(&mut self, db: f32) {
        if self.recent.len() == self.recent_capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(db);

        if self.full.len() >= self.max_history {
            self.downsample();
        }
        self.full.push(db);
    }

    fn downsample(&mut self) {
        let halved: Vec<f32> = self
            .full
            .chunks(2)
            .map(|pair| pair.iter().sum::<f32>() / pair.len() as f32)
            .collect();
        self.full = halved;
    }

    /// Recent samples, oldest first
    pub fn recent(&self) -> impl Iterator<Item = f32> + '_ {
        self.recent.iter().copied()
    }

    /// The full (possibly downsampled) history
    pub fn full(&self) -> &[f32] {
        &self.full
    }

    /// Number of samples currently in the full history
    pub fn len(&self) -> usize {
        self.full.len()
    }

    /// True when no samples have been recorded
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// Drop all samples (new session)
    pub fn clear(&mut self) {
        self.recent.clear();
        self.full.clear();
    }

    /// Copy of the full history for draft persistence
    pub fn snapshot(&self) -> Vec<f32> {
        self.full.clone()
    }
}

impl Default for AmplitudeHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_window_overwrites_oldest() {
        let mut history = AmplitudeHistory::with_capacities(3, 100);
        for db in [-10.0, -20.0, -30.0, -40.0] {
            history.push(db);
        }
        let recent: Vec<f32> = history.recent().collect();
        assert_eq!(recent, vec![-20.0, -30.0, -40.0]);
    }

    #[test]
    fn full_history_never_exceeds_cap() {
        let mut history = AmplitudeHistory::with_capacities(50, 6000);
        for i in 0..20_000 {
            history.push(-(i % 60) as f32);
            assert!(history.len() <= 6000, "length {} at sample {}", history.len(), i);
        }
    }

    #[test]
    fn downsampling_halves_and_averages() {
        let mut history = AmplitudeHistory::with_capacities(4, 4);
        history.push(-10.0);
        history.push(-20.0);
        history.push(-30.0);
        history.push(-40.0);
        // Cap reached: pairs averaged, then the new sample appended
        history.push(-50.0);
        assert_eq!(history.full(), &[-15.0, -35.0, -50.0]);
    }

    #[test]
    fn downsampling_preserves_mean_envelope() {
        let mut history = AmplitudeHistory::with_capacities(10, 100);
        for _ in 0..500 {
            history.push(-24.0);
        }
        assert!(history.len() <= 100);
        assert!(history.full().iter().all(|&db| (db - -24.0).abs() < 1e-4));
    }

    #[test]
    fn clear_resets_both_views() {
        let mut history = AmplitudeHistory::new();
        history.push(-5.0);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.recent().count(), 0);
    }
}
