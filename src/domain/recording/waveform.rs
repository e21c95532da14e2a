//! Waveform normalization for display

/// Output length of a normalized waveform
pub const WAVEFORM_LEN: usize = 40;

/// Decibel floor mapped to zero
const DB_FLOOR: f32 = -30.0;

/// Contrast exponent applied after the linear mapping
const CONTRAST: f32 = 1.3;

/// Flat fallback level for an empty history, kept above zero so the
/// rendered waveform never collapses visually
const EMPTY_LEVEL: f32 = 0.1;

/// Normalize a decibel history into a fixed-length display waveform.
///
/// Each sample is mapped from [-30, 0] dB into [0, 1], boosted with a
/// `v^1.3` contrast curve, then resampled to `target_len`: short inputs are
/// zero-padded, long inputs are averaged over equal-width buckets.
pub fn normalize(samples: &[f32], target_len: usize) -> Vec<f32> {
    if target_len == 0 {
        return Vec::new();
    }
    if samples.is_empty() {
        return vec![EMPTY_LEVEL; target_len];
    }

    let mapped: Vec<f32> = samples.iter().map(|&db| shape(db)).collect();

    if mapped.len() <= target_len {
        let mut out = mapped;
        out.resize(target_len, 0.0);
        return out;
    }

    // Equal-width buckets over the input, averaged per bucket
    (0..target_len)
        .map(|i| {
            let start = i * mapped.len() / target_len;
            let end = ((i + 1) * mapped.len() / target_len).max(start + 1);
            let window = &mapped[start..end];
            window.iter().sum::<f32>() / window.len() as f32
        })
        .collect()
}

/// Normalize to the default display length
pub fn normalize_default(samples: &[f32]) -> Vec<f32> {
    normalize(samples, WAVEFORM_LEN)
}

fn shape(db: f32) -> f32 {
    let linear = ((db - DB_FLOOR) / -DB_FLOOR).clamp(0.0, 1.0);
    linear.powf(CONTRAST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_is_fixed() {
        for n in [1usize, 5, 39, 40, 41, 500, 6000] {
            let samples: Vec<f32> = (0..n).map(|i| -((i % 30) as f32)).collect();
            assert_eq!(normalize(&samples, WAVEFORM_LEN).len(), WAVEFORM_LEN);
        }
    }

    #[test]
    fn values_stay_in_unit_range() {
        let samples: Vec<f32> = vec![-120.0, -60.0, -30.0, -15.0, 0.0, 12.0];
        for v in normalize(&samples, WAVEFORM_LEN) {
            assert!((0.0..=1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn empty_input_yields_flat_fallback() {
        let out = normalize(&[], WAVEFORM_LEN);
        assert_eq!(out.len(), WAVEFORM_LEN);
        assert!(out.iter().all(|&v| v == EMPTY_LEVEL));
    }

    #[test]
    fn silence_maps_to_zero_and_full_scale_to_one() {
        let out = normalize(&[-60.0, 0.0], 2);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 1.0);
    }

    #[test]
    fn short_input_is_zero_padded() {
        let out = normalize(&[0.0, 0.0], 5);
        assert_eq!(out, vec![1.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn contrast_curve_suppresses_quiet_passages() {
        // -15 dB is the linear midpoint; the contrast curve pulls it below 0.5
        let out = normalize(&[-15.0], 1);
        assert!(out[0] < 0.5);
        assert!(out[0] > 0.3);
    }

    #[test]
    fn long_input_buckets_average() {
        // Two equal halves: loud then silent
        let mut samples = vec![0.0f32; 50];
        samples.extend(vec![-60.0f32; 50]);
        let out = normalize(&samples, 2);
        assert_eq!(out, vec![1.0, 0.0]);
    }
}
