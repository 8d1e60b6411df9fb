//! Signal estimators for vibration and strain windows.
//!
//! These are deliberately simple heuristics rather than spectral analysis.
//! Each one has a minimum window length and a fallback constant that is
//! returned instead of an error when the window is too short; the risk
//! classification downstream depends on those exact fallbacks.

use tracing::debug;

/// Fallback dominant frequency (Hz) for windows too short to resolve.
pub const FALLBACK_FREQUENCY_HZ: f64 = 1.2;
/// Fallback modal damping ratio.
pub const FALLBACK_DAMPING: f64 = 0.024;
/// Fallback vibration decay time (s).
pub const FALLBACK_DECAY_TIME_S: f64 = 5.0;

/// Minimum samples for a frequency estimate.
pub const MIN_FREQUENCY_SAMPLES: usize = 100;
/// Minimum samples for a damping estimate.
pub const MIN_DAMPING_SAMPLES: usize = 20;
/// Minimum samples for a decay-time estimate.
pub const MIN_DECAY_SAMPLES: usize = 50;

/// Damping estimates are kept strictly inside this range, below the
/// critical-damping boundary of 0.05.
pub const DAMPING_BOUNDS: (f64, f64) = (0.001, 0.049);

/// Forward scan bound for the half-amplitude search, in samples.
const DECAY_SCAN_WINDOW: usize = 100;

/// Estimate the dominant frequency from zero crossings.
///
/// Mean-centers the window, counts sign changes between consecutive samples,
/// halves the count and normalizes by the window duration. The result is
/// rounded to one decimal place.
pub fn estimate_frequency(samples: &[f64], sampling_rate_hz: f64) -> f64 {
    if samples.len() < MIN_FREQUENCY_SAMPLES || sampling_rate_hz <= 0.0 {
        debug!(samples = samples.len(), "frequency window too short, using fallback");
        return FALLBACK_FREQUENCY_HZ;
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let zero_crossings = samples
        .windows(2)
        .filter(|w| (w[0] - mean) * (w[1] - mean) < 0.0)
        .count();

    if zero_crossings == 0 {
        return FALLBACK_FREQUENCY_HZ;
    }

    let duration = samples.len() as f64 / sampling_rate_hz;
    let frequency = (zero_crossings as f64 / 2.0) / duration;
    (frequency * 10.0).round() / 10.0
}

/// Estimate the modal damping ratio from the amplitude envelope.
///
/// `0.5 * (max - min) / (max + min)` over absolute amplitudes, clamped to
/// [`DAMPING_BOUNDS`].
pub fn estimate_damping(samples: &[f64]) -> f64 {
    if samples.len() < MIN_DAMPING_SAMPLES {
        debug!(samples = samples.len(), "damping window too short, using fallback");
        return FALLBACK_DAMPING;
    }

    let (min, max) = samples
        .iter()
        .map(|v| v.abs())
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), a| (lo.min(a), hi.max(a)));

    if max + min > 0.0 {
        let damping = 0.5 * (max - min) / (max + min);
        damping.clamp(DAMPING_BOUNDS.0, DAMPING_BOUNDS.1)
    } else {
        FALLBACK_DAMPING
    }
}

/// Estimate how long the response takes to fall to half its peak.
///
/// Finds the sample with the largest absolute amplitude and scans forward
/// (at most 100 samples) for the first one below half of it. The offset is
/// converted to seconds with the sampling rate.
pub fn estimate_decay_time(samples: &[f64], sampling_rate_hz: f64) -> f64 {
    if samples.len() < MIN_DECAY_SAMPLES || sampling_rate_hz <= 0.0 {
        debug!(samples = samples.len(), "decay window too short, using fallback");
        return FALLBACK_DECAY_TIME_S;
    }

    let (peak_index, peak) = samples
        .iter()
        .map(|v| v.abs())
        .enumerate()
        .fold((0, 0.0_f64), |best, (i, a)| if a > best.1 { (i, a) } else { best });

    if peak == 0.0 {
        return FALLBACK_DECAY_TIME_S;
    }

    let half = peak * 0.5;
    let end = (peak_index + DECAY_SCAN_WINDOW).min(samples.len());

    samples[peak_index..end]
        .iter()
        .position(|v| v.abs() < half)
        .map(|offset| offset as f64 / sampling_rate_hz)
        .unwrap_or(FALLBACK_DECAY_TIME_S)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Largest absolute value, `None` for an empty slice.
pub fn peak_abs(samples: &[f64]) -> Option<f64> {
    samples.iter().map(|v| v.abs()).reduce(f64::max)
}
