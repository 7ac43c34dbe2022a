//! Beat-to-beat interval analysis on the filtered pulse waveform.
//!
//! RMSSD (root mean square of successive RR-interval differences) is the
//! standard short-window HRV metric; it needs clean beat timing, so HR is
//! usually the more reliable of the two camera-based outputs.

use ndarray::Array1;

/// Beats needed before intervals mean anything.
const MIN_BEATS: usize = 3;

/// Indices of strict interior local maxima above `threshold`.
///
/// The first and last samples are never peaks.
pub fn detect_peaks(signal: &Array1<f32>, threshold: f32) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    for i in 1..n.saturating_sub(1) {
        if signal[i] > signal[i - 1] && signal[i] > signal[i + 1] && signal[i] > threshold {
            peaks.push(i);
        }
    }
    peaks
}

/// Population standard deviation.
pub fn std_dev(signal: &Array1<f32>) -> f32 {
    let mean = signal.mean().unwrap_or(0.0);
    let variance = signal.mapv(|x| (x - mean).powi(2)).mean().unwrap_or(0.0);
    variance.sqrt()
}

/// Inter-beat (RR) intervals in seconds for consecutive peak indices.
pub fn rr_intervals(peaks: &[usize], fs: f32) -> Vec<f32> {
    peaks
        .windows(2)
        .map(|w| (w[1] - w[0]) as f32 / fs)
        .collect()
}

/// Root mean square of successive RR differences, in milliseconds.
///
/// Needs at least two intervals (one successive difference).
pub fn rmssd_ms(rr: &[f32]) -> Option<f32> {
    if rr.len() < 2 {
        return None;
    }
    let mean_sq = rr
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            d * d
        })
        .sum::<f32>()
        / (rr.len() - 1) as f32;
    Some(mean_sq.sqrt() * 1000.0)
}

/// RMSSD of the beat sequence found in `signal`, or `None` when too few
/// beats emerge for the intervals to be meaningful.
///
/// The peak threshold is `threshold_factor` times the waveform's standard
/// deviation; the waveform is expected to be band-limited and zero-mean.
pub fn waveform_rmssd(signal: &Array1<f32>, fs: f32, threshold_factor: f32) -> Option<f32> {
    let threshold = threshold_factor * std_dev(signal);
    let peaks = detect_peaks(signal, threshold);
    if peaks.len() < MIN_BEATS {
        return None;
    }
    rmssd_ms(&rr_intervals(&peaks, fs))
}
