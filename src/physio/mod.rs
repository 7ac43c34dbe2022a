//! Physiological metrics derived from the filtered pulse waveform.

pub mod hrv;

pub use hrv::{detect_peaks, rmssd_ms, rr_intervals, waveform_rmssd};
