//! Construction-time tunables for the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Pipeline configuration.
///
/// All values are fixed at construction; the pipeline carries no other
/// tunable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Frame delivery rate in Hz. Every frequency-domain output is scaled
    /// by this value, so it must match the actual camera rate.
    pub fps: f32,
    /// Length of the rolling sample window in seconds.
    pub window_secs: f32,
    /// Minimum buffered signal, in seconds, before any estimate is attempted.
    pub min_signal_secs: f32,
    /// Half-size in pixels of the square sampling patch.
    pub roi_half_size: u32,
    /// Index of the reference landmark within the detector's point list.
    pub landmark_index: usize,
    /// Lower edge of the heart-rate band in Hz.
    pub min_freq_hz: f32,
    /// Upper edge of the heart-rate band in Hz.
    pub max_freq_hz: f32,
    /// Beat peaks must exceed this multiple of the waveform's standard
    /// deviation.
    pub peak_threshold_factor: f32,
    /// Readings below this SNR should be shown as "not determined".
    pub min_snr_db: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            window_secs: 10.0,
            min_signal_secs: 2.0,
            roi_half_size: 12,
            landmark_index: 10,
            min_freq_hz: 0.7,  // 42 BPM
            max_freq_hz: 3.5,  // 210 BPM
            peak_threshold_factor: 0.5,
            min_snr_db: 15.0,
        }
    }
}

impl PipelineConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(Error::InvalidConfig("fps must be positive and finite"));
        }
        if !(self.window_secs.is_finite() && self.window_secs > 0.0) {
            return Err(Error::InvalidConfig("window_secs must be positive"));
        }
        if !(self.min_signal_secs.is_finite() && self.min_signal_secs > 0.0) {
            return Err(Error::InvalidConfig("min_signal_secs must be positive"));
        }
        if !(self.peak_threshold_factor.is_finite() && self.peak_threshold_factor >= 0.0) {
            return Err(Error::InvalidConfig("peak_threshold_factor must be non-negative"));
        }
        Ok(())
    }

    /// Buffer capacity in samples.
    pub(crate) fn buffer_capacity(&self) -> usize {
        (self.fps * self.window_secs) as usize
    }

    /// Samples required before an estimate is attempted.
    pub(crate) fn min_samples(&self) -> usize {
        (self.fps * self.min_signal_secs) as usize
    }

    /// Trailing-mean window for detrending, one second of samples.
    pub(crate) fn detrend_window(&self) -> usize {
        self.fps as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_derived_sizes() {
        let config = PipelineConfig::default();
        assert_eq!(config.buffer_capacity(), 300);
        assert_eq!(config.min_samples(), 60);
        assert_eq!(config.detrend_window(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_fps() {
        let config = PipelineConfig {
            fps: 0.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_window() {
        let config = PipelineConfig {
            window_secs: -1.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
