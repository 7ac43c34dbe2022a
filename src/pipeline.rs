//! End-to-end rPPG pipeline: frames in, gated heart metrics out.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::buffer::SignalBuffer;
use crate::config::PipelineConfig;
use crate::dsp::{bandpass::Butterworth, detrend, spectrum};
use crate::error::Error;
use crate::physio::hrv;
use crate::vision::{Frame, Landmark, RoiSampler};

/// One heart-metrics reading.
///
/// Absent fields mean "not enough information yet", never failure.
/// `snr_db` is `f32::NEG_INFINITY` when no spectral estimate exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Heart rate in beats per minute.
    pub bpm: Option<f32>,
    /// RMSSD heart-rate variability in milliseconds.
    pub rmssd_ms: Option<f32>,
    /// Peak-to-band power ratio of the spectral estimate, in dB.
    pub snr_db: f32,
}

impl Estimate {
    fn unavailable() -> Self {
        Self {
            bpm: None,
            rmssd_ms: None,
            snr_db: f32::NEG_INFINITY,
        }
    }

    /// Whether the reading is complete and clean enough to display.
    ///
    /// Anything below the threshold should render as "not determined"
    /// rather than a stale or partial number.
    pub fn is_conclusive(&self, min_snr_db: f32) -> bool {
        self.bpm.is_some() && self.rmssd_ms.is_some() && self.snr_db >= min_snr_db
    }
}

/// Heart-rate / HRV estimator over a rolling window of face brightness.
///
/// Feed every frame through [`update`](Self::update); poll
/// [`compute`](Self::compute) on whatever cadence the caller likes (the
/// reference UI does so once per second). All session state lives in the
/// sample buffer; estimation itself is a pure function of the snapshot.
pub struct RppgPipeline {
    config: PipelineConfig,
    sampler: RoiSampler,
    buffer: SignalBuffer,
    filter: Butterworth,
}

impl RppgPipeline {
    /// Pipeline with the default configuration: 30 fps, 10 s window, and
    /// the canonical 30 fps filter coefficients.
    pub fn new() -> Self {
        let config = PipelineConfig::default();
        Self {
            sampler: RoiSampler::new(config.landmark_index, config.roi_half_size),
            buffer: SignalBuffer::new(config.buffer_capacity()),
            filter: Butterworth::fps30(),
            config,
        }
    }

    /// Pipeline with a custom configuration.
    ///
    /// Bandpass coefficients are redesigned for the configured sample rate
    /// and band; fixed literals are never reused across sample rates.
    pub fn with_config(config: PipelineConfig) -> Result<Self, Error> {
        config.validate()?;
        let filter = Butterworth::design(
            config.min_freq_hz as f64,
            config.max_freq_hz as f64,
            config.fps as f64,
        )?;
        debug!(
            fps = config.fps,
            window_secs = config.window_secs,
            "rPPG pipeline ready"
        );
        Ok(Self {
            sampler: RoiSampler::new(config.landmark_index, config.roi_half_size),
            buffer: SignalBuffer::new(config.buffer_capacity()),
            filter,
            config,
        })
    }

    /// Ingest one frame.
    ///
    /// Frames with too few landmarks or an unusable patch are skipped
    /// silently; the buffer does not grow on a skipped frame.
    pub fn update(&mut self, frame: &Frame, landmarks: &[Landmark]) {
        match self.sampler.sample(frame, landmarks) {
            Some(sample) => self.buffer.push(sample),
            None => trace!("frame skipped, no usable ROI sample"),
        }
    }

    /// Estimate heart metrics from the current window.
    ///
    /// Pure with respect to pipeline state: repeated calls without an
    /// intervening [`update`](Self::update) return identical results.
    pub fn compute(&self) -> Estimate {
        if self.buffer.len() < self.config.min_samples() {
            return Estimate::unavailable();
        }

        let raw = Array1::from_vec(self.buffer.snapshot());
        let detrended = detrend::moving_mean(&raw, self.config.detrend_window());
        let filtered = self.filter.filtfilt(&detrended);

        let Some(peak) = spectrum::band_peak(
            &filtered,
            self.config.fps,
            self.config.min_freq_hz,
            self.config.max_freq_hz,
        ) else {
            debug!("no spectral bin inside the heart-rate band");
            return Estimate::unavailable();
        };

        let bpm = peak.freq_hz * 60.0;
        let rmssd_ms =
            hrv::waveform_rmssd(&filtered, self.config.fps, self.config.peak_threshold_factor);
        if rmssd_ms.is_none() {
            debug!(bpm, "too few beat peaks for variability");
        }

        Estimate {
            bpm: Some(bpm),
            rmssd_ms,
            snr_db: peak.snr_db,
        }
    }

    /// Copy of the raw, unfiltered sample window, oldest first, for
    /// diagnostic visualization.
    pub fn signal(&self) -> Vec<f32> {
        self.buffer.snapshot()
    }

    /// Samples currently buffered.
    pub fn sample_count(&self) -> usize {
        self.buffer.len()
    }

    /// Buffer occupancy in `[0, 1]`; 1.0 once the rolling window is full.
    pub fn fill_ratio(&self) -> f32 {
        self.buffer.fill_ratio()
    }

    /// Discard all buffered samples. Configuration and filter are kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl Default for RppgPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_up_estimate_is_unavailable() {
        let pipeline = RppgPipeline::new();
        let estimate = pipeline.compute();
        assert_eq!(estimate.bpm, None);
        assert_eq!(estimate.rmssd_ms, None);
        assert_eq!(estimate.snr_db, f32::NEG_INFINITY);
        assert!(!estimate.is_conclusive(15.0));
    }

    #[test]
    fn skipped_frames_do_not_grow_the_buffer() {
        let mut pipeline = RppgPipeline::new();
        let frame = Frame::new(vec![0u8; 64 * 48 * 3], 64, 48).unwrap();
        pipeline.update(&frame, &[]); // no landmarks at all
        pipeline.update(&frame, &vec![Landmark::new(0.5, 0.5); 5]); // too few
        assert_eq!(pipeline.sample_count(), 0);
        pipeline.update(&frame, &vec![Landmark::new(0.5, 0.5); 11]);
        assert_eq!(pipeline.sample_count(), 1);
    }

    #[test]
    fn reset_clears_the_session() {
        let mut pipeline = RppgPipeline::new();
        let frame = Frame::new(vec![0u8; 64 * 48 * 3], 64, 48).unwrap();
        let landmarks = vec![Landmark::new(0.5, 0.5); 11];
        for _ in 0..90 {
            pipeline.update(&frame, &landmarks);
        }
        assert!(pipeline.fill_ratio() > 0.0);
        pipeline.reset();
        assert_eq!(pipeline.sample_count(), 0);
        assert_eq!(pipeline.compute(), Estimate::unavailable());
    }

    #[test]
    fn with_config_designs_for_the_configured_rate() {
        let config = PipelineConfig {
            fps: 60.0,
            ..PipelineConfig::default()
        };
        let pipeline = RppgPipeline::with_config(config).unwrap();
        assert_eq!(pipeline.config().fps, 60.0);
    }

    #[test]
    fn with_config_rejects_unfilterable_rates() {
        // 3.5 Hz band edge needs fps > 7
        let config = PipelineConfig {
            fps: 6.0,
            ..PipelineConfig::default()
        };
        assert!(RppgPipeline::with_config(config).is_err());
    }

    #[test]
    fn conclusive_requires_all_three() {
        let base = Estimate {
            bpm: Some(72.0),
            rmssd_ms: Some(30.0),
            snr_db: 20.0,
        };
        assert!(base.is_conclusive(15.0));
        assert!(!Estimate { bpm: None, ..base }.is_conclusive(15.0));
        assert!(!Estimate {
            rmssd_ms: None,
            ..base
        }
        .is_conclusive(15.0));
        assert!(!Estimate {
            snr_db: 10.0,
            ..base
        }
        .is_conclusive(15.0));
    }
}
