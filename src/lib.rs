//! # facepulse
//!
//! Heart rate (BPM) and heart-rate variability (RMSSD) from a stream of
//! face-region brightness samples - a remote photoplethysmography (rPPG)
//! pipeline.
//!
//! This crate covers the numeric core only: an external detector supplies
//! face landmarks per frame, an external UI consumes the gated estimates.
//! The pipeline is four stages, each depending only on the one below:
//!
//! 1. **ROI sampling** - mean green intensity of a small patch around the
//!    forehead landmark
//! 2. **Rolling buffer** - a fixed 10 s FIFO window of samples
//! 3. **Preprocessing** - trailing-mean detrending plus a zero-phase
//!    Butterworth bandpass over the 0.7-3.5 Hz heart-rate band
//! 4. **Dual estimation** - spectral peak for BPM and SNR, time-domain
//!    beat intervals for RMSSD
//!
//! ## Example
//!
//! ```
//! use facepulse::{Frame, Landmark, RppgPipeline};
//!
//! let mut pipeline = RppgPipeline::new();
//!
//! // Per frame: ingest the pixels plus the detector's landmark list
//! let frame = Frame::from_rgba(&[0u8; 64 * 48 * 4], 64, 48).unwrap();
//! let landmarks = vec![Landmark::new(0.5, 0.4); 11];
//! pipeline.update(&frame, &landmarks);
//!
//! // On a slower cadence: poll for a reading
//! let estimate = pipeline.compute();
//! if estimate.is_conclusive(pipeline.config().min_snr_db) {
//!     println!("{:.0} BPM", estimate.bpm.unwrap());
//! }
//! ```

pub mod buffer;
pub mod config;
pub mod dsp;
pub mod error;
pub mod physio;
pub mod pipeline;
pub mod vision;

pub use config::PipelineConfig;
pub use error::Error;
pub use pipeline::{Estimate, RppgPipeline};
pub use vision::{Frame, Landmark, RoiSampler, FOREHEAD_LANDMARK};
