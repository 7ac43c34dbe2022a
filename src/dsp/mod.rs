//! Signal conditioning for the pulse trace.
//!
//! - `detrend` - slow illumination drift removal
//! - `bandpass` - Butterworth band-limiting with zero-phase application
//! - `spectrum` - band-restricted spectral peak and SNR

pub mod bandpass;
pub mod detrend;
pub mod spectrum;

pub use bandpass::Butterworth;
pub use spectrum::{band_peak, BandPeak};
