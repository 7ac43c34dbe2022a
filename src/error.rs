//! Crate error type.
//!
//! Runtime signal conditions (warm-up, missing spectral peak, too few
//! beats, skipped frames) are ordinary output states, not errors; only
//! construction and pixel-format conversion can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration field is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The requested band cannot be realized at the given sample rate.
    #[error("no bandpass for {low_hz}-{high_hz} Hz at {fs} Hz sampling")]
    FilterDesign { low_hz: f64, high_hz: f64, fs: f64 },

    /// A pixel buffer does not match the declared frame dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    /// Decoding an image file or byte stream failed.
    #[cfg(feature = "image-io")]
    #[error("image decode failed: {0}")]
    ImageDecode(String),
}
