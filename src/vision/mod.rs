//! Frame access and ROI sampling.
//!
//! - `Frame` - owned RGB8 pixel buffer with format conversions
//! - `RoiSampler` - mean-green patch extraction around a face landmark

mod frame;
mod roi;

pub use frame::Frame;
pub use roi::{Landmark, RoiSampler, FOREHEAD_LANDMARK};
