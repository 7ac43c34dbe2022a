//! Green-channel ROI sampling around a face landmark.
//!
//! The green channel carries the strongest pulsatile component of skin
//! color, and the forehead moves least with expression, so one small patch
//! around the forehead landmark is enough for a usable pulse trace.

use serde::{Deserialize, Serialize};

use super::frame::Frame;

/// Forehead point of the 468-landmark face mesh.
pub const FOREHEAD_LANDMARK: usize = 10;

/// A normalized face-mesh point as delivered by an external detector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position in `[0, 1]` relative to frame width.
    pub x: f32,
    /// Vertical position in `[0, 1]` relative to frame height.
    pub y: f32,
    /// Depth relative to the face centroid. Unused by the sampler.
    pub z: f32,
    /// Detector confidence in `[0, 1]`, when the detector provides one.
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }
}

/// Extracts one mean-green brightness sample per frame from a square patch
/// around the reference landmark.
#[derive(Debug)]
pub struct RoiSampler {
    landmark_index: usize,
    half_size: u32,
    /// Patch scratch space, grown lazily. One per sampler instance;
    /// concurrent sessions never share it.
    scratch: Vec<f32>,
}

impl RoiSampler {
    pub fn new(landmark_index: usize, half_size: u32) -> Self {
        Self {
            landmark_index,
            half_size,
            scratch: Vec::new(),
        }
    }

    /// Mean green intensity over the clamped patch.
    ///
    /// Returns `None` (a silent skip, not an error) when the landmark set
    /// is shorter than the reference index, the frame has no pixels, or
    /// the clamped patch is empty. The patch is clamped edge-by-edge: the
    /// origin is floored at zero and the extent shrunk to fit, never
    /// re-centered, so no read lands outside the frame.
    pub fn sample(&mut self, frame: &Frame, landmarks: &[Landmark]) -> Option<f32> {
        let lm = landmarks.get(self.landmark_index)?;
        let w = frame.width() as i64;
        let h = frame.height() as i64;
        if w == 0 || h == 0 {
            return None;
        }

        let cx = (lm.x * w as f32).round() as i64;
        let cy = (lm.y * h as f32).round() as i64;
        let r = self.half_size as i64;

        let x1 = (cx - r).max(0);
        let y1 = (cy - r).max(0);
        let patch_w = (2 * r).min(w - x1);
        let patch_h = (2 * r).min(h - y1);
        if patch_w <= 0 || patch_h <= 0 {
            return None;
        }

        self.scratch.clear();
        self.scratch.reserve((patch_w * patch_h) as usize);
        for y in y1..y1 + patch_h {
            for x in x1..x1 + patch_w {
                self.scratch.push(frame.pixel(x as u32, y as u32)[1] as f32);
            }
        }

        let sum: f64 = self.scratch.iter().map(|&g| g as f64).sum();
        Some((sum / self.scratch.len() as f64) as f32)
    }
}
