//! Owned RGB8 video frame.
//!
//! Camera integrations deliver RGBA (browser canvases, desktop capture) or
//! NV21 (Android); both convert into the same row-major RGB8 layout here.

use crate::error::Error;

/// A single video frame with a readable pixel buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw RGB8 pixel data, row-major.
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap raw RGB8 data. The buffer must hold exactly
    /// `width * height * 3` bytes.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, Error> {
        let expected = (width as usize) * (height as usize) * 3;
        if data.len() != expected {
            return Err(Error::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Convert an RGBA8 buffer (alpha dropped).
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Result<Self, Error> {
        let pixel_count = (width as usize) * (height as usize);
        if rgba.len() != pixel_count * 4 {
            return Err(Error::FrameSize {
                expected: pixel_count * 4,
                actual: rgba.len(),
            });
        }
        let mut data = Vec::with_capacity(pixel_count * 3);
        for px in rgba.chunks_exact(4) {
            data.extend_from_slice(&px[..3]);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Convert an NV21 (YUV420SP) buffer, the common Android camera format.
    pub fn from_nv21(yuv: &[u8], width: u32, height: u32) -> Result<Self, Error> {
        let frame_size = (width as usize) * (height as usize);
        let expected = frame_size + frame_size / 2;
        if yuv.len() < expected {
            return Err(Error::FrameSize {
                expected,
                actual: yuv.len(),
            });
        }
        let mut data = vec![0u8; frame_size * 3];
        for y in 0..height as usize {
            for x in 0..width as usize {
                let y_idx = y * width as usize + x;
                let uv_idx = frame_size + (y / 2) * width as usize + (x & !1);

                let luma = yuv[y_idx] as i32;
                let v = yuv[uv_idx] as i32 - 128;
                let u = yuv.get(uv_idx + 1).copied().unwrap_or(128) as i32 - 128;

                let r = (luma + (1.370705 * v as f32) as i32).clamp(0, 255) as u8;
                let g = (luma - (0.337633 * u as f32) as i32 - (0.698001 * v as f32) as i32)
                    .clamp(0, 255) as u8;
                let b = (luma + (1.732446 * u as f32) as i32).clamp(0, 255) as u8;

                let rgb_idx = y_idx * 3;
                data[rgb_idx] = r;
                data[rgb_idx + 1] = g;
                data[rgb_idx + 2] = b;
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y) as [R, G, B]; black outside the frame.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = ((y * self.width + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

#[cfg(feature = "image-io")]
impl Frame {
    /// Load a frame from an image file (test fixtures, offline clips).
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let img = image::open(path).map_err(|e| Error::ImageDecode(e.to_string()))?;
        Ok(Self::from_dynamic_image(&img))
    }

    /// Decode a frame from encoded bytes (JPEG/PNG).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let img =
            image::load_from_memory(bytes).map_err(|e| Error::ImageDecode(e.to_string()))?;
        Ok(Self::from_dynamic_image(&img))
    }

    /// Convert from an `image` crate `DynamicImage`.
    pub fn from_dynamic_image(img: &image::DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self {
            data: rgb.into_raw(),
            width,
            height,
        }
    }
}
