//! Raw RGBA camera frames.

use crate::GrayImage;

/// Fixed-point (Q14) luma weights for R, G, B.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Errors raised for malformed frame descriptors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame dimensions (width={width}, height={height})")]
    ZeroDimensions { width: usize, height: usize },
    #[error("frame dimensions overflow (width={width}, height={height})")]
    DimensionOverflow { width: usize, height: usize },
    #[error("RGBA buffer too short (expected {expected} bytes, got {got})")]
    BufferTooShort { expected: usize, got: usize },
}

/// Borrowed RGBA8 frame, row-major, top-to-bottom.
///
/// Construction validates the descriptor, so every accessor may assume
/// `data.len() >= width * height * 4`.
#[derive(Clone, Copy, Debug)]
pub struct RgbaFrame<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> RgbaFrame<'a> {
    pub const CHANNELS: usize = 4;

    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, FrameError> {
        let expected = rgba_len(width, height)?;
        if data.len() < expected {
            return Err(FrameError::BufferTooShort {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: &data[..expected],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * Self::CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Convert to grayscale into `out`, resizing it when the dimensions differ.
    ///
    /// Alpha is ignored.
    pub fn to_gray_into(&self, out: &mut GrayImage) {
        out.ensure_size(self.width, self.height);
        for (dst, px) in out
            .data
            .iter_mut()
            .zip(self.data.chunks_exact(Self::CHANNELS))
        {
            *dst = luma(px[0], px[1], px[2]);
        }
    }

    pub fn to_gray(&self) -> GrayImage {
        let mut out = GrayImage::new(self.width, self.height);
        self.to_gray_into(&mut out);
        out
    }
}

/// Byte length of a `width × height` RGBA8 buffer.
pub fn rgba_len(width: usize, height: usize) -> Result<usize, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::ZeroDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(RgbaFrame::CHANNELS))
        .ok_or(FrameError::DimensionOverflow { width, height })
}

#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let v = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + (1 << (LUMA_SHIFT - 1));
    (v >> LUMA_SHIFT).min(255) as u8
}
