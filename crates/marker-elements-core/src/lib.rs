//! Core types and utilities for the marker-elements pipeline.
//!
//! This crate is intentionally small and purely geometric: raw frame
//! descriptors, grayscale buffers, bilinear sampling, homography estimation
//! and perspective warping. It does *not* depend on any concrete image
//! library.

mod frame;
mod homography;
mod image;
mod logger;

pub use frame::{luma, rgba_len, FrameError, RgbaFrame};
pub use homography::{homography_from_4pt, warp_perspective_gray_into, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
