//! Helpers for running the detector on `image` crate buffers and files.

use std::path::Path;

use image::{ImageReader, RgbaImage};

use marker_elements_core::FrameError;
use marker_elements_detect::{DetectError, MarkerDetection, MarkerDetector};
use marker_elements_patterns::PatternError;

use crate::driver::OwnedFrame;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the file-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

pub fn owned_frame(img: &RgbaImage) -> OwnedFrame {
    OwnedFrame::new(
        img.width() as usize,
        img.height() as usize,
        img.as_raw().clone(),
    )
}

/// Decode an image file into an RGBA frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<OwnedFrame, Error> {
    let img = ImageReader::open(path)?.decode()?.to_rgba8();
    Ok(owned_frame(&img))
}

#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(detector, img),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_image(
    detector: &mut MarkerDetector,
    img: &RgbaImage,
) -> Result<Option<MarkerDetection>, DetectError> {
    detector.process_rgba(img.width() as usize, img.height() as usize, img.as_raw())
}
