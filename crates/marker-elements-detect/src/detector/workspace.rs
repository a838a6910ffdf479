//! Per-detector scratch buffers reused across frames.
//!
//! Frame-sized buffers are rebuilt whenever the incoming frame dimensions
//! differ from the previous frame's; patch-sized buffers are fixed by the
//! detector parameters.

use marker_elements_core::GrayImage;
use marker_elements_patterns::Grid;

use crate::quad::Quad;

#[derive(Debug)]
pub(crate) struct FrameWorkspace {
    dims: Option<(usize, usize)>,
    pub gray: GrayImage,
    pub binary: GrayImage,
    pub mask: image::GrayImage,
    pub warped: GrayImage,
    pub warped_binary: GrayImage,
    pub candidates: Vec<Quad>,
    pub threshold: u8,
    pub grid: Option<Grid>,
}

impl FrameWorkspace {
    pub fn new(patch_size: usize) -> Self {
        Self {
            dims: None,
            gray: GrayImage::default(),
            binary: GrayImage::default(),
            mask: image::GrayImage::new(0, 0),
            warped: GrayImage::new(patch_size, patch_size),
            warped_binary: GrayImage::new(patch_size, patch_size),
            candidates: Vec::new(),
            threshold: 0,
            grid: None,
        }
    }

    /// Size frame buffers for `width × height` and clear per-frame results.
    ///
    /// Returns `true` when the buffers were rebuilt.
    pub fn prepare(&mut self, width: usize, height: usize) -> bool {
        self.candidates.clear();
        self.grid = None;
        if self.dims == Some((width, height)) {
            return false;
        }
        log::debug!("rebuilding frame buffers for {width}x{height}");
        self.gray = GrayImage::new(width, height);
        self.binary = GrayImage::new(width, height);
        self.mask = image::GrayImage::new(width as u32, height as u32);
        self.dims = Some((width, height));
        true
    }

    #[inline]
    pub fn dims(&self) -> Option<(usize, usize)> {
        self.dims
    }

    /// Blank the patch buffers so nothing from an earlier frame is shown.
    pub fn clear_patch(&mut self) {
        self.warped.fill(0);
        self.warped_binary.fill(0);
    }
}
