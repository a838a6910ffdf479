use std::sync::Arc;

use marker_elements_core::RgbaFrame;
use marker_elements_patterns::{PatternLibrary, PatternMatcher};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::debug::{build_debug_images, DebugImages};
use super::workspace::FrameWorkspace;
use super::{DetectError, DetectorParams, MarkerDetection};
use crate::binarize::binarize_otsu_into;
use crate::contours::ContourExtractor;
use crate::quad::Quad;
use crate::rectify::Rectifier;
use crate::sample::GridSampler;

/// Frame-at-a-time marker detector.
///
/// Holds the pattern library (shared, read-only) and the scratch buffers of
/// the last frame. Frames are processed synchronously; nothing but buffer
/// capacity carries over between calls.
pub struct MarkerDetector {
    params: DetectorParams,
    matcher: PatternMatcher,
    extractor: ContourExtractor,
    rectifier: Rectifier,
    sampler: GridSampler,
    workspace: FrameWorkspace,
    debug: Option<DebugImages>,
}

impl MarkerDetector {
    /// Validate `params` against each other and against `library`.
    pub fn new(params: DetectorParams, library: Arc<PatternLibrary>) -> Result<Self, DetectError> {
        params.validate()?;
        if library.grid_dimension() != params.grid_dimension {
            return Err(DetectError::LibraryDimension {
                params: params.grid_dimension,
                library: library.grid_dimension(),
            });
        }
        let sampler = GridSampler::new(params.grid_dimension, params.grid_threshold)?;
        log::debug!(
            "marker detector: {} patterns, {}px patch, min area {}",
            library.len(),
            params.rectified_patch_size,
            params.min_contour_area
        );
        Ok(Self {
            matcher: PatternMatcher::new(library),
            extractor: ContourExtractor::new(params.approx_epsilon, params.min_contour_area),
            rectifier: Rectifier::new(params.rectified_patch_size),
            sampler,
            workspace: FrameWorkspace::new(params.rectified_patch_size),
            debug: None,
            params,
        })
    }

    /// Detector over the embedded marker set.
    pub fn with_builtin_library(params: DetectorParams) -> Result<Self, DetectError> {
        Self::new(params, Arc::new(PatternLibrary::builtin()))
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    #[inline]
    pub fn library(&self) -> &Arc<PatternLibrary> {
        self.matcher.library()
    }

    /// Validate a raw RGBA buffer and process it.
    ///
    /// Zero dimensions or a buffer shorter than `width * height * 4` are
    /// rejected before any processing.
    pub fn process_rgba(
        &mut self,
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> Result<Option<MarkerDetection>, DetectError> {
        let frame = RgbaFrame::new(width, height, pixels)?;
        Ok(self.process_frame(&frame))
    }

    /// Run the pipeline on one frame.
    ///
    /// `None` covers every non-error outcome: no quad candidate, a
    /// degenerate quad, or a grid matching no known pattern. Only the first
    /// accepted candidate is rectified; later candidates are ignored.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, frame),
            fields(width = frame.width(), height = frame.height())
        )
    )]
    pub fn process_frame(&mut self, frame: &RgbaFrame<'_>) -> Option<MarkerDetection> {
        let detection = self.run_stages(frame);
        self.debug = if self.params.emit_debug_images {
            let matched = detection.as_ref().map(|d| &d.quad);
            Some(build_debug_images(frame, &self.workspace, &self.sampler, matched))
        } else {
            None
        };
        detection
    }

    fn run_stages(&mut self, frame: &RgbaFrame<'_>) -> Option<MarkerDetection> {
        let ws = &mut self.workspace;
        ws.prepare(frame.width(), frame.height());

        frame.to_gray_into(&mut ws.gray);
        ws.threshold = binarize_otsu_into(&ws.gray, &mut ws.binary);
        log::debug!("frame threshold {}", ws.threshold);

        self.extractor
            .extract_into(&ws.binary, &mut ws.mask, &mut ws.candidates);
        log::debug!("{} quad candidates", ws.candidates.len());

        let Some(first) = ws.candidates.first().copied() else {
            ws.clear_patch();
            return None;
        };
        let quad = Quad::ordered(first.corners);

        if self
            .rectifier
            .rectify_into(&ws.gray.view(), &quad, &mut ws.warped, &mut ws.warped_binary)
            .is_none()
        {
            log::debug!("degenerate quad {:?}", quad.corners);
            ws.clear_patch();
            return None;
        }

        let grid = self.sampler.sample(&ws.warped_binary.view());
        ws.grid = Some(grid);
        log::trace!("sampled grid\n{grid}");

        let Some(m) = self.matcher.match_grid(&grid) else {
            log::debug!("grid matches no known pattern");
            return None;
        };
        log::info!("marker {} at {}", m.id, m.rotation);
        Some(MarkerDetection {
            marker_id: m.id,
            rotation: m.rotation,
            quad,
            centroid: quad.centroid(),
            variant_index: m.variant_index,
            variant_kind: m.kind,
        })
    }

    /// Images of the last processed frame, when `emit_debug_images` is set.
    pub fn debug_images(&self) -> Option<&DebugImages> {
        self.debug.as_ref()
    }

    /// Accepted candidates of the last frame in the order they were tried
    /// (outer borders, then hole borders), with corners as found.
    pub fn last_candidates(&self) -> &[Quad] {
        &self.workspace.candidates
    }

    /// Frame size the scratch buffers are currently built for.
    pub fn buffer_dimensions(&self) -> Option<(usize, usize)> {
        self.workspace.dims()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_elements_patterns::{Grid, Rotation};

    /// RGBA frame: white background, `grid` painted at `(x0, y0)` with
    /// `cell` pixels per cell, on cells white and off cells black.
    fn frame_with_grid(
        w: usize,
        h: usize,
        grid: &Grid,
        x0: usize,
        y0: usize,
        cell: usize,
    ) -> Vec<u8> {
        let mut px = vec![255u8; w * h * 4];
        let side = grid.dimension() * cell;
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                let v = grid.value((x - x0) / cell, (y - y0) / cell);
                let i = (y * w + x) * 4;
                px[i..i + 3].fill(v);
            }
        }
        px
    }

    fn detector() -> MarkerDetector {
        MarkerDetector::with_builtin_library(DetectorParams::default()).expect("detector")
    }

    #[test]
    fn detects_quarter_turned_marker() {
        let mut det = detector();
        let g = det.library().get(3).expect("marker 3").reference().rotate_cw();
        let px = frame_with_grid(640, 480, &g, 200, 120, 40);
        let d = det.process_rgba(640, 480, &px).expect("frame").expect("detection");
        assert_eq!(d.marker_id, 3);
        assert_eq!(d.rotation, Rotation::Deg90);
    }

    #[test]
    fn uniform_frames_yield_no_detection() {
        let mut det = detector();
        for value in [0u8, 128, 255] {
            let px = vec![value; 320 * 240 * 4];
            assert!(det.process_rgba(320, 240, &px).expect("frame").is_none());
            // the one dark component spans the whole image and touches its edge
            assert!(det.last_candidates().is_empty());
        }
    }

    #[test]
    fn marker_on_a_sheet_over_a_dark_surface() {
        let mut det = detector();
        let g = det.library().get(2).expect("marker 2").reference();
        let mut px = frame_with_grid(640, 480, &g, 200, 120, 40);
        for y in 0..480 {
            for x in 0..640 {
                if !(170..470).contains(&x) || !(90..390).contains(&y) {
                    let i = (y * 640 + x) * 4;
                    px[i..i + 3].fill(30);
                }
            }
        }
        let d = det.process_rgba(640, 480, &px).expect("frame").expect("detection");
        assert_eq!(d.marker_id, 2);
        assert_eq!(d.rotation, Rotation::Deg0);
        assert!(det.last_candidates().len() >= 2);
    }

    #[test]
    fn unknown_pattern_is_not_an_error() {
        let mut det = detector();
        let g = Grid::from_rows(&["000000", "011110", "011110", "011110", "011110", "000000"])
            .expect("rows");
        let px = frame_with_grid(640, 480, &g, 200, 120, 40);
        assert!(det.process_rgba(640, 480, &px).expect("frame").is_none());
        assert!(!det.last_candidates().is_empty());
    }

    #[test]
    fn library_dimension_must_match_params() {
        let params = DetectorParams {
            grid_dimension: 5,
            ..DetectorParams::default()
        };
        assert!(matches!(
            MarkerDetector::with_builtin_library(params),
            Err(DetectError::LibraryDimension {
                params: 5,
                library: 6
            })
        ));
    }

    #[test]
    fn malformed_frames_are_rejected() {
        let mut det = detector();
        assert!(matches!(
            det.process_rgba(0, 10, &[]),
            Err(DetectError::Frame(_))
        ));
        assert!(matches!(
            det.process_rgba(10, 10, &[0u8; 399]),
            Err(DetectError::Frame(_))
        ));
        assert_eq!(det.buffer_dimensions(), None);
    }

    #[test]
    fn debug_images_follow_the_flag() {
        let mut det = detector();
        let px = vec![255u8; 64 * 48 * 4];
        det.process_rgba(64, 48, &px).expect("frame");
        assert!(det.debug_images().is_none());

        let params = DetectorParams {
            emit_debug_images: true,
            ..DetectorParams::default()
        };
        let mut det = MarkerDetector::with_builtin_library(params).expect("detector");
        det.process_rgba(64, 48, &px).expect("frame");
        let images = det.debug_images().expect("debug images");
        assert_eq!(images.grayscale.dimensions(), (64, 48));
        assert_eq!(images.warped.dimensions(), (300, 300));
        assert!(images.warped.pixels().all(|p| p.0[0] == 0));
        assert_eq!(images.stages().len(), 6);
    }
}
