//! Single-marker detection pipeline for RGBA frames.
//!
//! Stages, each usable on its own:
//!
//! - [`binarize`]: global Otsu threshold (`value > t` is on).
//! - [`contours`]: dark-foreground border following, closed polygon
//!   simplification, 4-vertex and minimum-area filtering.
//! - [`quad`]: canonical corner order (clockwise on screen, starting at the
//!   minimum `x + y` corner).
//! - [`rectify`]: quad to square patch through a 4-point homography, then a
//!   second Otsu pass on the patch.
//! - [`sample`]: cell-centre sampling of the patch into a
//!   [`Grid`](marker_elements_patterns::Grid).
//!
//! [`MarkerDetector`] chains them and matches the sampled grid against a
//! [`PatternLibrary`](marker_elements_patterns::PatternLibrary).
//!
//! ```no_run
//! use marker_elements_detect::{DetectorParams, MarkerDetector};
//!
//! let mut detector = MarkerDetector::with_builtin_library(DetectorParams::default())?;
//! let pixels = vec![255u8; 640 * 480 * 4];
//! if let Some(d) = detector.process_rgba(640, 480, &pixels)? {
//!     println!("marker {} rotated {}", d.marker_id, d.rotation);
//! }
//! # Ok::<(), marker_elements_detect::DetectError>(())
//! ```

pub mod binarize;
pub mod contours;
mod detector;
pub mod quad;
pub mod rectify;
pub mod sample;

pub use contours::ContourExtractor;
pub use detector::{DebugImages, DetectError, DetectorParams, MarkerDetection, MarkerDetector};
pub use quad::{order_quad, Quad};
pub use rectify::Rectifier;
pub use sample::GridSampler;
