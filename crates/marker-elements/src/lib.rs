//! Fiducial marker recognition for camera frames.
//!
//! This crate ties the pipeline crates together:
//! - re-exports of [`core`], [`patterns`] and [`detect`]
//! - [`Element`] mapping of marker ids and the [`RecipeBook`] of combinations
//! - [`ElementTracker`], a [`DetectionSink`] that merges combinable elements
//! - [`FrameDriver`] and [`frame_channel`] for feeding frames from a source
//!   thread
//! - (feature `image`) helpers that run the detector on `image` buffers and
//!   files, and the `marker-elements` CLI (feature `cli`)
//!
//! ## Quickstart
//!
//! ```no_run
//! use marker_elements::{DetectorParams, Element, MarkerDetector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = MarkerDetector::with_builtin_library(DetectorParams::default())?;
//! let frame = marker_elements::image_io::load_frame("marker.png")?;
//! if let Some(d) = detector.process_frame(&frame.view()?) {
//!     println!("{} at {:?}", Element::from_marker_id(d.marker_id), d.centroid);
//! }
//! # Ok(())
//! # }
//! ```

pub use marker_elements_core as core;
pub use marker_elements_detect as detect;
pub use marker_elements_patterns as patterns;

pub use marker_elements_core::{init_with_level, FrameError, RgbaFrame};
pub use marker_elements_detect::{
    DebugImages, DetectError, DetectorParams, MarkerDetection, MarkerDetector, Quad,
};
pub use marker_elements_patterns::{Grid, PatternLibrary, PatternMatcher, Rotation};

#[cfg(feature = "tracing")]
pub use marker_elements_core::init_tracing;

mod driver;
mod elements;
mod tracker;

pub use driver::{
    frame_channel, mirror_vertically, DetectionSink, FrameDriver, OwnedFrame, RunSummary,
};
pub use elements::{Element, Recipe, RecipeBook, RecipeError};
pub use tracker::{CombineEvent, ElementTracker, TrackedElement, FIRST_COMBINED_ID};

#[cfg(feature = "image")]
pub mod image_io;
