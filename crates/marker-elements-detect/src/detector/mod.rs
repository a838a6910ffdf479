//! Single-marker frame pipeline.
//!
//! RGBA frame → luma → Otsu binary → quad candidates → first candidate
//! ordered and rectified → patch re-binarized → grid sampled → first library
//! match. Scratch buffers live in a per-detector workspace sized to the last
//! frame.

mod debug;
mod error;
mod params;
mod pipeline;
mod result;
mod workspace;

pub use debug::DebugImages;
pub use error::DetectError;
pub use params::DetectorParams;
pub use pipeline::MarkerDetector;
pub use result::MarkerDetection;
