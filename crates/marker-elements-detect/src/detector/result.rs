use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use marker_elements_patterns::{Rotation, VariantKind};

use crate::quad::Quad;

/// A recognized marker in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerDetection {
    pub marker_id: u32,
    /// In-plane rotation of the observed marker relative to its reference,
    /// serialized in degrees.
    #[serde(rename = "rotation_deg")]
    pub rotation: Rotation,
    /// Corners in canonical order: clockwise on screen from the minimum
    /// `x + y` corner.
    pub quad: Quad,
    pub centroid: Point2<f32>,
    /// Position of the matched variant in the pattern's variant list.
    pub variant_index: usize,
    pub variant_kind: VariantKind,
}
