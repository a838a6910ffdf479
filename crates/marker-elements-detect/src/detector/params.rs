use std::path::Path;

use serde::{Deserialize, Serialize};

use marker_elements_patterns::MAX_GRID_DIMENSION;

use super::DetectError;

/// Configuration for [`MarkerDetector`](super::MarkerDetector).
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Side of the rectified square patch, in pixels.
    pub rectified_patch_size: usize,
    /// Candidates with a smaller polygon area (px²) are ignored.
    pub min_contour_area: f32,
    /// Polygon simplification tolerance, in pixels.
    pub approx_epsilon: f32,
    /// Cells per side of the sampled grid. Must equal the library's.
    pub grid_dimension: usize,
    /// Sampled patch values at or above this are on cells.
    pub grid_threshold: u8,
    /// Keep per-stage images of the last frame for inspection.
    pub emit_debug_images: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            rectified_patch_size: 300,
            min_contour_area: 6500.0,
            approx_epsilon: 4.0,
            grid_dimension: 6,
            grid_threshold: 128,
            emit_debug_images: false,
        }
    }
}

impl DetectorParams {
    pub fn from_json_str(text: &str) -> Result<Self, DetectError> {
        let params: Self = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DetectError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), DetectError> {
        if !(1..=MAX_GRID_DIMENSION).contains(&self.grid_dimension) {
            return Err(DetectError::InvalidParams(format!(
                "grid_dimension must be in 1..={MAX_GRID_DIMENSION}, got {}",
                self.grid_dimension
            )));
        }
        if self.rectified_patch_size < self.grid_dimension {
            return Err(DetectError::InvalidParams(format!(
                "rectified_patch_size {} is smaller than grid_dimension {}",
                self.rectified_patch_size, self.grid_dimension
            )));
        }
        if !self.min_contour_area.is_finite() || self.min_contour_area < 0.0 {
            return Err(DetectError::InvalidParams(format!(
                "min_contour_area must be finite and non-negative, got {}",
                self.min_contour_area
            )));
        }
        if !self.approx_epsilon.is_finite() || self.approx_epsilon <= 0.0 {
            return Err(DetectError::InvalidParams(format!(
                "approx_epsilon must be finite and positive, got {}",
                self.approx_epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        DetectorParams::default().validate().expect("valid defaults");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p = DetectorParams::from_json_str(r#"{"min_contour_area": 1000.0}"#).expect("parse");
        assert_eq!(p.min_contour_area, 1000.0);
        assert_eq!(p.rectified_patch_size, 300);
        assert_eq!(p.grid_dimension, 6);
    }

    #[test]
    fn patch_smaller_than_grid_is_rejected() {
        let p = DetectorParams {
            rectified_patch_size: 4,
            ..DetectorParams::default()
        };
        assert!(matches!(p.validate(), Err(DetectError::InvalidParams(_))));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let p = DetectorParams {
            grid_dimension: 9,
            ..DetectorParams::default()
        };
        assert!(matches!(p.validate(), Err(DetectError::InvalidParams(_))));
    }

    #[test]
    fn non_positive_epsilon_is_rejected() {
        let err = DetectorParams::from_json_str(r#"{"approx_epsilon": 0.0}"#).unwrap_err();
        assert!(matches!(err, DetectError::InvalidParams(_)));
    }
}
