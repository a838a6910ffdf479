//! Known marker patterns with their precomputed orientation variants.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builtins::{BUILTIN_GRID_DIMENSION, BUILTIN_MARKERS};
use crate::{Grid, PatternError, Rotation};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// How a variant was derived from its base rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Rotated,
    FlippedHorizontal,
    FlippedVertical,
}

/// One stored orientation of a reference grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Variant {
    pub grid: Grid,
    pub kind: VariantKind,
    /// Rotation of the base orientation this variant was derived from.
    pub rotation: Rotation,
}

/// Expand a reference grid into its 12 stored variants.
///
/// Order: rotations 0/90/180/270 (each the previous one turned clockwise),
/// then the horizontal flip of each rotation, then the vertical flip of each
/// rotation. This is not the 8-element dihedral group: vertical flips always
/// repeat horizontal flips of the opposite rotation, and symmetric references
/// repeat further. Duplicates are kept so variant positions stay stable.
pub fn generate_variants(reference: Grid) -> Vec<Variant> {
    let mut rotations = [reference; 4];
    for i in 1..4 {
        rotations[i] = rotations[i - 1].rotate_cw();
    }

    let mut out = Vec::with_capacity(12);
    for (kind, f) in [
        (VariantKind::Rotated, Grid::clone as fn(&Grid) -> Grid),
        (VariantKind::FlippedHorizontal, Grid::flip_horizontal),
        (VariantKind::FlippedVertical, Grid::flip_vertical),
    ] {
        for (q, grid) in rotations.iter().enumerate() {
            out.push(Variant {
                grid: f(grid),
                kind,
                rotation: Rotation::from_quarter_turns(q as u8),
            });
        }
    }
    out
}

/// A known marker: id, reference grid and its variants.
#[derive(Clone, Debug)]
pub struct MarkerPattern {
    id: u32,
    reference: Grid,
    variants: Vec<Variant>,
}

impl MarkerPattern {
    pub fn new(id: u32, reference: Grid) -> Self {
        Self {
            id,
            reference,
            variants: generate_variants(reference),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn reference(&self) -> Grid {
        self.reference
    }

    /// Variants in generation order.
    #[inline]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn distinct_variant_count(&self) -> usize {
        self.variants
            .iter()
            .map(|v| v.grid)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// JSON layout of a pattern library file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternLibraryFile {
    pub grid_dimension: usize,
    pub patterns: Vec<PatternEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternEntry {
    pub id: u32,
    pub rows: Vec<String>,
}

/// Ordered, immutable collection of marker patterns.
///
/// Registration order is significant: the matcher returns the first
/// pattern with an equal variant, so when two patterns share a variant the
/// one registered first wins.
#[derive(Clone, Debug)]
pub struct PatternLibrary {
    grid_dimension: usize,
    patterns: Vec<MarkerPattern>,
}

impl PatternLibrary {
    /// Build from `(id, reference)` pairs, in order.
    pub fn from_references<I>(grid_dimension: usize, references: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (u32, Grid)>,
    {
        Grid::new(grid_dimension)?;
        let mut seen = HashSet::new();
        let mut patterns = Vec::new();
        for (id, reference) in references {
            if reference.dimension() != grid_dimension {
                return Err(PatternError::DimensionMismatch {
                    id,
                    expected: grid_dimension,
                    got: reference.dimension(),
                });
            }
            if !seen.insert(id) {
                return Err(PatternError::DuplicateId(id));
            }
            patterns.push(MarkerPattern::new(id, reference));
        }
        log::debug!(
            "pattern library: {} patterns, {}x{} grids",
            patterns.len(),
            grid_dimension,
            grid_dimension
        );
        Ok(Self {
            grid_dimension,
            patterns,
        })
    }

    /// The embedded marker set (ids 1..=4, 6×6 grids).
    pub fn builtin() -> Self {
        let patterns = BUILTIN_MARKERS
            .iter()
            .map(|&(id, bits)| {
                MarkerPattern::new(id, Grid::from_raw(BUILTIN_GRID_DIMENSION, bits))
            })
            .collect();
        Self {
            grid_dimension: BUILTIN_GRID_DIMENSION,
            patterns,
        }
    }

    pub fn from_file(file: &PatternLibraryFile) -> Result<Self, PatternError> {
        let mut references = Vec::with_capacity(file.patterns.len());
        for entry in &file.patterns {
            if entry.rows.len() != file.grid_dimension {
                return Err(PatternError::RowCount {
                    expected: file.grid_dimension,
                    got: entry.rows.len(),
                });
            }
            references.push((entry.id, Grid::from_rows(&entry.rows)?));
        }
        Self::from_references(file.grid_dimension, references)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(text)))]
    pub fn from_json_str(text: &str) -> Result<Self, PatternError> {
        let file: PatternLibraryFile = serde_json::from_str(text)?;
        Self::from_file(&file)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_file(&self) -> PatternLibraryFile {
        PatternLibraryFile {
            grid_dimension: self.grid_dimension,
            patterns: self
                .patterns
                .iter()
                .map(|p| PatternEntry {
                    id: p.id,
                    rows: p.reference.to_rows(),
                })
                .collect(),
        }
    }

    #[inline]
    pub fn grid_dimension(&self) -> usize {
        self.grid_dimension
    }

    /// Patterns in registration order.
    #[inline]
    pub fn patterns(&self) -> &[MarkerPattern] {
        &self.patterns
    }

    pub fn get(&self, id: u32) -> Option<&MarkerPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric() -> Grid {
        Grid::from_rows(&["110", "001", "010"]).expect("valid rows")
    }

    #[test]
    fn variants_follow_generation_order() {
        let reference = asymmetric();
        let v = generate_variants(reference);
        assert_eq!(v.len(), 12);

        assert_eq!(v[0].grid, reference);
        assert_eq!(v[1].grid, reference.rotate_cw());
        assert_eq!(v[3].grid, reference.rotated(3));
        assert_eq!(v[4].grid, reference.flip_horizontal());
        assert_eq!(v[6].grid, reference.rotated(2).flip_horizontal());
        assert_eq!(v[9].grid, reference.rotate_cw().flip_vertical());

        for (i, variant) in v.iter().enumerate() {
            assert_eq!(variant.rotation.quarter_turns() as usize, i % 4);
        }
        assert_eq!(v[5].kind, VariantKind::FlippedHorizontal);
        assert_eq!(v[11].kind, VariantKind::FlippedVertical);
    }

    #[test]
    fn variant_generation_is_deterministic() {
        assert_eq!(
            generate_variants(asymmetric()),
            generate_variants(asymmetric())
        );
    }

    #[test]
    fn vertical_flips_repeat_horizontal_flips() {
        let p = MarkerPattern::new(1, asymmetric());
        assert_eq!(p.distinct_variant_count(), 8);
    }

    #[test]
    fn symmetric_reference_collapses_variants() {
        let plus = Grid::from_rows(&["010", "111", "010"]).expect("valid rows");
        assert_eq!(MarkerPattern::new(9, plus).distinct_variant_count(), 1);
    }

    #[test]
    fn builtin_library_has_four_markers() {
        let lib = PatternLibrary::builtin();
        assert_eq!(lib.grid_dimension(), 6);
        let ids: Vec<u32> = lib.patterns().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(
            lib.get(2).expect("marker 2").reference().to_rows(),
            vec!["000000", "010110", "001010", "000110", "000010", "000000"]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let g = asymmetric();
        let err = PatternLibrary::from_references(3, [(5, g), (5, g.rotate_cw())]).unwrap_err();
        assert!(matches!(err, PatternError::DuplicateId(5)));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let err = PatternLibrary::from_references(4, [(1, asymmetric())]).unwrap_err();
        assert!(matches!(
            err,
            PatternError::DimensionMismatch {
                id: 1,
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn json_round_trips_through_library_file() {
        let lib = PatternLibrary::builtin();
        let text = serde_json::to_string(&lib.to_file()).expect("serialize");
        let back = PatternLibrary::from_json_str(&text).expect("parse");
        assert_eq!(back.len(), lib.len());
        for (a, b) in lib.patterns().iter().zip(back.patterns()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.reference(), b.reference());
        }
    }

    #[test]
    fn json_row_count_mismatch_is_reported() {
        let text = r#"{"grid_dimension": 3, "patterns": [{"id": 1, "rows": ["000", "111"]}]}"#;
        assert!(matches!(
            PatternLibrary::from_json_str(text),
            Err(PatternError::RowCount {
                expected: 3,
                got: 2
            })
        ));
    }
}
