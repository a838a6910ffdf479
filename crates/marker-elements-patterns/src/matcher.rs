//! First-match lookup of observed grids.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Grid, PatternLibrary, Rotation, VariantKind};

/// A library match for an observed grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Marker id of the matched pattern.
    pub id: u32,
    /// Base rotation of the matched variant (flips report the rotation they
    /// were derived from).
    pub rotation: Rotation,
    /// Position of the matched variant in the pattern's variant list.
    pub variant_index: usize,
    pub kind: VariantKind,
}

/// Exact matcher over a shared, immutable [`PatternLibrary`].
///
/// This is first-match, not best-match: patterns are tried in registration
/// order and variants in generation order, and the first cell-for-cell equal
/// variant wins. If two patterns share a variant, the one registered first
/// is reported.
#[derive(Clone, Debug)]
pub struct PatternMatcher {
    library: Arc<PatternLibrary>,
}

impl PatternMatcher {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    #[inline]
    pub fn library(&self) -> &Arc<PatternLibrary> {
        &self.library
    }

    /// `None` when no variant of any pattern equals `observed`, including
    /// when the grid dimension differs from the library's.
    pub fn match_grid(&self, observed: &Grid) -> Option<Match> {
        if observed.dimension() != self.library.grid_dimension() {
            log::warn!(
                "observed {}x{} grid against a {}x{} library",
                observed.dimension(),
                observed.dimension(),
                self.library.grid_dimension(),
                self.library.grid_dimension()
            );
            return None;
        }

        self.library.patterns().iter().find_map(|pattern| {
            pattern
                .variants()
                .iter()
                .position(|v| v.grid == *observed)
                .map(|idx| {
                    let v = pattern.variants()[idx];
                    Match {
                        id: pattern.id(),
                        rotation: v.rotation,
                        variant_index: idx,
                        kind: v.kind,
                    }
                })
        })
    }
}
