//! Cell-centre sampling of a rectified patch into a binary grid.

use marker_elements_core::GrayImageView;
use marker_elements_patterns::{Grid, PatternError};

/// Reads one pixel per cell of an N×N grid laid over a square patch.
///
/// Cell size is `floor(width / N)` and cell `(x, y)` is read at
/// `(x·cell + cell/2, y·cell + cell/2)`. Values at or above `cutoff` become
/// on cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSampler {
    blank: Grid,
    cutoff: u8,
}

impl GridSampler {
    pub fn new(dimension: usize, cutoff: u8) -> Result<Self, PatternError> {
        Ok(Self {
            blank: Grid::new(dimension)?,
            cutoff,
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.blank.dimension()
    }

    #[inline]
    pub fn cutoff(&self) -> u8 {
        self.cutoff
    }

    /// Sample positions along one axis, in pixels.
    pub fn cell_centers(&self, patch_size: usize) -> Vec<usize> {
        let n = self.dimension();
        let cell = patch_size / n;
        (0..n).map(|i| i * cell + cell / 2).collect()
    }

    /// Raw sampled values, row-major.
    pub fn sample_values(&self, patch: &GrayImageView<'_>) -> Vec<u8> {
        let xs = self.cell_centers(patch.width);
        let ys = self.cell_centers(patch.height);
        let mut out = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                out.push(if x < patch.width && y < patch.height {
                    patch.data[y * patch.width + x]
                } else {
                    0
                });
            }
        }
        out
    }

    pub fn normalize(&self, values: &[u8]) -> Grid {
        let n = self.dimension();
        let mut grid = self.blank;
        for (i, &v) in values.iter().take(n * n).enumerate() {
            grid.set(i % n, i / n, v >= self.cutoff);
        }
        grid
    }

    pub fn sample(&self, patch: &GrayImageView<'_>) -> Grid {
        self.normalize(&self.sample_values(patch))
    }
}
