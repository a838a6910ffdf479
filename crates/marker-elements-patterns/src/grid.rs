//! Packed binary grids and their dihedral transforms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PatternError;

/// Largest supported grid side (an 8×8 grid fills a `u64`).
pub const MAX_GRID_DIMENSION: usize = 8;

/// Cell value written for "on" cells when a grid is rendered as bytes.
pub const CELL_ON: u8 = 255;
/// Cell value written for "off" cells.
pub const CELL_OFF: u8 = 0;

/// N×N binary matrix.
///
/// Bits are stored in row-major order (`idx = y * N + x`) with **on = 1**.
/// Bits beyond `N * N` are always zero, so equality of two grids of the same
/// dimension is equality of their packed codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    dimension: usize,
    bits: u64,
}

impl Grid {
    /// All-off grid.
    pub fn new(dimension: usize) -> Result<Self, PatternError> {
        check_dimension(dimension)?;
        Ok(Self { dimension, bits: 0 })
    }

    pub fn from_bits(dimension: usize, bits: u64) -> Result<Self, PatternError> {
        check_dimension(dimension)?;
        if bits & !cell_mask(dimension) != 0 {
            return Err(PatternError::BitsOutOfRange { dimension, bits });
        }
        Ok(Self { dimension, bits })
    }

    /// Caller guarantees `dimension` is supported and `bits` fits.
    pub(crate) const fn from_raw(dimension: usize, bits: u64) -> Self {
        Self { dimension, bits }
    }

    /// Parse text rows: `'1'`/`'#'` is on, `'0'`/`'.'` is off.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, PatternError> {
        let dimension = rows.len();
        check_dimension(dimension)?;
        let mut grid = Self { dimension, bits: 0 };
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != dimension {
                return Err(PatternError::RowLength {
                    row: y,
                    expected: dimension,
                    got: len,
                });
            }
            for (x, c) in row.chars().enumerate() {
                match c {
                    '1' | '#' => grid.set(x, y, true),
                    '0' | '.' => {}
                    cell => return Err(PatternError::InvalidCell { row: y, cell }),
                }
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.dimension && y < self.dimension);
        (self.bits >> (y * self.dimension + x)) & 1 == 1
    }

    /// Cell as a byte: [`CELL_ON`] or [`CELL_OFF`].
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> u8 {
        if self.get(x, y) {
            CELL_ON
        } else {
            CELL_OFF
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        debug_assert!(x < self.dimension && y < self.dimension);
        let bit = 1u64 << (y * self.dimension + x);
        if on {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    /// Rotate 90° clockwise: column 0 becomes row 0 reversed.
    pub fn rotate_cw(&self) -> Self {
        let n = self.dimension;
        self.remap(|x, y| (y, n - 1 - x))
    }

    /// Apply `quarter_turns` clockwise rotations (mod 4).
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        (0..quarter_turns & 3).fold(*self, |g, _| g.rotate_cw())
    }

    /// Reverse column order in every row.
    pub fn flip_horizontal(&self) -> Self {
        let n = self.dimension;
        self.remap(|x, y| (n - 1 - x, y))
    }

    /// Reverse row order.
    pub fn flip_vertical(&self) -> Self {
        let n = self.dimension;
        self.remap(|x, y| (x, n - 1 - y))
    }

    /// Text rows using `'1'`/`'0'`.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.dimension)
            .map(|y| {
                (0..self.dimension)
                    .map(|x| if self.get(x, y) { '1' } else { '0' })
                    .collect()
            })
            .collect()
    }

    /// Build the grid whose cell `(x, y)` is this grid's cell `src(x, y)`.
    fn remap(&self, src: impl Fn(usize, usize) -> (usize, usize)) -> Self {
        let n = self.dimension;
        let mut bits = 0u64;
        for y in 0..n {
            for x in 0..n {
                let (sx, sy) = src(x, y);
                bits |= ((self.bits >> (sy * n + sx)) & 1) << (y * n + x);
            }
        }
        Self {
            dimension: n,
            bits,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.to_rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Grid::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

/// In-plane marker rotation in quarter turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Quarter turns are taken modulo 4.
    pub fn from_quarter_turns(quarter_turns: u8) -> Self {
        Self::ALL[(quarter_turns & 3) as usize]
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = PatternError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(PatternError::InvalidRotation(other)),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

fn check_dimension(dimension: usize) -> Result<(), PatternError> {
    if (1..=MAX_GRID_DIMENSION).contains(&dimension) {
        Ok(())
    } else {
        Err(PatternError::InvalidDimension(dimension))
    }
}

fn cell_mask(dimension: usize) -> u64 {
    let cells = dimension * dimension;
    if cells >= 64 {
        u64::MAX
    } else {
        (1u64 << cells) - 1
    }
}
