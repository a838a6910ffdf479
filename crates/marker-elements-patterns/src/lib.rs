//! Marker grids, pattern libraries and matching.
//!
//! This crate focuses on:
//! - packed N×N binary grids and their rotations/reflections,
//! - a pattern library that expands each reference grid into its stored
//!   orientation variants once, at construction,
//! - first-match lookup of an observed grid against that library.
//!
//! It does **not** look at images. Grids come from the detector's sampler
//! (see `marker-elements-detect`) or from JSON library files.

pub mod builtins;
mod error;
mod grid;
mod library;
mod matcher;

pub use error::PatternError;
pub use grid::{Grid, Rotation, CELL_OFF, CELL_ON, MAX_GRID_DIMENSION};
pub use library::{
    generate_variants, MarkerPattern, PatternEntry, PatternLibrary, PatternLibraryFile, Variant,
    VariantKind,
};
pub use matcher::{Match, PatternMatcher};
