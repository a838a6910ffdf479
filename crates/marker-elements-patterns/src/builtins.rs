//! Embedded built-in marker set.
//!
//! The source-of-truth lives in `marker-elements-patterns/data/builtin_markers.json`.

#![allow(clippy::unreadable_literal)]

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));
