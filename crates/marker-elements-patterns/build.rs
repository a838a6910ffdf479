//! Embed `data/builtin_markers.json` as packed `u64` grids.

use serde::Deserialize;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Deserialize)]
struct MarkerSet {
    grid_dimension: usize,
    patterns: Vec<MarkerEntry>,
}

#[derive(Deserialize)]
struct MarkerEntry {
    id: u32,
    rows: Vec<String>,
}

fn pack_rows(id: u32, n: usize, rows: &[String]) -> u64 {
    assert_eq!(rows.len(), n, "marker {id}: expected {n} rows");
    let mut bits = 0u64;
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count(), n, "marker {id}: row {y} must have {n} cells");
        for (x, c) in row.chars().enumerate() {
            match c {
                '1' | '#' => bits |= 1u64 << (y * n + x),
                '0' | '.' => {}
                other => panic!("marker {id}: invalid cell {other:?}"),
            }
        }
    }
    bits
}

fn main() {
    let manifest = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let src = manifest.join("data/builtin_markers.json");
    println!("cargo:rerun-if-changed={}", src.display());

    let text = std::fs::read_to_string(&src).expect("read builtin_markers.json");
    let set: MarkerSet = serde_json::from_str(&text).expect("parse builtin_markers.json");
    assert!(
        (1..=8).contains(&set.grid_dimension),
        "grid_dimension must be in 1..=8"
    );

    let mut out = String::new();
    let _ = writeln!(
        out,
        "/// Grid side length of the embedded marker set.\npub const BUILTIN_GRID_DIMENSION: usize = {};\n",
        set.grid_dimension
    );
    let _ = writeln!(
        out,
        "/// `(marker id, packed reference grid)` in registration order.\npub const BUILTIN_MARKERS: &[(u32, u64)] = &["
    );
    for entry in &set.patterns {
        let bits = pack_rows(entry.id, set.grid_dimension, &entry.rows);
        let _ = writeln!(out, "    ({}, 0x{:016x}),", entry.id, bits);
    }
    let _ = writeln!(out, "];");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("out dir"));
    std::fs::write(out_dir.join("builtins.rs"), out).expect("write builtins.rs");
}
