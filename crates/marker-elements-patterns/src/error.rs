/// Errors raised while building grids and pattern libraries.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    #[error("grid dimension {0} is unsupported (expected 1..=8)")]
    InvalidDimension(usize),
    #[error("expected {expected} rows, got {got}")]
    RowCount { expected: usize, got: usize },
    #[error("row {row} has {got} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("invalid cell {cell:?} in row {row} (use '1'/'#' for on, '0'/'.' for off)")]
    InvalidCell { row: usize, cell: char },
    #[error("grid bits 0x{bits:x} exceed a {dimension}x{dimension} grid")]
    BitsOutOfRange { dimension: usize, bits: u64 },
    #[error("marker id {0} is registered twice")]
    DuplicateId(u32),
    #[error("pattern {id} is {got}x{got}, library expects {expected}x{expected}")]
    DimensionMismatch { id: u32, expected: usize, got: usize },
    #[error("rotation must be one of 0, 90, 180, 270 degrees (got {0})")]
    InvalidRotation(u16),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
