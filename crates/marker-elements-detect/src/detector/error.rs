use marker_elements_core::FrameError;
use marker_elements_patterns::PatternError;

/// Errors returned by the marker detector.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid detector parameters: {0}")]
    InvalidParams(String),
    #[error("malformed frame: {0}")]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("detector samples {params}x{params} grids but the library holds {library}x{library}")]
    LibraryDimension { params: usize, library: usize },
    #[error("failed to read detector parameters: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse detector parameters: {0}")]
    Json(#[from] serde_json::Error),
}
