//! Error taxonomy for the map compiler core.
//!
//! Only fatal input problems are represented here. Recoverable classification
//! problems (unknown colours, cliffs without a mapping) are tallied in
//! [`crate::terrain::TerrainReport`] instead.

use crate::symmetry::Symmetry;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("cannot parse {what} as {mode}, accepting only RGB, RGBA or L (greyscale)")]
    UnsupportedColorMode { what: &'static str, mode: String },

    #[error("{what} is {found_w}x{found_h}, expected {expected_w}x{expected_h}")]
    DimensionMismatch {
        what: &'static str,
        expected_w: usize,
        expected_h: usize,
        found_w: usize,
        found_h: usize,
    },

    #[error("image is {width}x{height}, at least 2x2 is required")]
    TooSmall { width: usize, height: usize },

    #[error("unknown environment {0:?}, should be 'arizona', 'rockies' or 'urban'")]
    UnknownEnvironment(String),

    #[error("unknown symmetry {0:?}")]
    UnknownSymmetry(String),

    #[error("unsupported symmetry {symmetry} for player {player}")]
    UnsupportedSymmetry { symmetry: Symmetry, player: u32 },

    #[error("{what} value {value} does not fit the map format")]
    CoordinateOverflow { what: &'static str, value: usize },

    #[error("row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
