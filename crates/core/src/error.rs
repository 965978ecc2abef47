//! Error types for terraclass

use thiserror::Error;

/// Main error type for terraclass operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unknown band: {0}")]
    UnknownBand(String),

    #[error("Band '{0}' already present in stack")]
    DuplicateBand(String),

    #[error("Band '{name}' does not share the stack grid")]
    BandMisaligned { name: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Class {class} has no training samples")]
    InsufficientTrainingData { class: u8 },

    #[error("Pixel budget exceeded: {pixels} valid pixels, budget {budget}")]
    BudgetExceeded { pixels: u64, budget: u64 },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for terraclass operations
pub type Result<T> = std::result::Result<T, Error>;
