use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlockDctError>;

#[derive(Debug, Error)]
pub enum BlockDctError {
    /// A matrix did not have the configured `expected x expected` shape.
    #[error("shape error: expected {expected}x{expected} matrix, got {rows}x{cols}")]
    Shape {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// Nested input rows of unequal length; `row` is the first one that differs from row 0.
    #[error("ragged matrix: row {row} has {actual} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A quantization divisor was zero or negative.
    #[error("invalid divisor {value} at ({row}, {col}): divisors must be strictly positive")]
    InvalidDivisor { row: usize, col: usize, value: i32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("source error: {0}")]
    Source(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
