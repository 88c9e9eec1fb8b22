/// The forward transform: samples in, rounded DCT-II coefficients out.
pub mod fdct;

/// Divides coefficients by a positional divisor table; this is where the loss happens.
pub mod quantizer;

pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod presenter;
pub mod quant_tables;
pub mod rounding;
pub mod sample_precision;
pub mod source;

pub use error::{BlockDctError, Result};
pub use fdct::{DctAlgorithm, ForwardDct};
pub use matrix::{CoefficientMatrix, DivisorMatrix, Matrix, QuantizedMatrix, SampleMatrix};
pub use pipeline::{BlockResult, Pipeline, PipelineConfig};
pub use quant_tables::QuantTableId;
pub use quantizer::Quantizer;
pub use sample_precision::SamplePrecision;
