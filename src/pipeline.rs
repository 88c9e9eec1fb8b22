use log::debug;
use rayon::prelude::*;

use crate::error::{BlockDctError, Result};
use crate::fdct::{DctAlgorithm, ForwardDct};
use crate::matrix::{CoefficientMatrix, DivisorMatrix, QuantizedMatrix, SampleMatrix};
use crate::quant_tables::QuantTableId;
use crate::quantizer::Quantizer;
use crate::rounding::RoundingPolicy;
use crate::sample_precision::SamplePrecision;
use crate::source::BlockSource;

const BLOCKS_PER_THREAD: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Side length N of every block.
    pub block_size: usize,
    pub precision: SamplePrecision,
    pub table: QuantTableId,
    /// libjpeg-style quality applied to `table`; `None` uses the table as is.
    pub quality: Option<u8>,
    pub algorithm: DctAlgorithm,
    pub rounding: RoundingPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            block_size: 8,
            precision: SamplePrecision::EightBit,
            table: QuantTableId::LinearRamp,
            quality: None,
            algorithm: DctAlgorithm::Separable,
            rounding: RoundingPolicy::HalfAwayFromZero,
        }
    }
}

impl PipelineConfig {
    pub fn divisor_matrix(&self) -> Result<DivisorMatrix> {
        match self.quality {
            None => self.table.divisor_matrix(self.block_size),
            Some(quality) => self
                .table
                .divisor_matrix_with_quality(self.block_size, quality),
        }
    }
}

/// Every intermediate matrix of one block's trip through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockResult {
    pub samples: SampleMatrix,
    pub coefficients: CoefficientMatrix,
    pub quantized: QuantizedMatrix,
}

/// Forward DCT followed by quantization against one fixed divisor matrix.
pub struct Pipeline {
    fdct: ForwardDct,
    quantizer: Quantizer,
    divisors: DivisorMatrix,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let divisors = config.divisor_matrix()?;
        Self::with_divisors(config, divisors)
    }

    /// Builds a pipeline around a caller-supplied divisor matrix instead of a named table.
    /// The matrix is validated here so a bad table never reaches a block.
    pub fn with_divisors(config: &PipelineConfig, divisors: DivisorMatrix) -> Result<Self> {
        let fdct = ForwardDct::new(
            config.block_size,
            config.precision,
            config.algorithm,
            config.rounding,
        )?;
        let quantizer = Quantizer::new(config.block_size, config.rounding);
        quantizer.validate_divisors(&divisors)?;

        debug!(
            "pipeline ready: {n}x{n} blocks, {} bit samples, {} dct",
            config.precision.bits(),
            config.algorithm,
            n = config.block_size,
        );

        Ok(Pipeline {
            fdct,
            quantizer,
            divisors,
        })
    }

    pub fn block_size(&self) -> usize {
        self.fdct.size()
    }

    pub fn divisors(&self) -> &DivisorMatrix {
        &self.divisors
    }

    pub fn transform(&self, samples: &SampleMatrix) -> Result<CoefficientMatrix> {
        self.fdct.perform_fdct(samples)
    }

    pub fn quantize(&self, coefficients: &CoefficientMatrix) -> Result<QuantizedMatrix> {
        self.quantizer.quantize(coefficients, &self.divisors)
    }

    pub fn process(&self, samples: SampleMatrix) -> Result<BlockResult> {
        let coefficients = self.transform(&samples)?;
        let quantized = self.quantize(&coefficients)?;

        Ok(BlockResult {
            samples,
            coefficients,
            quantized,
        })
    }

    /// Processes independent blocks in parallel. Results come back in input order; the first
    /// failing block fails the whole batch.
    pub fn process_blocks(&self, blocks: Vec<SampleMatrix>) -> Result<Vec<BlockResult>> {
        let results: Result<Vec<_>> = blocks
            .into_par_iter()
            .map(|samples| self.process(samples))
            .collect();
        let results = results?;

        debug!(
            "processed {} blocks, {} zero coefficients after quantization",
            results.len(),
            results
                .iter()
                .map(|r| r.quantized.count_zeros())
                .sum::<usize>()
        );

        Ok(results)
    }

    /// Blocks pulled from a source per parallel batch.
    pub fn batch_len(&self) -> usize {
        rayon::current_num_threads() * BLOCKS_PER_THREAD
    }

    /// Rejects a source whose samples were produced at a different bit depth than the pipeline
    /// shifts for.
    fn check_source(&self, source: &dyn BlockSource) -> Result<()> {
        match source.sample_precision() {
            Some(native) if native != self.fdct.precision() => {
                Err(BlockDctError::InvalidConfig(format!(
                    "source yields {} bit samples, pipeline is configured for {} bits",
                    native.bits(),
                    self.fdct.precision().bits()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Pulls up to `count` blocks from `source` in bounded batches, processes each batch in
    /// parallel and hands the results to `sink` in source order. Returns the number of blocks
    /// processed, which is less than `count` when the source runs dry.
    pub fn run_each<F>(
        &self,
        source: &mut dyn BlockSource,
        count: usize,
        mut sink: F,
    ) -> Result<usize>
    where
        F: FnMut(BlockResult) -> Result<()>,
    {
        self.check_source(source)?;

        let batch_len = self.batch_len();
        let mut processed = 0;

        while processed < count {
            let wanted = batch_len.min(count - processed);
            let mut blocks = Vec::with_capacity(wanted);

            while blocks.len() < wanted {
                match source.next_block(self.block_size())? {
                    Some(block) => blocks.push(block),
                    None => break,
                }
            }

            let exhausted = blocks.len() < wanted;
            for result in self.process_blocks(blocks)? {
                processed += 1;
                sink(result)?;
            }

            if exhausted {
                break;
            }
        }

        Ok(processed)
    }

    /// Like [`run_each`](Self::run_each), collecting every result.
    pub fn run(&self, source: &mut dyn BlockSource, count: usize) -> Result<Vec<BlockResult>> {
        let mut results = Vec::new();
        self.run_each(source, count, |result| {
            results.push(result);
            Ok(())
        })?;

        Ok(results)
    }
}
