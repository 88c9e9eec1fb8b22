use std::fs::File;
use std::path::Path;

use log::debug;
use memmap::Mmap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BlockDctError, Result};
use crate::matrix::{Matrix, SampleMatrix};
use crate::sample_precision::SamplePrecision;

/// A natural-image 8x8 luminance block used as the fixed input and as the regression fixture.
pub const REFERENCE_BLOCK: [[i32; 8]; 8] = [
    [140, 144, 147, 140, 140, 155, 179, 175],
    [144, 152, 140, 147, 140, 148, 167, 179],
    [152, 155, 136, 167, 163, 162, 152, 172],
    [168, 145, 156, 160, 152, 155, 136, 160],
    [162, 148, 156, 148, 140, 136, 147, 162],
    [147, 167, 140, 155, 155, 140, 136, 162],
    [136, 156, 123, 167, 162, 144, 140, 147],
    [148, 155, 136, 155, 152, 147, 147, 136],
];

/// Something that hands out sample blocks. The value range is the source's business; the
/// pipeline only checks shape.
pub trait BlockSource {
    /// The next `size x size` block, or `None` once the source has run dry.
    fn next_block(&mut self, size: usize) -> Result<Option<SampleMatrix>>;

    /// The bit depth the samples were produced at, when the source knows it.
    fn sample_precision(&self) -> Option<SamplePrecision> {
        None
    }
}

/// Yields the same block forever.
pub struct FixedSource {
    block: SampleMatrix,
    precision: Option<SamplePrecision>,
}

impl FixedSource {
    pub fn new(block: SampleMatrix) -> Self {
        FixedSource {
            block,
            precision: None,
        }
    }

    pub fn reference() -> Self {
        let data = REFERENCE_BLOCK.iter().flatten().copied().collect();
        FixedSource {
            block: Matrix::from_vec(8, 8, data),
            precision: Some(SamplePrecision::EightBit),
        }
    }
}

impl BlockSource for FixedSource {
    fn next_block(&mut self, size: usize) -> Result<Option<SampleMatrix>> {
        self.block.ensure_shape(size)?;
        Ok(Some(self.block.clone()))
    }

    fn sample_precision(&self) -> Option<SamplePrecision> {
        self.precision
    }
}

/// Uniform samples over the full range of `precision`. Two sources built with the same seed
/// produce the same blocks.
pub struct RandomSource {
    rng: StdRng,
    precision: SamplePrecision,
}

impl RandomSource {
    pub fn new(seed: u64, precision: SamplePrecision) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
            precision,
        }
    }
}

impl BlockSource for RandomSource {
    fn next_block(&mut self, size: usize) -> Result<Option<SampleMatrix>> {
        let max = self.precision.max_value();
        let data = (0..size * size)
            .map(|_| self.rng.gen_range(0..=max))
            .collect();

        Ok(Some(Matrix::from_vec(size, size, data)))
    }

    fn sample_precision(&self) -> Option<SamplePrecision> {
        Some(self.precision)
    }
}

/// Raw unsigned 8-bit samples read straight from a file, `size * size` bytes per block in
/// row-major order.
pub struct RawFileSource {
    // zero-length files cannot be mapped
    mmap: Option<Mmap>,
    cursor: usize,
}

impl RawFileSource {
    pub fn from_file(file: File) -> Result<Self> {
        let mmap = match file.metadata()?.len() {
            0 => None,
            _ => Some(unsafe { Mmap::map(&file)? }),
        };

        Ok(RawFileSource { mmap, cursor: 0 })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let source = RawFileSource::from_file(file)?;
        debug!("mapped {} ({} bytes)", path.display(), source.len());

        Ok(source)
    }

    fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockSource for RawFileSource {
    fn next_block(&mut self, size: usize) -> Result<Option<SampleMatrix>> {
        let block_len = size * size;
        let remaining = self.len() - self.cursor;

        if remaining == 0 {
            return Ok(None);
        }

        if remaining < block_len {
            return Err(BlockDctError::Source(format!(
                "truncated block at offset {}: need {} bytes, {} left",
                self.cursor, block_len, remaining
            )));
        }

        let data = self.bytes()[self.cursor..self.cursor + block_len]
            .iter()
            .map(|b| *b as i32)
            .collect();
        self.cursor += block_len;

        Ok(Some(Matrix::from_vec(size, size, data)))
    }

    fn sample_precision(&self) -> Option<SamplePrecision> {
        Some(SamplePrecision::EightBit)
    }
}
