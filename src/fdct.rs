use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::error::{BlockDctError, Result};
use crate::matrix::{CoefficientMatrix, Matrix, SampleMatrix};
use crate::rounding::RoundingPolicy;
use crate::sample_precision::SamplePrecision;

/// How the 2D sum is evaluated. Both produce the same coefficients up to floating-point noise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DctAlgorithm {
    /// The textbook double summation, O(N^4) per block.
    Direct,
    /// A 1D DCT over every row followed by one over every column, O(N^3) per block.
    #[default]
    Separable,
}

impl FromStr for DctAlgorithm {
    type Err = BlockDctError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "direct" => Ok(DctAlgorithm::Direct),
            "separable" => Ok(DctAlgorithm::Separable),
            other => Err(BlockDctError::InvalidConfig(format!(
                "unknown dct algorithm: {other}"
            ))),
        }
    }
}

impl fmt::Display for DctAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DctAlgorithm::Direct => write!(f, "direct"),
            DctAlgorithm::Separable => write!(f, "separable"),
        }
    }
}

/// Forward 2D DCT-II over `size x size` blocks.
///
/// `C(u,v) = a(u) a(v) (2/N) sum_x sum_y (s(x,y) - shift) cos((2x+1)u pi/2N) cos((2y+1)v pi/2N)`
/// with `a(0) = 1/sqrt(2)` and `a(k) = 1` otherwise. For `N = 8` the `2/N` factor is the
/// familiar `1/4`.
pub struct ForwardDct {
    size: usize,
    /// `table[u * size + x] = a(u) * cos((2x + 1) u pi / 2N)`
    table: Vec<f64>,
    precision: SamplePrecision,
    algorithm: DctAlgorithm,
    rounding: RoundingPolicy,
}

impl ForwardDct {
    fn norm_coeff(u: usize) -> f64 {
        match u {
            0 => (0.5f64).sqrt(),
            _ => 1.0,
        }
    }

    pub fn new(
        size: usize,
        precision: SamplePrecision,
        algorithm: DctAlgorithm,
        rounding: RoundingPolicy,
    ) -> Result<Self> {
        if size == 0 {
            return Err(BlockDctError::InvalidConfig(
                "block size must be at least 1".to_string(),
            ));
        }

        let n = size as f64;
        let mut table = vec![0.0; size * size];

        for u in 0..size {
            for x in 0..size {
                let angle = (2.0 * x as f64 + 1.0) * u as f64 * PI / (2.0 * n);
                table[u * size + x] = Self::norm_coeff(u) * angle.cos();
            }
        }

        Ok(Self {
            size,
            table,
            precision,
            algorithm,
            rounding,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn precision(&self) -> SamplePrecision {
        self.precision
    }

    pub fn algorithm(&self) -> DctAlgorithm {
        self.algorithm
    }

    fn scale(&self) -> f64 {
        2.0 / self.size as f64
    }

    /// Transforms one block of samples. Fails only when `samples` is not `size x size`.
    pub fn perform_fdct(&self, samples: &SampleMatrix) -> Result<CoefficientMatrix> {
        samples.ensure_shape(self.size)?;

        // shifted in f64, any i32 sample minus the shift is exact there
        let shift = self.precision.level_shift();
        let shifted: Vec<f64> = samples
            .as_slice()
            .iter()
            .map(|s| *s as f64 - shift as f64)
            .collect();

        trace!(
            "fdct on {}x{} block, shift {}, {} algorithm",
            self.size,
            self.size,
            shift,
            self.algorithm
        );

        let coefficients = match self.algorithm {
            DctAlgorithm::Direct => self.direct(&shifted),
            DctAlgorithm::Separable => self.separable(&shifted),
        };

        Ok(Matrix::from_vec(
            self.size,
            self.size,
            coefficients
                .into_iter()
                .map(|c| self.rounding.round(c))
                .collect(),
        ))
    }

    fn direct(&self, shifted: &[f64]) -> Vec<f64> {
        let n = self.size;
        let mut output = vec![0.0; n * n];

        for u in 0..n {
            for v in 0..n {
                let mut local_sum = 0.0;

                for x in 0..n {
                    for y in 0..n {
                        local_sum +=
                            shifted[x * n + y] * self.table[u * n + x] * self.table[v * n + y];
                    }
                }

                output[u * n + v] = self.scale() * local_sum;
            }
        }

        output
    }

    fn separable(&self, shifted: &[f64]) -> Vec<f64> {
        let n = self.size;

        // rows: temp[x][v] = sum_y s(x, y) * basis_v(y)
        let mut temp = vec![0.0; n * n];
        for x in 0..n {
            let row = &shifted[x * n..(x + 1) * n];
            for v in 0..n {
                let basis = &self.table[v * n..(v + 1) * n];
                temp[x * n + v] = row.iter().zip(basis).map(|(s, c)| s * c).sum();
            }
        }

        // columns: out[u][v] = sum_x basis_u(x) * temp[x][v]
        let mut output = vec![0.0; n * n];
        for u in 0..n {
            let basis = &self.table[u * n..(u + 1) * n];
            for v in 0..n {
                let local_sum: f64 = (0..n).map(|x| basis[x] * temp[x * n + v]).sum();
                output[u * n + v] = self.scale() * local_sum;
            }
        }

        output
    }
}
