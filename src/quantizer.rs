use log::trace;

use crate::error::{BlockDctError, Result};
use crate::matrix::{CoefficientMatrix, DivisorMatrix, Matrix, QuantizedMatrix};
use crate::rounding::RoundingPolicy;

pub struct Quantizer {
    size: usize,
    rounding: RoundingPolicy,
}

impl Quantizer {
    pub fn new(size: usize, rounding: RoundingPolicy) -> Self {
        Quantizer { size, rounding }
    }

    /// Checks that `divisors` is usable for this quantizer: `size x size` and strictly positive.
    /// The first offending entry in row-major order is reported.
    pub fn validate_divisors(&self, divisors: &DivisorMatrix) -> Result<()> {
        divisors.ensure_shape(self.size)?;

        match divisors.as_slice().iter().position(|d| *d <= 0) {
            None => Ok(()),
            Some(i) => Err(BlockDctError::InvalidDivisor {
                row: i / self.size,
                col: i % self.size,
                value: divisors.as_slice()[i],
            }),
        }
    }

    /// Divides every coefficient by its positional divisor and rounds. Nothing is divided until
    /// both matrices have passed validation.
    pub fn quantize(
        &self,
        coefficients: &CoefficientMatrix,
        divisors: &DivisorMatrix,
    ) -> Result<QuantizedMatrix> {
        coefficients.ensure_shape(self.size)?;
        self.validate_divisors(divisors)?;

        let quantized: Vec<i64> = coefficients
            .as_slice()
            .iter()
            .zip(divisors.as_slice())
            .map(|(c, d)| self.rounding.round(*c as f64 / *d as f64))
            .collect();

        trace!(
            "quantized {}x{} block, {} zero entries",
            self.size,
            self.size,
            quantized.iter().filter(|q| **q == 0).count()
        );

        Ok(Matrix::from_vec(self.size, self.size, quantized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant_tables::QuantTableId;
    use anyhow::Result;

    fn quantizer() -> Quantizer {
        Quantizer::new(8, RoundingPolicy::HalfAwayFromZero)
    }

    #[test]
    fn test_zero_coefficients_stay_zero() -> Result<()> {
        let zeros = Matrix::filled(8, 0);

        for id in QuantTableId::ALL {
            let got = quantizer().quantize(&zeros, &id.divisor_matrix(8)?)?;
            assert_eq!(got, zeros);
        }

        let ones = Matrix::filled(8, 1);
        assert_eq!(quantizer().quantize(&zeros, &ones)?, zeros);

        Ok(())
    }

    #[test]
    fn test_rounds_half_away_from_zero() -> Result<()> {
        let q = Quantizer::new(2, RoundingPolicy::HalfAwayFromZero);
        let coefficients = Matrix::from_rows(vec![vec![5, -5], vec![7, -14]])?;
        let divisors = Matrix::from_rows(vec![vec![2, 2], vec![3, 4]])?;

        let got = q.quantize(&coefficients, &divisors)?;
        assert_eq!(got.to_rows(), vec![vec![3, -3], vec![2, -4]]);

        Ok(())
    }

    #[test]
    fn test_larger_divisors_zero_more_entries() -> Result<()> {
        let coefficients = Matrix::from_fn(8, |u, v| 40 - 3 * (u + v) as i64);
        let fine = quantizer().quantize(&coefficients, &Matrix::filled(8, 2))?;
        let coarse = quantizer().quantize(&coefficients, &Matrix::filled(8, 64))?;

        assert!(coarse.count_zeros() > fine.count_zeros());

        Ok(())
    }

    #[test]
    fn test_wide_coefficients_are_not_clamped() -> Result<()> {
        let q = Quantizer::new(2, RoundingPolicy::HalfAwayFromZero);
        let coefficients =
            Matrix::from_rows(vec![vec![-17_179_870_208, 7_999_998_976], vec![0, 1]])?;
        let divisors = Matrix::from_rows(vec![vec![3, 1], vec![1, 1]])?;

        let got = q.quantize(&coefficients, &divisors)?;
        assert_eq!(
            got.to_rows(),
            vec![vec![-5_726_623_403, 7_999_998_976], vec![0, 1]]
        );

        Ok(())
    }

    #[test]
    fn test_zero_divisor_is_rejected() -> Result<()> {
        let mut rows = vec![vec![1; 8]; 8];
        rows[2][5] = 0;
        rows[6][1] = -4;
        let divisors = Matrix::from_rows(rows)?;

        let err = quantizer()
            .quantize(&Matrix::filled(8, 100), &divisors)
            .unwrap_err();
        assert!(matches!(
            err,
            BlockDctError::InvalidDivisor {
                row: 2,
                col: 5,
                value: 0
            }
        ));

        Ok(())
    }

    #[test]
    fn test_negative_divisor_is_rejected() -> Result<()> {
        let mut rows = vec![vec![3; 8]; 8];
        rows[7][7] = -1;
        let divisors = Matrix::from_rows(rows)?;

        let err = quantizer().validate_divisors(&divisors).unwrap_err();
        assert!(matches!(
            err,
            BlockDctError::InvalidDivisor {
                row: 7,
                col: 7,
                value: -1
            }
        ));

        Ok(())
    }

    #[test]
    fn test_shape_mismatch() -> Result<()> {
        let err = quantizer()
            .quantize(&Matrix::filled(7, 0), &Matrix::filled(8, 1))
            .unwrap_err();
        assert!(matches!(err, BlockDctError::Shape { expected: 8, rows: 7, .. }));

        let err = quantizer()
            .quantize(&Matrix::filled(8, 0), &Matrix::filled(4, 1))
            .unwrap_err();
        assert!(matches!(err, BlockDctError::Shape { expected: 8, rows: 4, .. }));

        Ok(())
    }
}
