use std::fmt;
use std::str::FromStr;

use crate::error::{BlockDctError, Result};
use crate::matrix::{DivisorMatrix, Matrix};

// 8x8
pub const QUANT_TABLE_WIDTH: usize = 8;

/// Alternate perceptual table: keeps a handful of low frequencies and crushes everything else,
/// including the DC term.
#[rustfmt::skip]
const PERCEPTUAL_TABLE: [u16; 64] = [
    255, 255, 255, 255, 255, 255, 255, 255,
    55, 60, 60, 70, 95, 130, 255, 255,
    70, 65, 80, 120, 200, 255, 255, 255,
    70, 85, 110, 145, 255, 255, 255, 255,
    90, 110, 185, 255, 255, 255, 255, 255,
    120, 175, 255, 255, 255, 255, 255, 255,
    245, 255, 255, 255, 255, 255, 255, 255,
    255, 255, 255, 255, 255, 255, 255, 255,
];

/// ITU-T T.81 Annex K.1 luminance table, natural (row-major) order.
#[rustfmt::skip]
const JPEG_LUMINANCE_TABLE: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// ITU-T T.81 Annex K.2 chrominance table, natural (row-major) order.
#[rustfmt::skip]
const JPEG_CHROMINANCE_TABLE: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// The divisor tables a pipeline can be configured with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QuantTableId {
    /// `3 + 2 * (u + v)`, defined for every block size.
    #[default]
    LinearRamp,
    Perceptual,
    JpegLuminance,
    JpegChrominance,
}

impl QuantTableId {
    pub const ALL: [QuantTableId; 4] = [
        QuantTableId::LinearRamp,
        QuantTableId::Perceptual,
        QuantTableId::JpegLuminance,
        QuantTableId::JpegChrominance,
    ];

    fn fixed_table(&self) -> Option<&'static [u16; 64]> {
        match self {
            QuantTableId::LinearRamp => None,
            QuantTableId::Perceptual => Some(&PERCEPTUAL_TABLE),
            QuantTableId::JpegLuminance => Some(&JPEG_LUMINANCE_TABLE),
            QuantTableId::JpegChrominance => Some(&JPEG_CHROMINANCE_TABLE),
        }
    }

    /// The unscaled divisor matrix for a `size x size` block. The fixed tables only exist at
    /// 8x8; any other size is a shape error.
    pub fn divisor_matrix(&self, size: usize) -> Result<DivisorMatrix> {
        match self.fixed_table() {
            None => Ok(Matrix::from_fn(size, |u, v| 3 + 2 * (u + v) as i32)),
            Some(table) => {
                if size != QUANT_TABLE_WIDTH {
                    return Err(BlockDctError::Shape {
                        expected: size,
                        rows: QUANT_TABLE_WIDTH,
                        cols: QUANT_TABLE_WIDTH,
                    });
                }

                Ok(Matrix::from_fn(size, |u, v| {
                    table[u * QUANT_TABLE_WIDTH + v] as i32
                }))
            }
        }
    }

    /// Like [`divisor_matrix`](Self::divisor_matrix), with every entry scaled by the libjpeg
    /// quality curve and clamped to `1..=255`. Quality 50 leaves the table unchanged.
    pub fn divisor_matrix_with_quality(&self, size: usize, quality: u8) -> Result<DivisorMatrix> {
        if !(1..=100).contains(&quality) {
            return Err(BlockDctError::InvalidConfig(format!(
                "quality {quality} out of range 1-100"
            )));
        }

        let scale = match quality < 50 {
            true => 5000 / quality as i32,
            false => 200 - 2 * quality as i32,
        };

        Ok(self
            .divisor_matrix(size)?
            .map(|d| ((d * scale + 50) / 100).clamp(1, 255)))
    }
}

impl FromStr for QuantTableId {
    type Err = BlockDctError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear-ramp" => Ok(QuantTableId::LinearRamp),
            "perceptual" => Ok(QuantTableId::Perceptual),
            "jpeg-luminance" => Ok(QuantTableId::JpegLuminance),
            "jpeg-chrominance" => Ok(QuantTableId::JpegChrominance),
            other => Err(BlockDctError::InvalidConfig(format!(
                "unknown quantization table: {other}"
            ))),
        }
    }
}

impl fmt::Display for QuantTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuantTableId::LinearRamp => "linear-ramp",
            QuantTableId::Perceptual => "perceptual",
            QuantTableId::JpegLuminance => "jpeg-luminance",
            QuantTableId::JpegChrominance => "jpeg-chrominance",
        };

        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_linear_ramp() -> Result<()> {
        let table = QuantTableId::LinearRamp.divisor_matrix(8)?;

        assert_eq!(table.row(0), &[3, 5, 7, 9, 11, 13, 15, 17]);
        assert_eq!(table.row(7), &[17, 19, 21, 23, 25, 27, 29, 31]);

        let small = QuantTableId::LinearRamp.divisor_matrix(2)?;
        assert_eq!(small.to_rows(), vec![vec![3, 5], vec![5, 7]]);

        Ok(())
    }

    #[test]
    fn test_tables_are_positive() -> Result<()> {
        for id in QuantTableId::ALL {
            let table = id.divisor_matrix(8)?;
            assert!(table.as_slice().iter().all(|d| *d > 0), "{id} has a non-positive entry");
        }

        Ok(())
    }

    #[test]
    fn test_linear_ramp_is_monotonic() -> Result<()> {
        let table = QuantTableId::LinearRamp.divisor_matrix(8)?;

        for u in 0..8 {
            for v in 1..8 {
                assert!(table.get(u, v) > table.get(u, v - 1));
                assert!(table.get(v, u) > table.get(v - 1, u));
            }
        }

        Ok(())
    }

    #[test]
    fn test_fixed_tables_only_at_eight() {
        for id in [
            QuantTableId::Perceptual,
            QuantTableId::JpegLuminance,
            QuantTableId::JpegChrominance,
        ] {
            assert!(matches!(
                id.divisor_matrix(16),
                Err(BlockDctError::Shape { expected: 16, .. })
            ));
        }
    }

    #[test]
    fn test_quality_scaling() -> Result<()> {
        let base = QuantTableId::JpegLuminance.divisor_matrix(8)?;
        let q50 = QuantTableId::JpegLuminance.divisor_matrix_with_quality(8, 50)?;
        assert_eq!(base, q50);

        let q100 = QuantTableId::JpegLuminance.divisor_matrix_with_quality(8, 100)?;
        assert!(q100.as_slice().iter().all(|d| *d == 1));

        let q1 = QuantTableId::JpegLuminance.divisor_matrix_with_quality(8, 1)?;
        assert!(q1.as_slice().iter().all(|d| *d == 255));

        let q75 = QuantTableId::JpegLuminance.divisor_matrix_with_quality(8, 75)?;
        assert_eq!(q75.get(0, 0), 8);

        assert!(matches!(
            QuantTableId::LinearRamp.divisor_matrix_with_quality(8, 0),
            Err(BlockDctError::InvalidConfig(_))
        ));
        assert!(QuantTableId::LinearRamp
            .divisor_matrix_with_quality(8, 101)
            .is_err());

        Ok(())
    }

    #[test]
    fn test_names_round_trip() -> Result<()> {
        for id in QuantTableId::ALL {
            assert_eq!(id.to_string().parse::<QuantTableId>()?, id);
        }
        assert!("zigzag".parse::<QuantTableId>().is_err());

        Ok(())
    }
}
