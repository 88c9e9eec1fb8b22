use crate::error::{BlockDctError, Result};

/// Bit depth of the input samples.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum SamplePrecision {
    #[default]
    EightBit,
    TwelveBit,
    SixteenBit,
}

impl SamplePrecision {
    pub fn parse(number_of_bits: u8) -> Result<Self> {
        match number_of_bits {
            8 => Ok(SamplePrecision::EightBit),
            12 => Ok(SamplePrecision::TwelveBit),
            16 => Ok(SamplePrecision::SixteenBit),
            other => Err(BlockDctError::InvalidConfig(format!(
                "unsupported sample precision: {other} bits"
            ))),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            SamplePrecision::EightBit => 8,
            SamplePrecision::TwelveBit => 12,
            SamplePrecision::SixteenBit => 16,
        }
    }

    /// Subtracted from every sample before the transform so unsigned samples are centered on
    /// zero: `1 << (bits - 1)`.
    pub fn level_shift(&self) -> i32 {
        1 << (self.bits() - 1)
    }

    pub fn max_value(&self) -> i32 {
        (1 << self.bits()) - 1
    }
}
