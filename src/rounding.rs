/// How a real-valued stage output is brought back to an integer.
///
/// The transform and the quantizer both round through this one type, so a block that goes
/// through the whole pipeline is rounded the same way at every step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    /// Nearest integer, ties go outward: `2.5 -> 3`, `-2.5 -> -3`.
    #[default]
    HalfAwayFromZero,
}

impl RoundingPolicy {
    /// Rounds to an `i64`. Every coefficient of an `i32` block stays far below `2^53`, so the
    /// conversion is exact for all values the pipeline produces.
    pub fn round(&self, value: f64) -> i64 {
        match self {
            // f64::round breaks ties away from zero regardless of the FPU rounding mode
            RoundingPolicy::HalfAwayFromZero => value.round() as i64,
        }
    }
}
