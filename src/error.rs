use thiserror::Error;

/// Failure modes of the fallible conversions on [`WideUint`](crate::WideUint).
///
/// Arithmetic itself never fails; overflow in operator overloads panics and
/// the `checked_*` family returns `None`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WideUintError {
    #[error("cannot parse integer from empty string")]
    Empty,
    #[error("invalid digit {character:?} at position {position}")]
    InvalidDigit { position: usize, character: char },
    #[error("number does not fit into {bits} bits")]
    Overflow { bits: u32 },
    #[error("unsupported radix {0}, expected a value in 2..=36")]
    UnsupportedRadix(u32),
    #[error("expected {expected} limbs, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
