//! Fixed-width signed decimal words.
//!
//! A `DecimalWord` is the register format of an ENIAC accumulator:
//! ten decimal digits plus a sign. The machine carried sign separately
//! from the decades (the PM counter), so this is sign-magnitude, not a
//! complement encoding; the 10's complement appears only transiently
//! during subtraction (see `arith`).

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::decimal::Digit;

/// Sign of a decimal word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sign {
    /// Positive (the PM counter at P).
    #[default]
    Plus,
    /// Negative (the PM counter at M).
    Minus,
}

impl Sign {
    /// Flip the sign.
    #[inline]
    pub fn flipped(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
}

/// A 10-digit signed decimal word.
///
/// Used for:
/// - Accumulator registers (the ENIAC had 20 of these)
/// - Multiplier operand latches and the partial product
/// - Values travelling on digit trunks
///
/// Value range: -9,999,999,999 to +9,999,999,999.
///
/// Invariant: zero is always stored with a `Plus` sign, so equal values
/// compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DecimalWord {
    /// Digits stored from least significant (index 0) to most significant
    /// (index 9).
    digits: [Digit; 10],
    /// Separate sign register.
    sign: Sign,
}

impl DecimalWord {
    /// Number of decades in a word.
    pub const WIDTH: usize = 10;

    /// Maximum magnitude: all nines.
    pub const MAX: i64 = 9_999_999_999;

    /// Minimum value.
    pub const MIN: i64 = -9_999_999_999;

    /// Create a word holding zero.
    #[inline]
    pub const fn zero() -> Self {
        Self { digits: [Digit::ZERO; 10], sign: Sign::Plus }
    }

    /// Create a word from a digit array (LSB first) and a sign.
    ///
    /// A zero magnitude is normalized to `Plus`.
    pub fn from_parts(digits: [Digit; 10], sign: Sign) -> Self {
        let mut word = Self { digits, sign };
        if word.magnitude_is_zero() {
            word.sign = Sign::Plus;
        }
        word
    }

    /// Get the underlying digit array.
    #[inline]
    pub const fn digits(&self) -> &[Digit; 10] {
        &self.digits
    }

    /// Get a single digit by decade index (0 = least significant).
    #[inline]
    pub const fn digit(&self, index: usize) -> Digit {
        self.digits[index]
    }

    /// Get the sign.
    #[inline]
    pub const fn sign(&self) -> Sign {
        self.sign
    }

    /// Create from a decimal integer.
    ///
    /// # Panics
    /// Panics if value is outside the range of ten decades.
    pub fn from_i64(value: i64) -> Self {
        assert!(
            value >= Self::MIN && value <= Self::MAX,
            "Value {} out of range for DecimalWord [{}, {}]",
            value, Self::MIN, Self::MAX
        );

        let sign = if value < 0 { Sign::Minus } else { Sign::Plus };
        let mut magnitude = value.unsigned_abs();
        let mut digits = [Digit::ZERO; 10];
        for d in digits.iter_mut() {
            *d = Digit::new((magnitude % 10) as u8);
            magnitude /= 10;
        }

        Self::from_parts(digits, sign)
    }

    /// Convert to a decimal integer.
    pub fn to_i64(&self) -> i64 {
        let mut magnitude: i64 = 0;
        for i in (0..10).rev() {
            magnitude = magnitude * 10 + i64::from(self.digits[i].value());
        }
        match self.sign {
            Sign::Plus => magnitude,
            Sign::Minus => -magnitude,
        }
    }

    /// Check if the magnitude digits are all zero.
    pub fn magnitude_is_zero(&self) -> bool {
        self.digits.iter().all(|d| d.is_zero())
    }

    /// Check if this word is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.magnitude_is_zero()
    }

    /// Negate: same magnitude, flipped sign. Zero stays `Plus`.
    pub fn negated(&self) -> Self {
        Self::from_parts(self.digits, self.sign.flipped())
    }
}

impl fmt::Debug for DecimalWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalWord({} = {})", self, self.to_i64())
    }
}

impl fmt::Display for DecimalWord {
    /// Panel format: sign followed by all ten decades, most significant
    /// first, e.g. `+0000000042`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Sign::Plus => write!(f, "+")?,
            Sign::Minus => write!(f, "-")?,
        }
        for i in (0..10).rev() {
            write!(f, "{}", self.digits[i])?;
        }
        Ok(())
    }
}

impl std::ops::Neg for DecimalWord {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}
