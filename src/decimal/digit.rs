//! Single decimal digit.
//!
//! Each accumulator decade held one digit 0-9 on a ten-position ring
//! counter. Carries between decades are a separate wire, so digit
//! addition here returns the carry explicitly.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A single decimal digit (0-9).
///
/// Deserialization goes through `TryFrom<u8>`, so a snapshot holding an
/// out-of-range decade is rejected instead of silently corrupting the
/// register.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 9 {
            Ok(Digit(value))
        } else {
            Err(format!("invalid decimal digit: {} (must be 0-9)", value))
        }
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> u8 {
        digit.0
    }
}

impl Digit {
    /// The zero digit.
    pub const ZERO: Digit = Digit(0);

    /// The highest digit, 9.
    pub const NINE: Digit = Digit(9);

    /// Create a digit from a raw value.
    ///
    /// # Panics
    /// Panics if `value` is not in 0..=9.
    #[inline]
    pub fn new(value: u8) -> Self {
        assert!(value <= 9, "Invalid decimal digit: {} (must be 0-9)", value);
        Digit(value)
    }

    /// Get the raw value (0-9).
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Check if this digit is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two digits plus a carry-in, returning (sum digit, carry-out).
    ///
    /// The carry-out is always 0 or 1; 9 + 9 + 1 = 19 is the worst case.
    #[inline]
    pub fn full_add(self, other: Digit, carry: u8) -> (Digit, u8) {
        debug_assert!(carry <= 1, "carry-in must be 0 or 1, got {}", carry);
        let sum = self.0 + other.0 + carry;
        if sum >= 10 {
            (Digit(sum - 10), 1)
        } else {
            (Digit(sum), 0)
        }
    }

    /// Nines complement: 9 - digit.
    ///
    /// Complementing every decade and adding one produces the 10's
    /// complement, which is how the hardware subtracted.
    #[inline]
    pub const fn nines_complement(self) -> Digit {
        Digit(9 - self.0)
    }
}

impl fmt::Debug for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_new() {
        for v in 0..=9 {
            assert_eq!(Digit::new(v).value(), v);
        }
    }

    #[test]
    #[should_panic]
    fn test_digit_out_of_range() {
        Digit::new(10);
    }

    #[test]
    fn test_deserialize_checks_range() {
        assert_eq!(serde_json::from_str::<Digit>("9").unwrap(), Digit::NINE);
        assert!(serde_json::from_str::<Digit>("10").is_err());
        assert!(serde_json::from_str::<Digit>("200").is_err());
    }

    #[test]
    fn test_full_add_no_carry() {
        let (sum, carry) = Digit::new(3).full_add(Digit::new(4), 0);
        assert_eq!(sum.value(), 7);
        assert_eq!(carry, 0);
    }

    #[test]
    fn test_full_add_with_carry() {
        let (sum, carry) = Digit::new(7).full_add(Digit::new(5), 0);
        assert_eq!(sum.value(), 2);
        assert_eq!(carry, 1);

        // Worst case: 9 + 9 + 1
        let (sum, carry) = Digit::NINE.full_add(Digit::NINE, 1);
        assert_eq!(sum.value(), 9);
        assert_eq!(carry, 1);
    }

    #[test]
    fn test_nines_complement() {
        for v in 0..=9 {
            let d = Digit::new(v);
            assert_eq!(d.nines_complement().value(), 9 - v);
            assert_eq!(d.nines_complement().nines_complement(), d);
        }
    }
}
