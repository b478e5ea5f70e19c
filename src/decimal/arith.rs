//! Multi-decade decimal arithmetic.
//!
//! Provides the ripple-carry addition, 10's-complement subtraction and
//! shift-and-add multiplication that the functional units perform one
//! digit pulse at a time. Overflow past the tenth decade is truncated,
//! as on the real hardware.

use serde::{Serialize, Deserialize};
use crate::decimal::{Digit, DecimalWord, Sign};

/// Add two magnitudes digit-wise with ripple carry, returning
/// (digits, carry-out). A carry out of the top decade is lost by the
/// caller unless it cares (subtraction does).
fn add_magnitude(a: &[Digit; 10], b: &[Digit; 10]) -> ([Digit; 10], u8) {
    let mut result = [Digit::ZERO; 10];
    let mut carry = 0u8;

    for i in 0..10 {
        let (sum, new_carry) = a[i].full_add(b[i], carry);
        result[i] = sum;
        carry = new_carry;
    }

    (result, carry)
}

/// 10's complement of a magnitude: nines-complement every decade, then
/// add one. The complement of zero is zero (the +1 carry wraps off the
/// top decade).
fn tens_complement(a: &[Digit; 10]) -> [Digit; 10] {
    let mut result = [Digit::ZERO; 10];
    let mut carry = 1u8;

    for i in 0..10 {
        let (sum, new_carry) = a[i].nines_complement().full_add(Digit::ZERO, carry);
        result[i] = sum;
        carry = new_carry;
    }

    result
}

/// Add two signed words, returning (result, carry-out).
///
/// Same-sign operands add magnitudes directly; mixed signs add the 10's
/// complement of the second magnitude. A carry out of the top decade
/// then means the sum came out in true form with the first operand's
/// sign; no carry means the digits hold a complement and the second
/// operand's sign won. Either way the carry itself is dropped, which
/// truncates genuine overflow exactly as the hardware did.
pub fn add(a: &DecimalWord, b: &DecimalWord) -> (DecimalWord, u8) {
    if a.sign() == b.sign() {
        let (digits, carry) = add_magnitude(a.digits(), b.digits());
        return (DecimalWord::from_parts(digits, a.sign()), carry);
    }

    // A zero operand can land here with mixed signs (zero is stored as
    // Plus); the nonzero side is already the sum.
    if a.is_zero() {
        return (*b, 0);
    }
    if b.is_zero() {
        return (*a, 0);
    }

    let complement = tens_complement(b.digits());
    let (digits, carry) = add_magnitude(a.digits(), &complement);

    if carry == 1 {
        (DecimalWord::from_parts(digits, a.sign()), 0)
    } else {
        (DecimalWord::from_parts(tens_complement(&digits), b.sign()), 0)
    }
}

/// Subtract two signed words (a - b), as addition of the negation.
#[inline]
pub fn subtract(a: &DecimalWord, b: &DecimalWord) -> (DecimalWord, u8) {
    add(a, &b.negated())
}

/// Shift a word left by n decades (multiply by 10^n).
/// Fills vacated decades with zeros; digits shifted out are lost.
pub fn shift_left(a: &DecimalWord, n: usize) -> DecimalWord {
    if n >= 10 {
        return DecimalWord::zero();
    }

    let mut digits = [Digit::ZERO; 10];
    for i in 0..(10 - n) {
        digits[i + n] = a.digit(i);
    }
    DecimalWord::from_parts(digits, a.sign())
}

/// One decade of a digit-serial multiplication, recorded for the
/// animation cursor trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplyStep {
    /// Decade of the multiplier being consumed (9 = most significant).
    pub digit_index: usize,
    /// The multiplier digit at that decade.
    pub digit: u8,
    /// Partial product after this decade's shifted additions.
    pub partial: DecimalWord,
}

/// Multiply two words by repeated shifted addition.
///
/// Walks the multiplier's decades from most significant to least; each
/// nonzero digit d adds the multiplicand, shifted to that decade, d
/// times into the partial product. Returns the product (truncated to
/// ten decades) and the per-decade trace.
pub fn multiply(ier: &DecimalWord, icand: &DecimalWord) -> (DecimalWord, Vec<MultiplyStep>) {
    let sign = if ier.sign() == icand.sign() { Sign::Plus } else { Sign::Minus };
    let icand_mag = DecimalWord::from_parts(*icand.digits(), Sign::Plus);

    let mut partial = DecimalWord::zero();
    let mut trace = Vec::with_capacity(10);

    for index in (0..10).rev() {
        let digit = ier.digit(index);
        let shifted = shift_left(&icand_mag, index);
        for _ in 0..digit.value() {
            let (sum, _carry) = add(&partial, &shifted);
            partial = sum;
        }
        trace.push(MultiplyStep {
            digit_index: index,
            digit: digit.value(),
            partial,
        });
    }

    (DecimalWord::from_parts(*partial.digits(), sign), trace)
}
