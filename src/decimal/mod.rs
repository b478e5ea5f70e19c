//! Digit-serial decimal arithmetic.
//!
//! The ENIAC computed in decimal, one digit pulse at a time. This module
//! provides the fixed-width types the functional units share:
//! - `Digit`: a single decimal digit 0-9
//! - `DecimalWord`: the 10-digit signed register format of an accumulator
//! - `arith`: ripple-carry addition, 10's-complement subtraction, and the
//!   shift-and-add multiplication used by the high-speed multiplier

pub mod digit;
pub mod word;
pub mod arith;

pub use digit::Digit;
pub use word::{DecimalWord, Sign};
pub use arith::MultiplyStep;
