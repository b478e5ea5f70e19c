//! Accumulator unit.
//!
//! The workhorse of the machine: a 10-digit signed register that adds
//! whatever value is on one of its receive trunks when pulsed.
//! Subtraction is addition of the 10's complement; the `s` transmit
//! trunk presents the complemented (negated) reading so a downstream
//! accumulator can subtract by simply receiving from it.

use serde::{Serialize, Deserialize};
use crate::decimal::{arith, DecimalWord};
use crate::units::TrunkInputs;

/// Accumulator opcode, selected by which pulse input fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccumulatorOp {
    /// Add the operand trunk into the register.
    Add,
    /// Subtract the operand trunk (10's complement addition).
    Subtract,
    /// Zero the register.
    Clear,
    /// Present the register on the transmit trunks and pulse `done`.
    Transfer,
}

/// A 10-decade signed accumulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Accumulator {
    value: DecimalWord,
}

impl Accumulator {
    /// Create a zeroed accumulator.
    pub fn new() -> Self {
        Self { value: DecimalWord::zero() }
    }

    /// Create an accumulator holding a value (snapshot restore).
    pub fn with_value(value: DecimalWord) -> Self {
        Self { value }
    }

    /// Current register value.
    pub fn value(&self) -> DecimalWord {
        self.value
    }

    /// Zero the register.
    pub fn reset(&mut self) {
        self.value = DecimalWord::zero();
    }

    /// Map a pulse-input port to its opcode and operand trunk.
    pub fn decode_port(pulse_port: &str) -> Option<(AccumulatorOp, Option<&'static str>)> {
        match pulse_port {
            "rec-alpha" => Some((AccumulatorOp::Add, Some("alpha"))),
            "rec-beta" => Some((AccumulatorOp::Add, Some("beta"))),
            "sub-alpha" => Some((AccumulatorOp::Subtract, Some("alpha"))),
            "sub-beta" => Some((AccumulatorOp::Subtract, Some("beta"))),
            "clear" => Some((AccumulatorOp::Clear, None)),
            "transmit" => Some((AccumulatorOp::Transfer, None)),
            _ => None,
        }
    }

    /// Execute the opcode selected by `pulse_port`.
    ///
    /// Every completed operation activates the `done` pulse output.
    /// Overflow past the tenth decade truncates, as the hardware did.
    pub fn execute(&mut self, pulse_port: &str, inputs: &TrunkInputs) -> Vec<&'static str> {
        let Some((op, operand_trunk)) = Self::decode_port(pulse_port) else {
            return Vec::new();
        };

        let operand = operand_trunk
            .map(|trunk| inputs.get(trunk))
            .unwrap_or_else(DecimalWord::zero);

        match op {
            AccumulatorOp::Add => {
                let (sum, _carry) = arith::add(&self.value, &operand);
                self.value = sum;
            }
            AccumulatorOp::Subtract => {
                let (diff, _carry) = arith::subtract(&self.value, &operand);
                self.value = diff;
            }
            AccumulatorOp::Clear => {
                self.value = DecimalWord::zero();
            }
            AccumulatorOp::Transfer => {
                // The transmit trunks are combinational; the pulse only
                // signals downstream that the value is ready.
            }
        }

        vec!["done"]
    }

    /// Transmit-trunk reading: `a` carries the register in true form,
    /// `s` carries it complemented for subtractive reception.
    pub fn trunk_output(&self, port: &str) -> Option<DecimalWord> {
        match port {
            "a" => Some(self.value),
            "s" => Some(self.value.negated()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(alpha: i64, beta: i64) -> TrunkInputs {
        let mut inputs = TrunkInputs::new();
        inputs.insert("alpha", DecimalWord::from_i64(alpha));
        inputs.insert("beta", DecimalWord::from_i64(beta));
        inputs
    }

    #[test]
    fn test_receive_alpha() {
        let mut acc = Accumulator::new();
        let outs = acc.execute("rec-alpha", &inputs(42, 0));

        assert_eq!(acc.value().to_i64(), 42);
        assert_eq!(outs, vec!["done"]);
    }

    #[test]
    fn test_accumulation() {
        let mut acc = Accumulator::new();
        acc.execute("rec-alpha", &inputs(10, 0));
        acc.execute("rec-beta", &inputs(0, 5));
        assert_eq!(acc.value().to_i64(), 15);
    }

    #[test]
    fn test_subtract_goes_negative() {
        let mut acc = Accumulator::new();
        acc.execute("rec-alpha", &inputs(3, 0));
        acc.execute("sub-beta", &inputs(0, 10));
        assert_eq!(acc.value().to_i64(), -7);
    }

    #[test]
    fn test_clear() {
        let mut acc = Accumulator::with_value(DecimalWord::from_i64(99));
        let outs = acc.execute("clear", &TrunkInputs::new());
        assert!(acc.value().is_zero());
        assert_eq!(outs, vec!["done"]);
    }

    #[test]
    fn test_transmit_leaves_value() {
        let mut acc = Accumulator::with_value(DecimalWord::from_i64(7));
        acc.execute("transmit", &TrunkInputs::new());
        assert_eq!(acc.value().to_i64(), 7);
    }

    #[test]
    fn test_trunk_outputs() {
        let acc = Accumulator::with_value(DecimalWord::from_i64(7));
        assert_eq!(acc.trunk_output("a"), Some(DecimalWord::from_i64(7)));
        assert_eq!(acc.trunk_output("s"), Some(DecimalWord::from_i64(-7)));
        assert_eq!(acc.trunk_output("alpha"), None);
    }

    #[test]
    fn test_undriven_trunk_reads_zero() {
        let mut acc = Accumulator::with_value(DecimalWord::from_i64(5));
        acc.execute("rec-alpha", &TrunkInputs::new());
        assert_eq!(acc.value().to_i64(), 5);
    }

    #[test]
    fn test_undriven_trunk_keeps_negative_value() {
        // Mixed-sign add with a zero operand must not complement the
        // register
        let mut acc = Accumulator::with_value(DecimalWord::from_i64(-7));
        acc.execute("rec-alpha", &TrunkInputs::new());
        assert_eq!(acc.value().to_i64(), -7);

        acc.execute("sub-beta", &TrunkInputs::new());
        assert_eq!(acc.value().to_i64(), -7);
    }

    #[test]
    fn test_unknown_pulse_ignored() {
        let mut acc = Accumulator::new();
        let outs = acc.execute("bogus", &TrunkInputs::new());
        assert!(outs.is_empty());
        assert!(acc.value().is_zero());
    }

    #[test]
    fn test_overflow_truncates() {
        let mut acc = Accumulator::with_value(DecimalWord::from_i64(9_999_999_999));
        acc.execute("rec-alpha", &inputs(1, 0));
        assert_eq!(acc.value().to_i64(), 0);
    }
}
