//! High-speed multiplier unit.
//!
//! Multiplication is repeated shifted addition over the decimal
//! decades, most significant first. The engine computes the whole
//! digit-serial pass atomically within one tick (the logical result is
//! the same), but keeps the per-decade cursor trace so a front end can
//! animate the pass.

use serde::{Serialize, Deserialize};
use crate::decimal::{arith, DecimalWord, MultiplyStep};
use crate::units::TrunkInputs;

/// The multiplier: two operand latches, the partial-product register,
/// and a decade cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Multiplier {
    ier: DecimalWord,
    icand: DecimalWord,
    product: DecimalWord,
    /// Decade the digit-serial pass stopped at; 0 once a pass completes.
    cursor: usize,
    /// Per-decade trace of the last pass, for animation. Rebuilt on
    /// every `start`, not part of the persisted register state.
    #[serde(skip)]
    trace: Vec<MultiplyStep>,
}

impl Multiplier {
    /// Create a zeroed multiplier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from snapshot registers.
    pub fn with_registers(
        ier: DecimalWord,
        icand: DecimalWord,
        product: DecimalWord,
        cursor: usize,
    ) -> Self {
        Self { ier, icand, product, cursor, trace: Vec::new() }
    }

    /// The latched multiplier operand.
    pub fn ier(&self) -> DecimalWord {
        self.ier
    }

    /// The latched multiplicand operand.
    pub fn icand(&self) -> DecimalWord {
        self.icand
    }

    /// The product register.
    pub fn product(&self) -> DecimalWord {
        self.product
    }

    /// The decade cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The cursor trace of the last pass.
    pub fn trace(&self) -> &[MultiplyStep] {
        &self.trace
    }

    /// Zero all registers.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Execute: `start` latches both operand trunks, runs the full
    /// shift-and-add pass, and activates `done`.
    pub fn execute(&mut self, pulse_port: &str, inputs: &TrunkInputs) -> Vec<&'static str> {
        if pulse_port != "start" {
            return Vec::new();
        }

        self.ier = inputs.get("ier");
        self.icand = inputs.get("icand");

        let (product, trace) = arith::multiply(&self.ier, &self.icand);
        self.product = product;
        self.trace = trace;
        self.cursor = 0;

        vec!["done"]
    }

    /// The `product` trunk presents the product register.
    pub fn trunk_output(&self, port: &str) -> Option<DecimalWord> {
        match port {
            "product" => Some(self.product),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands(ier: i64, icand: i64) -> TrunkInputs {
        let mut inputs = TrunkInputs::new();
        inputs.insert("ier", DecimalWord::from_i64(ier));
        inputs.insert("icand", DecimalWord::from_i64(icand));
        inputs
    }

    #[test]
    fn test_multiply() {
        let mut mult = Multiplier::new();
        let outs = mult.execute("start", &operands(2, 3));

        assert_eq!(outs, vec!["done"]);
        assert_eq!(mult.product().to_i64(), 6);
        assert_eq!(mult.trunk_output("product"), Some(DecimalWord::from_i64(6)));
        assert_eq!(mult.cursor(), 0);
        assert_eq!(mult.trace().len(), 10);
    }

    #[test]
    fn test_operands_latched() {
        let mut mult = Multiplier::new();
        mult.execute("start", &operands(123, 456));
        assert_eq!(mult.ier().to_i64(), 123);
        assert_eq!(mult.icand().to_i64(), 456);
        assert_eq!(mult.product().to_i64(), 56_088);
    }

    #[test]
    fn test_undriven_operand_is_zero() {
        let mut mult = Multiplier::new();
        let mut inputs = TrunkInputs::new();
        inputs.insert("ier", DecimalWord::from_i64(9));
        mult.execute("start", &inputs);
        assert!(mult.product().is_zero());
    }

    #[test]
    fn test_reset() {
        let mut mult = Multiplier::new();
        mult.execute("start", &operands(7, 8));
        mult.reset();
        assert!(mult.product().is_zero());
        assert!(mult.ier().is_zero());
        assert!(mult.trace().is_empty());
    }
}
