//! Card punch unit.
//!
//! The machine's only observable output: each `punch` pulse captures
//! whatever value is on the `in` trunk and appends it to the output
//! record, tagged with the program step that produced it.

use serde::{Serialize, Deserialize};
use crate::decimal::DecimalWord;
use crate::units::{ExecContext, TrunkInputs};

/// One punched card: a captured value and the scripted step that
/// punched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEntry {
    /// Program control step index at the time of the punch.
    pub step: usize,
    /// Captured decimal value.
    pub value: DecimalWord,
}

/// The card punch: an append-only output record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Punch {
    record: Vec<PunchEntry>,
}

impl Punch {
    /// Create a punch with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from snapshot registers.
    pub fn with_record(record: Vec<PunchEntry>) -> Self {
        Self { record }
    }

    /// The output record, oldest first.
    pub fn record(&self) -> &[PunchEntry] {
        &self.record
    }

    /// Discard the record.
    pub fn reset(&mut self) {
        self.record.clear();
    }

    /// Execute: capture the `in` trunk, tagged with the current step.
    pub fn execute(
        &mut self,
        pulse_port: &str,
        inputs: &TrunkInputs,
        ctx: &ExecContext,
    ) -> Vec<&'static str> {
        if pulse_port != "punch" {
            return Vec::new();
        }

        self.record.push(PunchEntry {
            step: ctx.step_index,
            value: inputs.get("in"),
        });

        vec!["done"]
    }
}
