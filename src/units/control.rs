//! Program control unit (master programmer + constant transmitter).
//!
//! Sequencing on this machine is itself wired: the program control
//! activates its scripted pulse outputs `p1..p8` one step at a time,
//! advancing whenever any of its step inputs `i1..i6` is pulsed by a
//! finishing unit. A per-step repeat count lets one step fire several
//! times before advancing. When the script runs off the end the unit
//! activates nothing, which drains the pulse chain and halts the run.
//!
//! The unit also carries the constant-transmitter trunks `c1..c4`,
//! presenting fixed operand values for accumulators to load.

use serde::{Serialize, Deserialize};
use crate::decimal::DecimalWord;
use crate::units::catalogue::CONTROL_SCRIPT_PORTS;

/// The program control: scripted-step cursor, repeat counter, and the
/// constant-transmitter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramControl {
    /// Current scripted-step index (0-based into `p1..p8`).
    index: usize,
    /// Pulses left before this step advances.
    remaining: u8,
    /// Per-step repeat counts; steps beyond the vector repeat once.
    repeats: Vec<u8>,
    /// Values presented on the `c1..c4` trunks.
    constants: Vec<DecimalWord>,
}

impl ProgramControl {
    /// Create a program control at the start of its script, presenting
    /// the given constants on `c1..`.
    pub fn new(constants: Vec<DecimalWord>) -> Self {
        Self::with_registers(0, 0, Vec::new(), constants)
    }

    /// Restore from snapshot registers.
    pub fn with_registers(
        index: usize,
        remaining: u8,
        repeats: Vec<u8>,
        constants: Vec<DecimalWord>,
    ) -> Self {
        let mut ctl = Self { index, remaining, repeats, constants };
        if ctl.remaining == 0 {
            ctl.remaining = ctl.repeat_for(ctl.index);
        }
        ctl
    }

    /// Set a per-step repeat count (1-based step number, count >= 1).
    pub fn set_repeat(&mut self, step: usize, count: u8) {
        assert!(step >= 1 && count >= 1, "repeat steps and counts are 1-based");
        if self.repeats.len() < step {
            self.repeats.resize(step, 1);
        }
        self.repeats[step - 1] = count;
        if self.index == step - 1 {
            self.remaining = count;
        }
    }

    /// Current scripted-step index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pulses left on the current step.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Per-step repeat configuration.
    pub fn repeats(&self) -> &[u8] {
        &self.repeats
    }

    /// Constant-transmitter values.
    pub fn constants(&self) -> &[DecimalWord] {
        &self.constants
    }

    /// Number of steps in the script.
    pub fn script_len(&self) -> usize {
        CONTROL_SCRIPT_PORTS.len()
    }

    /// The scripted output port for the current step, or `None` once
    /// the script is exhausted.
    pub fn current_port(&self) -> Option<&'static str> {
        CONTROL_SCRIPT_PORTS.get(self.index).copied()
    }

    fn repeat_for(&self, index: usize) -> u8 {
        self.repeats.get(index).copied().unwrap_or(1).max(1)
    }

    /// Rewind to the start of the script. Constants and repeat counts
    /// are configuration and survive.
    pub fn reset(&mut self) {
        self.index = 0;
        self.remaining = self.repeat_for(0);
    }

    /// Execute: any step-input pulse either repeats the current step or
    /// advances to the next, then activates that step's output.
    pub fn execute(&mut self, pulse_port: &str) -> Vec<&'static str> {
        if !pulse_port.starts_with('i') {
            return Vec::new();
        }

        if self.remaining > 1 {
            self.remaining -= 1;
        } else {
            self.index += 1;
            self.remaining = self.repeat_for(self.index);
        }

        match self.current_port() {
            Some(port) => vec![port],
            None => Vec::new(),
        }
    }

    /// Constant-transmitter trunk reading.
    pub fn trunk_output(&self, port: &str) -> Option<DecimalWord> {
        let slot: usize = port.strip_prefix('c')?.parse().ok()?;
        if slot == 0 || slot > 4 {
            return None;
        }
        Some(
            self.constants
                .get(slot - 1)
                .copied()
                .unwrap_or_else(DecimalWord::zero),
        )
    }
}

impl Default for ProgramControl {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants(values: &[i64]) -> Vec<DecimalWord> {
        values.iter().map(|&v| DecimalWord::from_i64(v)).collect()
    }

    #[test]
    fn test_script_advances() {
        let mut ctl = ProgramControl::new(Vec::new());
        assert_eq!(ctl.current_port(), Some("p1"));

        assert_eq!(ctl.execute("i1"), vec!["p2"]);
        assert_eq!(ctl.execute("i3"), vec!["p3"]);
        assert_eq!(ctl.index(), 2);
    }

    #[test]
    fn test_script_exhausts() {
        let mut ctl = ProgramControl::new(Vec::new());
        for _ in 0..7 {
            assert!(!ctl.execute("i1").is_empty());
        }
        // Past p8: nothing left to activate
        assert!(ctl.execute("i1").is_empty());
        assert_eq!(ctl.current_port(), None);
    }

    #[test]
    fn test_repeat_counter() {
        let mut ctl = ProgramControl::new(Vec::new());
        ctl.set_repeat(1, 3);

        // Two pulses re-fire p1, the third advances
        assert_eq!(ctl.execute("i1"), vec!["p1"]);
        assert_eq!(ctl.execute("i1"), vec!["p1"]);
        assert_eq!(ctl.execute("i1"), vec!["p2"]);
    }

    #[test]
    fn test_constant_trunks() {
        let ctl = ProgramControl::new(constants(&[1, 2, 3]));
        assert_eq!(ctl.trunk_output("c1"), Some(DecimalWord::from_i64(1)));
        assert_eq!(ctl.trunk_output("c3"), Some(DecimalWord::from_i64(3)));
        // Unconfigured slot reads zero; out-of-range is no port at all
        assert_eq!(ctl.trunk_output("c4"), Some(DecimalWord::zero()));
        assert_eq!(ctl.trunk_output("c5"), None);
        assert_eq!(ctl.trunk_output("p1"), None);
    }

    #[test]
    fn test_reset_preserves_configuration() {
        let mut ctl = ProgramControl::new(constants(&[9]));
        ctl.set_repeat(2, 2);
        ctl.execute("i1");
        ctl.execute("i1");
        ctl.reset();

        assert_eq!(ctl.index(), 0);
        assert_eq!(ctl.constants(), constants(&[9]).as_slice());
        assert_eq!(ctl.repeats(), &[1, 2]);
    }

    #[test]
    fn test_non_step_pulse_ignored() {
        let mut ctl = ProgramControl::new(Vec::new());
        assert!(ctl.execute("p1").is_empty());
        assert_eq!(ctl.index(), 0);
    }
}
