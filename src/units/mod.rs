//! Functional units of the machine.
//!
//! This module implements the fixed unit catalogue and the per-type
//! operation semantics:
//! - 10-digit signed accumulators (add, subtract, clear, transfer)
//! - the high-speed multiplier (digit-serial shift-and-add)
//! - the card punch (append-only output record)
//! - the master programmer / constant transmitter (scripted pulse sequencing)

pub mod catalogue;
pub mod accumulator;
pub mod multiplier;
pub mod punch;
pub mod control;

pub use catalogue::{UnitType, PortSpec, ports_of, port_kind, ConfigurationError};
pub use accumulator::{Accumulator, AccumulatorOp};
pub use multiplier::Multiplier;
pub use punch::{Punch, PunchEntry};
pub use control::ProgramControl;

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::board::port::UnitId;
use crate::decimal::DecimalWord;

/// Digit-trunk input values sampled for one unit at the start of a tick.
///
/// Trunk reads are combinational: an input port with no driving wire
/// reads as zero, mirroring the permissiveness of physical wiring.
#[derive(Debug, Clone, Default)]
pub struct TrunkInputs {
    values: BTreeMap<String, DecimalWord>,
}

impl TrunkInputs {
    /// Create an empty input set (every port reads zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value driven onto a trunk input port.
    pub fn insert(&mut self, port: impl Into<String>, value: DecimalWord) {
        self.values.insert(port.into(), value);
    }

    /// Read a trunk input port; undriven ports read zero.
    pub fn get(&self, port: &str) -> DecimalWord {
        self.values.get(port).copied().unwrap_or_else(DecimalWord::zero)
    }
}

/// Per-tick context handed to unit operations.
#[derive(Debug, Clone, Copy)]
pub struct ExecContext {
    /// The program control's scripted-step index at the start of the tick.
    pub step_index: usize,
    /// The scheduler tick being executed.
    pub tick: u64,
}

/// Serializable register state of one unit, as stored in a plugboard
/// snapshot. Configuration that survives a reset (the program control's
/// constants and repeat counts) travels with the registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RegisterState {
    Accumulator {
        value: DecimalWord,
    },
    Multiplier {
        ier: DecimalWord,
        icand: DecimalWord,
        product: DecimalWord,
        cursor: usize,
    },
    Punch {
        record: Vec<PunchEntry>,
    },
    ProgramControl {
        index: usize,
        remaining: u8,
        repeats: Vec<u8>,
        constants: Vec<DecimalWord>,
    },
}

impl RegisterState {
    /// The unit type this register state belongs to.
    pub fn unit_type(&self) -> UnitType {
        match self {
            RegisterState::Accumulator { .. } => UnitType::Accumulator,
            RegisterState::Multiplier { .. } => UnitType::Multiplier,
            RegisterState::Punch { .. } => UnitType::Punch,
            RegisterState::ProgramControl { .. } => UnitType::ProgramControl,
        }
    }
}

/// A functional unit instance: a stable id plus type-specific state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
}

/// Type-specific unit state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UnitKind {
    Accumulator(Accumulator),
    Multiplier(Multiplier),
    Punch(Punch),
    ProgramControl(ProgramControl),
}

impl Unit {
    /// Create an accumulator unit.
    pub fn accumulator(id: impl Into<UnitId>) -> Self {
        Self { id: id.into(), kind: UnitKind::Accumulator(Accumulator::new()) }
    }

    /// Create a multiplier unit.
    pub fn multiplier(id: impl Into<UnitId>) -> Self {
        Self { id: id.into(), kind: UnitKind::Multiplier(Multiplier::new()) }
    }

    /// Create a punch unit.
    pub fn punch(id: impl Into<UnitId>) -> Self {
        Self { id: id.into(), kind: UnitKind::Punch(Punch::new()) }
    }

    /// Create a program control unit with the given constant-transmitter
    /// values.
    pub fn program_control(id: impl Into<UnitId>, constants: Vec<DecimalWord>) -> Self {
        Self {
            id: id.into(),
            kind: UnitKind::ProgramControl(ProgramControl::new(constants)),
        }
    }

    /// Rebuild a unit from a snapshot description.
    pub fn from_registers(id: UnitId, registers: RegisterState) -> Self {
        let kind = match registers {
            RegisterState::Accumulator { value } => {
                UnitKind::Accumulator(Accumulator::with_value(value))
            }
            RegisterState::Multiplier { ier, icand, product, cursor } => {
                UnitKind::Multiplier(Multiplier::with_registers(ier, icand, product, cursor))
            }
            RegisterState::Punch { record } => UnitKind::Punch(Punch::with_record(record)),
            RegisterState::ProgramControl { index, remaining, repeats, constants } => {
                UnitKind::ProgramControl(ProgramControl::with_registers(
                    index, remaining, repeats, constants,
                ))
            }
        };
        Self { id, kind }
    }

    /// The unit's stable id.
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// The unit's catalogue type.
    pub fn unit_type(&self) -> UnitType {
        match &self.kind {
            UnitKind::Accumulator(_) => UnitType::Accumulator,
            UnitKind::Multiplier(_) => UnitType::Multiplier,
            UnitKind::Punch(_) => UnitType::Punch,
            UnitKind::ProgramControl(_) => UnitType::ProgramControl,
        }
    }

    /// Direct access to the program control, if this unit is one.
    pub fn as_program_control(&self) -> Option<&ProgramControl> {
        match &self.kind {
            UnitKind::ProgramControl(ctl) => Some(ctl),
            _ => None,
        }
    }

    /// Direct access to the punch, if this unit is one.
    pub fn as_punch(&self) -> Option<&Punch> {
        match &self.kind {
            UnitKind::Punch(p) => Some(p),
            _ => None,
        }
    }

    /// Direct access to the accumulator, if this unit is one.
    pub fn as_accumulator(&self) -> Option<&Accumulator> {
        match &self.kind {
            UnitKind::Accumulator(a) => Some(a),
            _ => None,
        }
    }

    /// Direct access to the multiplier, if this unit is one.
    pub fn as_multiplier(&self) -> Option<&Multiplier> {
        match &self.kind {
            UnitKind::Multiplier(m) => Some(m),
            _ => None,
        }
    }

    /// Zero all registers. Configuration (program-control constants and
    /// repeat counts) is preserved; a reset clears work, not wiring or
    /// panel switches.
    pub fn reset(&mut self) {
        match &mut self.kind {
            UnitKind::Accumulator(a) => a.reset(),
            UnitKind::Multiplier(m) => m.reset(),
            UnitKind::Punch(p) => p.reset(),
            UnitKind::ProgramControl(c) => c.reset(),
        }
    }

    /// The value this unit currently presents on a named DigitTrunkOut
    /// port, or `None` if the unit has no such port.
    pub fn trunk_output(&self, port: &str) -> Option<DecimalWord> {
        match &self.kind {
            UnitKind::Accumulator(a) => a.trunk_output(port),
            UnitKind::Multiplier(m) => m.trunk_output(port),
            UnitKind::Punch(_) => None,
            UnitKind::ProgramControl(c) => c.trunk_output(port),
        }
    }

    /// Execute the operation selected by a pulse on `pulse_port`.
    ///
    /// Returns the names of the ProgramPulseOut ports this unit activates
    /// for the next tick. Unknown pulse ports are ignored (execution is
    /// total; validation happens at wiring time).
    pub fn execute(
        &mut self,
        pulse_port: &str,
        inputs: &TrunkInputs,
        ctx: &ExecContext,
    ) -> Vec<&'static str> {
        match &mut self.kind {
            UnitKind::Accumulator(a) => a.execute(pulse_port, inputs),
            UnitKind::Multiplier(m) => m.execute(pulse_port, inputs),
            UnitKind::Punch(p) => p.execute(pulse_port, inputs, ctx),
            UnitKind::ProgramControl(c) => c.execute(pulse_port),
        }
    }

    /// Snapshot the unit's registers.
    pub fn registers(&self) -> RegisterState {
        match &self.kind {
            UnitKind::Accumulator(a) => RegisterState::Accumulator { value: a.value() },
            UnitKind::Multiplier(m) => RegisterState::Multiplier {
                ier: m.ier(),
                icand: m.icand(),
                product: m.product(),
                cursor: m.cursor(),
            },
            UnitKind::Punch(p) => RegisterState::Punch { record: p.record().to_vec() },
            UnitKind::ProgramControl(c) => RegisterState::ProgramControl {
                index: c.index(),
                remaining: c.remaining(),
                repeats: c.repeats().to_vec(),
                constants: c.constants().to_vec(),
            },
        }
    }
}
