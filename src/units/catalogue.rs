//! Static port catalogue for each unit type.
//!
//! Pure data: the fixed, ordered list of ports a unit of each type
//! exposes on the plugboard, and their kinds. Port names follow the
//! historical front-panel labels: an accumulator's `alpha`/`beta`
//! receive trunks, its `a` (add) and `s` (subtract, complemented)
//! transmit trunks, the master programmer's `p1..p8` scripted pulse
//! outputs.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::board::port::{PortKind, PortRef, UnitId};

/// The closed set of unit types on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitType {
    /// 10-digit signed add/subtract register.
    Accumulator,
    /// High-speed multiplier.
    Multiplier,
    /// Card punch (output record).
    Punch,
    /// Master programmer: scripted pulse sequencer plus constant
    /// transmitter trunks.
    ProgramControl,
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitType::Accumulator => "accumulator",
            UnitType::Multiplier => "multiplier",
            UnitType::Punch => "punch",
            UnitType::ProgramControl => "program-control",
        };
        write!(f, "{}", name)
    }
}

/// Descriptor of one port in a unit type's catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    /// Port name, unique within the unit type.
    pub name: &'static str,
    /// Port kind.
    pub kind: PortKind,
}

const fn pulse_in(name: &'static str) -> PortSpec {
    PortSpec { name, kind: PortKind::ProgramPulseIn }
}
const fn pulse_out(name: &'static str) -> PortSpec {
    PortSpec { name, kind: PortKind::ProgramPulseOut }
}
const fn trunk_in(name: &'static str) -> PortSpec {
    PortSpec { name, kind: PortKind::DigitTrunkIn }
}
const fn trunk_out(name: &'static str) -> PortSpec {
    PortSpec { name, kind: PortKind::DigitTrunkOut }
}

/// Accumulator ports: a pulse input per opcode/operand-channel pair,
/// a completion pulse, two receive trunks, the true-value and
/// complemented transmit trunks.
pub const ACCUMULATOR_PORTS: &[PortSpec] = &[
    pulse_in("rec-alpha"),
    pulse_in("rec-beta"),
    pulse_in("sub-alpha"),
    pulse_in("sub-beta"),
    pulse_in("clear"),
    pulse_in("transmit"),
    pulse_out("done"),
    trunk_in("alpha"),
    trunk_in("beta"),
    trunk_out("a"),
    trunk_out("s"),
];

/// Multiplier ports.
pub const MULTIPLIER_PORTS: &[PortSpec] = &[
    pulse_in("start"),
    pulse_out("done"),
    trunk_in("ier"),
    trunk_in("icand"),
    trunk_out("product"),
];

/// Punch ports.
pub const PUNCH_PORTS: &[PortSpec] = &[
    pulse_in("punch"),
    pulse_out("done"),
    trunk_in("in"),
];

/// Program control ports: six step inputs, eight scripted pulse
/// outputs, four constant-transmitter trunks.
pub const PROGRAM_CONTROL_PORTS: &[PortSpec] = &[
    pulse_in("i1"),
    pulse_in("i2"),
    pulse_in("i3"),
    pulse_in("i4"),
    pulse_in("i5"),
    pulse_in("i6"),
    pulse_out("p1"),
    pulse_out("p2"),
    pulse_out("p3"),
    pulse_out("p4"),
    pulse_out("p5"),
    pulse_out("p6"),
    pulse_out("p7"),
    pulse_out("p8"),
    trunk_out("c1"),
    trunk_out("c2"),
    trunk_out("c3"),
    trunk_out("c4"),
];

/// The scripted pulse outputs of the program control, in script order.
pub const CONTROL_SCRIPT_PORTS: &[&str] = &["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"];

/// The fixed, ordered port list for a unit type.
pub fn ports_of(unit_type: UnitType) -> &'static [PortSpec] {
    match unit_type {
        UnitType::Accumulator => ACCUMULATOR_PORTS,
        UnitType::Multiplier => MULTIPLIER_PORTS,
        UnitType::Punch => PUNCH_PORTS,
        UnitType::ProgramControl => PROGRAM_CONTROL_PORTS,
    }
}

/// Look up the kind of a named port on a unit type.
pub fn port_kind(unit_type: UnitType, name: &str) -> Result<PortKind, ConfigurationError> {
    ports_of(unit_type)
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.kind)
        .ok_or(ConfigurationError::UnknownPort {
            unit_type,
            port: name.to_string(),
        })
}

/// Errors in the static description of a board: unknown catalogue
/// entries and dangling references found while loading a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unit type {unit_type} has no port named '{port}'")]
    UnknownPort { unit_type: UnitType, port: String },

    #[error("no unit with id '{0}' on the board")]
    UnknownUnit(UnitId),

    #[error("wire references port {0} on a unit not present on the board")]
    DanglingPort(PortRef),

    #[error("duplicate unit id '{0}' in board description")]
    DuplicateUnit(UnitId),

    #[error("illegal wire in board description: {0}")]
    IllegalWire(String),
}
