//! Typed connection points.
//!
//! Every socket on a unit's front panel is either a program-pulse port
//! (control) or a digit-trunk port (data), and either an input or an
//! output. A cable is only legal from an output to an input of the same
//! signal class; encoding that in a closed enum removes the "wired
//! incompatible ports" class of bugs the loosely-typed original had.

use std::fmt;
use serde::{Serialize, Deserialize};

/// The two signal classes carried by plugboard cables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalClass {
    /// Program pulses: the control signals that trigger unit operations.
    Pulse,
    /// Digit trunks: decimal values read combinationally, no pulse needed.
    Trunk,
}

/// Kind of a port, combining signal class and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// Receives a program pulse; at most one incoming cable.
    ProgramPulseIn,
    /// Emits a program pulse; may fan out to several inputs.
    ProgramPulseOut,
    /// Reads a decimal value from a trunk; at most one driver.
    DigitTrunkIn,
    /// Presents the unit's current decimal value on a trunk.
    DigitTrunkOut,
}

impl PortKind {
    /// The signal class this port carries.
    #[inline]
    pub const fn class(self) -> SignalClass {
        match self {
            PortKind::ProgramPulseIn | PortKind::ProgramPulseOut => SignalClass::Pulse,
            PortKind::DigitTrunkIn | PortKind::DigitTrunkOut => SignalClass::Trunk,
        }
    }

    /// Check if this port is an input (cable destination).
    #[inline]
    pub const fn is_input(self) -> bool {
        matches!(self, PortKind::ProgramPulseIn | PortKind::DigitTrunkIn)
    }

    /// Check if this port is an output (cable source).
    #[inline]
    pub const fn is_output(self) -> bool {
        !self.is_input()
    }

    /// Check whether a cable may run from this kind to `dest`:
    /// Out -> In of the same signal class.
    #[inline]
    pub fn connects_to(self, dest: PortKind) -> bool {
        self.is_output() && dest.is_input() && self.class() == dest.class()
    }
}

/// Stable identifier of a functional unit on the board.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Create a unit id.
    pub fn new(id: impl Into<String>) -> Self {
        UnitId(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        UnitId(s.to_string())
    }
}

/// Reference to a named port on a specific unit, e.g. `a7.rec-alpha`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning unit.
    pub unit: UnitId,
    /// Port name within that unit's catalogue entry.
    pub port: String,
}

impl PortRef {
    /// Create a port reference.
    pub fn new(unit: impl Into<UnitId>, port: impl Into<String>) -> Self {
        Self { unit: unit.into(), port: port.into() }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.port)
    }
}
