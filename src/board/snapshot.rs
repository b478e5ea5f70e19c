//! Serialization-neutral plugboard snapshots.
//!
//! A `PlugboardDescription` is the save/load unit: the ordered unit
//! list with register state plus the ordered wire list. It is plain
//! serde data, so any codec can carry it; the JSON helpers at the
//! bottom are the thin glue the CLI uses.
//!
//! Loading validates the whole description before anything is swapped
//! in: a board with dangling references or illegal wires is rejected
//! and the previously-loaded board stays untouched.

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::board::plugboard::Plugboard;
use crate::board::port::{PortRef, UnitId};
use crate::board::graph::WiringError;
use crate::units::{ConfigurationError, RegisterState, Unit, UnitType};

/// Snapshot of one unit: id, type tag, and registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescription {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub registers: RegisterState,
}

/// Snapshot of one cable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDescription {
    pub source: PortRef,
    pub dest: PortRef,
}

/// The full serializable description of a plugboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlugboardDescription {
    pub units: Vec<UnitDescription>,
    pub wires: Vec<WireDescription>,
}

impl Plugboard {
    /// Describe this board for persistence.
    ///
    /// With `include_register_state` false, registers are emitted in
    /// their reset state (configuration such as program-control
    /// constants is still carried; it is part of the board, not of a
    /// run).
    pub fn describe(&self, include_register_state: bool) -> PlugboardDescription {
        let units = self
            .units()
            .iter()
            .map(|unit| {
                let registers = if include_register_state {
                    unit.registers()
                } else {
                    let mut zeroed = unit.clone();
                    zeroed.reset();
                    zeroed.registers()
                };
                UnitDescription {
                    id: unit.id().clone(),
                    unit_type: unit.unit_type(),
                    registers,
                }
            })
            .collect();

        let wires = self
            .graph()
            .wires()
            .iter()
            .map(|wire| WireDescription {
                source: wire.source.clone(),
                dest: wire.dest.clone(),
            })
            .collect();

        PlugboardDescription { units, wires }
    }

    /// Build a board from a description, validating everything.
    ///
    /// Fails on duplicate unit ids, type tags that disagree with the
    /// register state, dangling port references, or wires that would be
    /// rejected by `connect`. The caller swaps the result in only on
    /// success, so a failed load cannot corrupt a live board.
    pub fn from_description(desc: &PlugboardDescription) -> Result<Plugboard, ConfigurationError> {
        let mut units: Vec<Unit> = Vec::with_capacity(desc.units.len());
        for unit_desc in &desc.units {
            if units.iter().any(|u| u.id() == &unit_desc.id) {
                return Err(ConfigurationError::DuplicateUnit(unit_desc.id.clone()));
            }
            if unit_desc.registers.unit_type() != unit_desc.unit_type {
                return Err(ConfigurationError::IllegalWire(format!(
                    "unit '{}' is tagged {} but carries {} registers",
                    unit_desc.id,
                    unit_desc.unit_type,
                    unit_desc.registers.unit_type(),
                )));
            }
            units.push(Unit::from_registers(
                unit_desc.id.clone(),
                unit_desc.registers.clone(),
            ));
        }

        let mut board = Plugboard::new(units);
        for wire_desc in &desc.wires {
            board
                .connect(wire_desc.source.clone(), wire_desc.dest.clone())
                .map_err(|err| match err {
                    WiringError::UnknownPort(port) => ConfigurationError::DanglingPort(port),
                    other => ConfigurationError::IllegalWire(other.to_string()),
                })?;
        }

        Ok(board)
    }
}

/// Errors from the JSON file helpers.
#[derive(Debug, Clone, Error)]
pub enum BoardFileError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

/// Write a board description to a JSON file.
pub fn save_board<P: AsRef<Path>>(
    path: P,
    desc: &PlugboardDescription,
) -> Result<(), BoardFileError> {
    let json = serde_json::to_string_pretty(desc)
        .map_err(|e| BoardFileError::Json(e.to_string()))?;
    std::fs::write(path.as_ref(), json).map_err(|e| BoardFileError::Io(e.to_string()))
}

/// Read a board description from a JSON file.
pub fn load_board<P: AsRef<Path>>(path: P) -> Result<PlugboardDescription, BoardFileError> {
    let json =
        std::fs::read_to_string(path.as_ref()).map_err(|e| BoardFileError::Io(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| BoardFileError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::DecimalWord;

    fn sample_board() -> Plugboard {
        let mut board = Plugboard::new(vec![
            Unit::program_control("ctl", vec![DecimalWord::from_i64(5)]),
            Unit::accumulator("a1"),
        ]);
        board
            .connect(PortRef::new("ctl", "c1"), PortRef::new("a1", "alpha"))
            .unwrap();
        board
            .connect(PortRef::new("ctl", "p1"), PortRef::new("a1", "rec-alpha"))
            .unwrap();
        board
    }

    #[test]
    fn test_describe_roundtrip() {
        let board = sample_board();
        let desc = board.describe(true);
        let rebuilt = Plugboard::from_description(&desc).unwrap();

        assert_eq!(rebuilt.describe(true), desc);
    }

    #[test]
    fn test_describe_without_registers_zeroes_state() {
        let mut board = sample_board();
        let id = UnitId::new("a1");
        let inputs = board.trunk_inputs(&id);
        let ctx = crate::units::ExecContext { step_index: 0, tick: 0 };
        board.unit_mut(&id).unwrap().execute("rec-alpha", &inputs, &ctx);

        let desc = board.describe(false);
        let a1 = desc.units.iter().find(|u| u.id == id).unwrap();
        assert_eq!(
            a1.registers,
            RegisterState::Accumulator { value: DecimalWord::zero() },
        );

        // Wiring and configuration survive
        assert_eq!(desc.wires.len(), 2);
        let ctl = desc.units.iter().find(|u| u.id.as_str() == "ctl").unwrap();
        match &ctl.registers {
            RegisterState::ProgramControl { constants, .. } => {
                assert_eq!(constants, &vec![DecimalWord::from_i64(5)]);
            }
            other => panic!("unexpected registers: {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_dangling_wire() {
        let mut desc = sample_board().describe(true);
        desc.wires.push(WireDescription {
            source: PortRef::new("ghost", "a"),
            dest: PortRef::new("a1", "beta"),
        });

        let err = Plugboard::from_description(&desc).unwrap_err();
        assert!(matches!(err, ConfigurationError::DanglingPort(_)));
    }

    #[test]
    fn test_load_rejects_duplicate_unit() {
        let mut desc = sample_board().describe(true);
        let dup = desc.units[1].clone();
        desc.units.push(dup);

        let err = Plugboard::from_description(&desc).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateUnit(_)));
    }

    #[test]
    fn test_load_rejects_double_bound_pulse_in() {
        let mut desc = sample_board().describe(true);
        desc.wires.push(WireDescription {
            source: PortRef::new("ctl", "p2"),
            dest: PortRef::new("a1", "rec-alpha"),
        });

        let err = Plugboard::from_description(&desc).unwrap_err();
        assert!(matches!(err, ConfigurationError::IllegalWire(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let desc = sample_board().describe(true);
        let json = serde_json::to_string(&desc).unwrap();
        let parsed: PlugboardDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, desc);
    }

    #[test]
    fn test_json_rejects_out_of_range_digit() {
        let json = r#"{
            "units": [{
                "id": "a1",
                "unit_type": "accumulator",
                "registers": {
                    "kind": "accumulator",
                    "value": {
                        "digits": [200, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                        "sign": "Plus"
                    }
                }
            }],
            "wires": []
        }"#;
        assert!(serde_json::from_str::<PlugboardDescription>(json).is_err());
    }
}
