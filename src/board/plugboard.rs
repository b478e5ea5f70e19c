//! The plugboard aggregate: all functional units plus the wiring graph.
//!
//! `connect` is where wiring legality is enforced, because only the
//! aggregate knows both the cables and the unit catalogue. A failed
//! connect or disconnect leaves the graph exactly as it was.

use thiserror::Error;
use crate::board::graph::{Wire, WiringError, WiringGraph};
use crate::board::port::{PortKind, PortRef, UnitId};
use crate::units::{catalogue, TrunkInputs, Unit};

/// All units and cables: the unit of persistence.
#[derive(Debug, Clone, Default)]
pub struct Plugboard {
    units: Vec<Unit>,
    graph: WiringGraph,
}

impl Plugboard {
    /// Create a board with the given units and no wiring.
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units, graph: WiringGraph::new() }
    }

    /// The units, in installation order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The wiring graph.
    pub fn graph(&self) -> &WiringGraph {
        &self.graph
    }

    /// Look up a unit by id.
    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id() == id)
    }

    /// Look up a unit mutably by id.
    pub fn unit_mut(&mut self, id: &UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id() == id)
    }

    /// Resolve the kind of a referenced port.
    fn resolve_kind(&self, port: &PortRef) -> Result<PortKind, WiringError> {
        let unit = self
            .unit(&port.unit)
            .ok_or_else(|| WiringError::UnknownPort(port.clone()))?;
        catalogue::port_kind(unit.unit_type(), &port.port)
            .map_err(|_| WiringError::UnknownPort(port.clone()))
    }

    /// Plug a cable from `source` to `dest`.
    ///
    /// Fails if the kinds are not Out -> In of matching signal class,
    /// or if the destination is a ProgramPulseIn or DigitTrunkIn that
    /// already carries a wire (one pulse source per control input, one
    /// driver per trunk input, bus semantics). All-or-nothing.
    pub fn connect(&mut self, source: PortRef, dest: PortRef) -> Result<Wire, WiringError> {
        let source_kind = self.resolve_kind(&source)?;
        let dest_kind = self.resolve_kind(&dest)?;

        if !source_kind.connects_to(dest_kind) {
            return Err(WiringError::IncompatiblePortKind {
                from: source,
                from_kind: source_kind,
                to: dest,
                to_kind: dest_kind,
            });
        }

        if self.graph.fan_in(&dest) > 0 {
            return Err(WiringError::PortAlreadyBound(dest));
        }

        let wire = Wire::new(source, dest);
        self.graph.insert(wire.clone());
        Ok(wire)
    }

    /// Unplug a cable.
    pub fn disconnect(&mut self, wire: &Wire) -> Result<(), WiringError> {
        self.graph.disconnect(wire)
    }

    /// Check the whole board for wiring violations without mutating it.
    ///
    /// Returns an empty list for a valid board.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for wire in self.graph.wires() {
            match (self.resolve_kind(&wire.source), self.resolve_kind(&wire.dest)) {
                (Err(_), _) => violations.push(Violation::DanglingPort {
                    port: wire.source.clone(),
                }),
                (_, Err(_)) => violations.push(Violation::DanglingPort {
                    port: wire.dest.clone(),
                }),
                (Ok(source_kind), Ok(dest_kind)) => {
                    if !source_kind.connects_to(dest_kind) {
                        violations.push(Violation::IncompatibleWire { wire: wire.clone() });
                    }
                }
            }
        }

        // Fan-in limits on every input port actually referenced
        let mut checked: Vec<&PortRef> = Vec::new();
        for wire in self.graph.wires() {
            let dest = &wire.dest;
            if checked.contains(&dest) {
                continue;
            }
            checked.push(dest);

            let count = self.graph.fan_in(dest);
            if count <= 1 {
                continue;
            }
            match self.resolve_kind(dest) {
                Ok(PortKind::ProgramPulseIn) => {
                    violations.push(Violation::PulseFanIn { port: dest.clone(), count });
                }
                Ok(PortKind::DigitTrunkIn) => {
                    violations.push(Violation::MultipleDrivers { port: dest.clone(), count });
                }
                _ => {}
            }
        }

        violations
    }

    /// Zero every unit's registers. Wiring is untouched.
    pub fn reset_units(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// The scripted-step index of the board's program control
    /// (zero if the board has none).
    pub fn program_step_index(&self) -> usize {
        self.units
            .iter()
            .find_map(|u| u.as_program_control())
            .map(|ctl| ctl.index())
            .unwrap_or(0)
    }

    /// The ports a fresh run starts from: the program control's current
    /// scripted output.
    pub fn start_ports(&self) -> Vec<PortRef> {
        self.units
            .iter()
            .filter_map(|u| {
                let port = u.as_program_control()?.current_port()?;
                Some(PortRef::new(u.id().as_str(), port))
            })
            .collect()
    }

    /// Sample every DigitTrunkIn of a unit at once.
    ///
    /// Each input port follows its incoming wire (if any) back to the
    /// driving unit's current trunk output. Missing drivers, dangling
    /// wires and non-existent trunks all read zero; trunk reads are
    /// total by design.
    pub fn trunk_inputs(&self, id: &UnitId) -> TrunkInputs {
        let mut inputs = TrunkInputs::new();
        let Some(unit) = self.unit(id) else {
            return inputs;
        };

        for spec in catalogue::ports_of(unit.unit_type()) {
            if spec.kind != PortKind::DigitTrunkIn {
                continue;
            }
            let port = PortRef::new(id.as_str(), spec.name);
            if let Some(wire) = self.graph.wires_into(&port).next() {
                if let Some(value) = self
                    .unit(&wire.source.unit)
                    .and_then(|driver| driver.trunk_output(&wire.source.port))
                {
                    inputs.insert(spec.name, value);
                }
            }
        }

        inputs
    }
}

/// A single wiring violation reported by `validate`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("pulse input {port} has {count} incoming wires (at most one allowed)")]
    PulseFanIn { port: PortRef, count: usize },

    #[error("digit trunk input {port} has {count} drivers (at most one allowed)")]
    MultipleDrivers { port: PortRef, count: usize },

    #[error("wire references unknown port {port}")]
    DanglingPort { port: PortRef },

    #[error("wire {wire} connects incompatible port kinds")]
    IncompatibleWire { wire: Wire },
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decimal::DecimalWord;
    use proptest::prelude::*;

    fn editor_board() -> Plugboard {
        Plugboard::new(vec![
            Unit::program_control("ctl", vec![DecimalWord::from_i64(1)]),
            Unit::accumulator("a1"),
            Unit::accumulator("a2"),
            Unit::multiplier("mult"),
            Unit::punch("punch"),
        ])
    }

    fn output_ports() -> Vec<PortRef> {
        let mut outs = Vec::new();
        for p in ["p1", "p2", "p3", "p4", "c1", "c2", "c3", "c4"] {
            outs.push(PortRef::new("ctl", p));
        }
        for acc in ["a1", "a2"] {
            for p in ["done", "a", "s"] {
                outs.push(PortRef::new(acc, p));
            }
        }
        outs.push(PortRef::new("mult", "done"));
        outs.push(PortRef::new("mult", "product"));
        outs.push(PortRef::new("punch", "done"));
        outs
    }

    fn input_ports() -> Vec<PortRef> {
        let mut ins = Vec::new();
        for p in ["i1", "i2", "i3", "i4", "i5", "i6"] {
            ins.push(PortRef::new("ctl", p));
        }
        for acc in ["a1", "a2"] {
            for p in ["rec-alpha", "rec-beta", "sub-alpha", "sub-beta", "clear", "transmit"] {
                ins.push(PortRef::new(acc, p));
            }
            ins.push(PortRef::new(acc, "alpha"));
            ins.push(PortRef::new(acc, "beta"));
        }
        ins.push(PortRef::new("mult", "start"));
        ins.push(PortRef::new("mult", "ier"));
        ins.push(PortRef::new("mult", "icand"));
        ins.push(PortRef::new("punch", "punch"));
        ins.push(PortRef::new("punch", "in"));
        ins
    }

    proptest! {
        // A random plug/unplug sequence may be rejected wire by wire,
        // but no input port ever ends up holding more than one wire.
        #[test]
        fn editing_never_doubles_an_input(
            ops in proptest::collection::vec(
                (any::<bool>(), 0..64usize, 0..64usize),
                1..40,
            ),
        ) {
            let mut board = editor_board();
            let outs = output_ports();
            let ins = input_ports();

            for (plug, i, j) in ops {
                if plug {
                    let source = outs[i % outs.len()].clone();
                    let dest = ins[j % ins.len()].clone();
                    let _ = board.connect(source, dest);
                } else if !board.graph().is_empty() {
                    let wire = board.graph().wires()[i % board.graph().len()].clone();
                    board.disconnect(&wire).unwrap();
                }

                for port in &ins {
                    prop_assert!(board.graph().fan_in(port) <= 1);
                }
            }
        }
    }
}
