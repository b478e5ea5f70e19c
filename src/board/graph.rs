//! The wiring graph: the set of cables currently plugged into the board.
//!
//! Cables are kept in insertion order, and every query walks them in
//! that order. Deterministic ordering is what makes a run replayable:
//! when one pulse fans out to several units, delivery order is the
//! order the operator plugged the cables in.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::board::port::{PortKind, PortRef};

/// A directed cable between two ports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire {
    /// The output port the cable starts at.
    pub source: PortRef,
    /// The input port the cable ends at.
    pub dest: PortRef,
}

impl Wire {
    /// Create a wire.
    pub fn new(source: PortRef, dest: PortRef) -> Self {
        Self { source, dest }
    }
}

impl std::fmt::Display for Wire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

/// The mutable set of cables, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringGraph {
    wires: Vec<Wire>,
}

impl WiringGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self { wires: Vec::new() }
    }

    /// All wires in insertion order.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Number of wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Check if no cables are plugged.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Insert a wire at the end of the insertion order.
    ///
    /// Legality (kind compatibility, fan-in limits) is checked by
    /// `Plugboard::connect`, which knows the unit catalogue; the graph
    /// itself only stores cables.
    pub fn insert(&mut self, wire: Wire) {
        self.wires.push(wire);
    }

    /// Remove a wire.
    ///
    /// The graph is left untouched if the wire is not present.
    pub fn disconnect(&mut self, wire: &Wire) -> Result<(), WiringError> {
        match self.wires.iter().position(|w| w == wire) {
            Some(index) => {
                self.wires.remove(index);
                Ok(())
            }
            None => Err(WiringError::WireNotFound(wire.clone())),
        }
    }

    /// Wires leaving `port`, in insertion order.
    pub fn wires_from<'a>(&'a self, port: &PortRef) -> impl Iterator<Item = &'a Wire> + 'a {
        let port = port.clone();
        self.wires.iter().filter(move |w| w.source == port)
    }

    /// Wires arriving at `port`, in insertion order.
    pub fn wires_into<'a>(&'a self, port: &PortRef) -> impl Iterator<Item = &'a Wire> + 'a {
        let port = port.clone();
        self.wires.iter().filter(move |w| w.dest == port)
    }

    /// Number of wires arriving at `port`.
    pub fn fan_in(&self, port: &PortRef) -> usize {
        self.wires.iter().filter(|w| &w.dest == port).count()
    }
}

/// Errors reported synchronously by connect/disconnect. The graph is
/// never left partially mutated by a failed call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WiringError {
    #[error("incompatible port kinds: {from} is {from_kind:?}, {to} is {to_kind:?}")]
    IncompatiblePortKind {
        from: PortRef,
        from_kind: PortKind,
        to: PortRef,
        to_kind: PortKind,
    },

    #[error("port {0} already carries a wire")]
    PortAlreadyBound(PortRef),

    #[error("no such port on the board: {0}")]
    UnknownPort(PortRef),

    #[error("wire not found: {0}")]
    WireNotFound(Wire),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(a: &str, ap: &str, b: &str, bp: &str) -> Wire {
        Wire::new(PortRef::new(a, ap), PortRef::new(b, bp))
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut graph = WiringGraph::new();
        let w1 = wire("ctl", "p1", "a1", "rec-alpha");
        let w2 = wire("ctl", "p1", "a2", "rec-alpha");
        let w3 = wire("ctl", "p2", "mult", "start");
        graph.insert(w1.clone());
        graph.insert(w2.clone());
        graph.insert(w3.clone());

        let from_p1 = PortRef::new("ctl", "p1");
        let out: Vec<_> = graph.wires_from(&from_p1).collect();
        assert_eq!(out, vec![&w1, &w2]);
    }

    #[test]
    fn test_query_iterators_outlive_the_port() {
        let mut graph = WiringGraph::new();
        let w = wire("ctl", "p1", "a1", "rec-alpha");
        graph.insert(w.clone());

        // The returned iterator borrows only the graph, not the port
        let first = {
            let port = PortRef::new("a1", "rec-alpha");
            graph.wires_into(&port).next()
        };
        assert_eq!(first, Some(&w));
    }

    #[test]
    fn test_disconnect() {
        let mut graph = WiringGraph::new();
        let w = wire("a1", "done", "ctl", "i1");
        graph.insert(w.clone());

        assert_eq!(graph.disconnect(&w), Ok(()));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_disconnect_missing() {
        let mut graph = WiringGraph::new();
        graph.insert(wire("a1", "done", "ctl", "i1"));

        let absent = wire("a2", "done", "ctl", "i2");
        let err = graph.disconnect(&absent).unwrap_err();
        assert!(matches!(err, WiringError::WireNotFound(_)));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_fan_in() {
        let mut graph = WiringGraph::new();
        graph.insert(wire("a1", "a", "mult", "ier"));
        graph.insert(wire("a2", "a", "mult", "icand"));

        assert_eq!(graph.fan_in(&PortRef::new("mult", "ier")), 1);
        assert_eq!(graph.fan_in(&PortRef::new("mult", "icand")), 1);
        assert_eq!(graph.fan_in(&PortRef::new("mult", "start")), 0);
    }
}
