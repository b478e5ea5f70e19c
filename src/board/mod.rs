//! The plugboard: typed ports, the wiring graph connecting them, and the
//! serialization-neutral snapshot of the whole board.
//!
//! Programs for this machine are not instructions in memory; they are the
//! set of cables plugged between unit ports. This module owns that graph
//! and its legality rules. Pulse propagation over the graph lives in
//! `crate::engine`.

pub mod port;
pub mod graph;
pub mod plugboard;
pub mod snapshot;

pub use port::{PortKind, PortRef, SignalClass, UnitId};
pub use graph::{Wire, WiringGraph, WiringError};
pub use plugboard::{Plugboard, Violation};
pub use snapshot::{
    PlugboardDescription, UnitDescription, WireDescription,
    load_board, save_board, BoardFileError,
};
