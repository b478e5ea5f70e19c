//! # ENIAC Emulator
//!
//! A plugboard-level emulator of the ENIAC (1945), the first large
//! programmable electronic calculator. Its "program" was the physical
//! wiring between functional units; this crate emulates exactly that:
//! a graph of typed port-to-port cables, and a pulse-propagation engine
//! that advances discrete control pulses through the graph, driving
//! digit-serial decimal arithmetic in accumulators, the high-speed
//! multiplier and the card punch.

pub mod decimal;
pub mod units;
pub mod board;
pub mod engine;

// Re-export commonly used types
pub use decimal::{Digit, DecimalWord, Sign};
pub use units::{
    ConfigurationError, PunchEntry, RegisterState, Unit, UnitType, port_kind, ports_of,
};
pub use board::{
    BoardFileError, Plugboard, PlugboardDescription, PortKind, PortRef, SignalClass, UnitId,
    Violation, Wire, WiringError, WiringGraph, load_board, save_board,
};
pub use engine::{
    default_session, CancelToken, RunOutcome, RunSummary, Scheduler, SchedulerState, Session,
    TickResult,
};
