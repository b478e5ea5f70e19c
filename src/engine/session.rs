//! A simulation session: one plugboard and its scheduler.
//!
//! Everything a driver (CLI, editor, test harness) needs is on this one
//! owned object: no globals, no callbacks, no I/O. Two sessions are
//! fully independent; concurrent use of a single session is the
//! caller's problem to serialize, exactly as with a single physical
//! machine.

use crate::board::graph::{Wire, WiringError};
use crate::board::plugboard::{Plugboard, Violation};
use crate::board::port::{PortRef, UnitId};
use crate::board::snapshot::PlugboardDescription;
use crate::engine::scheduler::{CancelToken, RunSummary, Scheduler, SchedulerState, TickResult};
use crate::units::{ConfigurationError, PunchEntry};

/// An independent simulation session.
#[derive(Debug, Clone)]
pub struct Session {
    plugboard: Plugboard,
    scheduler: Scheduler,
}

impl Session {
    /// Create a session over a plugboard, seeded at the start of its
    /// program control's script.
    pub fn new(plugboard: Plugboard) -> Self {
        let scheduler = Scheduler::new(&plugboard);
        Self { plugboard, scheduler }
    }

    /// The plugboard.
    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    /// Scheduler state.
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Ticks executed since the last reset.
    pub fn tick(&self) -> u64 {
        self.scheduler.tick()
    }

    // ---- editor surface -------------------------------------------------

    /// Plug a cable. Reported synchronously; the board is unchanged on
    /// failure.
    pub fn connect(&mut self, source: PortRef, dest: PortRef) -> Result<Wire, WiringError> {
        self.plugboard.connect(source, dest)
    }

    /// Unplug a cable.
    pub fn disconnect(&mut self, wire: &Wire) -> Result<(), WiringError> {
        self.plugboard.disconnect(wire)
    }

    /// Check the board for wiring violations.
    pub fn validate(&self) -> Vec<Violation> {
        self.plugboard.validate()
    }

    // ---- driver surface -------------------------------------------------

    /// Execute one tick.
    pub fn step(&mut self) -> TickResult {
        self.scheduler.step(&mut self.plugboard)
    }

    /// Run until halted, budget exhaustion, or cancellation.
    pub fn run(&mut self, max_ticks: u64, cancel: &CancelToken) -> RunSummary {
        self.scheduler.run(&mut self.plugboard, max_ticks, cancel)
    }

    /// Zero all registers and rewind to the start of the script,
    /// preserving the wiring.
    pub fn reset(&mut self) {
        self.scheduler.reset(&mut self.plugboard);
    }

    // ---- persistence surface --------------------------------------------

    /// Snapshot the board; with `include_register_state` false the
    /// registers are emitted zeroed.
    pub fn snapshot(&self, include_register_state: bool) -> PlugboardDescription {
        self.plugboard.describe(include_register_state)
    }

    /// Replace the board from a description.
    ///
    /// The description is validated in full first; on any error the
    /// current board and scheduler are left untouched (atomic swap).
    pub fn load(&mut self, desc: &PlugboardDescription) -> Result<(), ConfigurationError> {
        let board = Plugboard::from_description(desc)?;
        self.plugboard = board;
        self.scheduler.seed(&self.plugboard);
        Ok(())
    }

    // ---- observability --------------------------------------------------

    /// The punch's output record (empty if the board has no punch).
    pub fn punch_record(&self) -> &[PunchEntry] {
        self.plugboard
            .units()
            .iter()
            .find_map(|u| u.as_punch())
            .map(|p| p.record())
            .unwrap_or(&[])
    }

    /// An accumulator's current value, by unit id.
    pub fn accumulator_value(&self, id: &str) -> Option<i64> {
        self.plugboard
            .unit(&UnitId::new(id))?
            .as_accumulator()
            .map(|a| a.value().to_i64())
    }
}
