//! The execution scheduler: a step-synchronous pulse state machine.
//!
//! The scheduler never mutates the wiring graph; it owns only the set
//! of pulse outputs active this generation, the tick counter and the
//! Idle/Stepping/Halted state. Unit registers live in the plugboard and
//! are driven through `Unit::execute`.
//!
//! Determinism: active ports are visited in activation order and their
//! wires in insertion order, so a run over a given board always fires
//! the same units in the same order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::board::plugboard::Plugboard;
use crate::board::port::{PortRef, UnitId};
use crate::units::{ExecContext, TrunkInputs};

/// Scheduler execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    /// No pulse in flight; ready for the next step.
    Idle,
    /// Transient, while one generation is propagating.
    Stepping,
    /// No pulse output is live; terminal until reset.
    Halted,
}

/// Observable outcome of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// The tick that was just executed (1-based).
    pub tick: u64,
    /// Units that fired this tick, in firing order.
    pub fired_units: Vec<UnitId>,
    /// Pulse outputs activated for the next tick.
    pub activated_ports: Vec<PortRef>,
    /// Set when this tick drained the pulse chain.
    pub halted: bool,
}

/// Why a `run` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pulse chain drained; the machine halted.
    Halted,
    /// The tick budget ran out first (e.g. a control-pulse cycle).
    BudgetExhausted,
    /// The cancel token was raised.
    Cancelled,
}

/// Summary of a `run` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed by this call.
    pub ticks: u64,
    /// Why the run stopped.
    pub outcome: RunOutcome,
}

/// Clonable cooperative cancellation flag, checked once per tick.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an unraised token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the next tick boundary observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Reserved for unrecoverable internal invariant violations.
///
/// Normal execution is total: undriven trunks read zero and malformed
/// wires deliver nothing, so no variant is produced today.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("scheduler invariant violated: {0}")]
    InvariantViolation(String),
}

/// The pulse-propagation scheduler.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    active: Vec<PortRef>,
    tick: u64,
}

impl Scheduler {
    /// Create a scheduler seeded from the board's program control.
    pub fn new(board: &Plugboard) -> Self {
        let mut scheduler = Self {
            state: SchedulerState::Idle,
            active: Vec::new(),
            tick: 0,
        };
        scheduler.seed(board);
        scheduler
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks executed since the last reset.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Pulse outputs active for the next tick.
    pub fn active_ports(&self) -> &[PortRef] {
        &self.active
    }

    /// Check for the terminal state.
    pub fn is_halted(&self) -> bool {
        self.state == SchedulerState::Halted
    }

    /// Re-seed the active set from the board's program control without
    /// touching unit registers (used after loading a snapshot).
    pub fn seed(&mut self, board: &Plugboard) {
        self.tick = 0;
        self.active = board.start_ports();
        self.state = if self.active.is_empty() {
            SchedulerState::Halted
        } else {
            SchedulerState::Idle
        };
    }

    /// Zero every unit register and return to the start of the script.
    /// The wiring graph is not touched.
    pub fn reset(&mut self, board: &mut Plugboard) {
        board.reset_units();
        self.seed(board);
    }

    /// Execute one tick.
    ///
    /// From `Halted` this is a no-op that reports the halted flag; the
    /// tick interface has no error channel because execution is total.
    pub fn step(&mut self, board: &mut Plugboard) -> TickResult {
        if self.state == SchedulerState::Halted {
            return TickResult {
                tick: self.tick,
                fired_units: Vec::new(),
                activated_ports: Vec::new(),
                halted: true,
            };
        }

        self.state = SchedulerState::Stepping;
        let ctx = ExecContext {
            step_index: board.program_step_index(),
            tick: self.tick + 1,
        };

        // Delivery: follow each active output's wires in insertion
        // order. A unit fires at most once per tick; the first pulse to
        // reach it selects the operation, later pulses this tick are
        // delivered but ignored.
        let mut firing: Vec<(UnitId, String)> = Vec::new();
        for port in &self.active {
            for wire in board.graph().wires_from(port) {
                let dest = &wire.dest;
                if board.unit(&dest.unit).is_none() {
                    continue; // malformed wire: deliver nothing
                }
                if firing.iter().any(|(id, _)| id == &dest.unit) {
                    continue;
                }
                firing.push((dest.unit.clone(), dest.port.clone()));
            }
        }

        // Read phase: sample every firing unit's trunk inputs against
        // the pre-tick register state, so execution order within a tick
        // cannot leak into combinational reads.
        let jobs: Vec<(UnitId, String, TrunkInputs)> = firing
            .into_iter()
            .map(|(id, pulse)| {
                let inputs = board.trunk_inputs(&id);
                (id, pulse, inputs)
            })
            .collect();

        // Execute phase.
        let mut fired_units = Vec::with_capacity(jobs.len());
        let mut next_active: Vec<PortRef> = Vec::new();
        for (id, pulse, inputs) in jobs {
            if let Some(unit) = board.unit_mut(&id) {
                let outs = unit.execute(&pulse, &inputs, &ctx);
                next_active.extend(
                    outs.into_iter().map(|name| PortRef::new(id.as_str(), name)),
                );
                fired_units.push(id);
            }
        }

        self.tick += 1;
        self.active = next_active;
        let halted = self.active.is_empty();
        self.state = if halted {
            SchedulerState::Halted
        } else {
            SchedulerState::Idle
        };

        TickResult {
            tick: self.tick,
            fired_units,
            activated_ports: self.active.clone(),
            halted,
        }
    }

    /// Step until halted, the tick budget is spent, or the cancel token
    /// is raised. The token is checked once per tick, so a wiring cycle
    /// can never hang the caller if a finite budget is supplied.
    pub fn run(
        &mut self,
        board: &mut Plugboard,
        max_ticks: u64,
        cancel: &CancelToken,
    ) -> RunSummary {
        let mut ticks = 0;

        while !self.is_halted() {
            if ticks >= max_ticks {
                return RunSummary { ticks, outcome: RunOutcome::BudgetExhausted };
            }
            if cancel.is_cancelled() {
                return RunSummary { ticks, outcome: RunOutcome::Cancelled };
            }
            self.step(board);
            ticks += 1;
        }

        RunSummary { ticks, outcome: RunOutcome::Halted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::port::PortRef;
    use crate::decimal::DecimalWord;
    use crate::units::Unit;

    fn loader_board() -> Plugboard {
        // ctl presents 42 on c1; p1 pulses a1 to receive it
        let mut board = Plugboard::new(vec![
            Unit::program_control("ctl", vec![DecimalWord::from_i64(42)]),
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

    fn acc_value(board: &Plugboard, id: &str) -> i64 {
        board
            .unit(&UnitId::new(id))
            .unwrap()
            .as_accumulator()
            .unwrap()
            .value()
            .to_i64()
    }

    #[test]
    fn test_single_step_fires_wired_unit() {
        let mut board = loader_board();
        let mut scheduler = Scheduler::new(&board);

        let result = scheduler.step(&mut board);

        assert_eq!(result.tick, 1);
        assert_eq!(result.fired_units, vec![UnitId::new("a1")]);
        assert_eq!(result.activated_ports, vec![PortRef::new("a1", "done")]);
        assert!(!result.halted);
        assert_eq!(acc_value(&board, "a1"), 42);
    }

    #[test]
    fn test_unwired_done_drains_to_halt() {
        let mut board = loader_board();
        let mut scheduler = Scheduler::new(&board);

        scheduler.step(&mut board); // a1 fires, activates done
        let result = scheduler.step(&mut board); // done wired nowhere

        assert!(result.halted);
        assert!(scheduler.is_halted());
    }

    #[test]
    fn test_step_from_halted_is_noop() {
        let mut board = loader_board();
        let mut scheduler = Scheduler::new(&board);
        scheduler.run(&mut board, 100, &CancelToken::new());
        let tick = scheduler.tick();

        let result = scheduler.step(&mut board);
        assert!(result.halted);
        assert!(result.fired_units.is_empty());
        assert_eq!(scheduler.tick(), tick);
        assert_eq!(acc_value(&board, "a1"), 42);
    }

    #[test]
    fn test_idempotent_firing_first_wire_wins() {
        // p1 fans out to two pulse inputs on the same accumulator; the
        // first-plugged cable selects the operation
        let mut board = Plugboard::new(vec![
            Unit::program_control("ctl", vec![DecimalWord::from_i64(42)]),
            Unit::accumulator("a1"),
        ]);
        board
            .connect(PortRef::new("ctl", "c1"), PortRef::new("a1", "alpha"))
            .unwrap();
        board
            .connect(PortRef::new("ctl", "p1"), PortRef::new("a1", "rec-alpha"))
            .unwrap();
        board
            .connect(PortRef::new("ctl", "p1"), PortRef::new("a1", "clear"))
            .unwrap();
        let mut scheduler = Scheduler::new(&board);

        let result = scheduler.step(&mut board);

        // One firing, not two: rec-alpha won, clear was ignored
        assert_eq!(result.fired_units, vec![UnitId::new("a1")]);
        assert_eq!(acc_value(&board, "a1"), 42);
    }

    #[test]
    fn test_pulse_cycle_exhausts_budget() {
        // a1.done feeds back into a1: once started it fires forever
        let mut board = loader_board();
        board
            .connect(PortRef::new("a1", "done"), PortRef::new("a1", "rec-beta"))
            .unwrap();
        let mut scheduler = Scheduler::new(&board);

        let summary = scheduler.run(&mut board, 50, &CancelToken::new());

        assert_eq!(summary.outcome, RunOutcome::BudgetExhausted);
        assert_eq!(summary.ticks, 50);
        assert!(!scheduler.is_halted());
    }

    #[test]
    fn test_cancel_token_stops_run() {
        let mut board = loader_board();
        board
            .connect(PortRef::new("a1", "done"), PortRef::new("a1", "rec-beta"))
            .unwrap();
        let mut scheduler = Scheduler::new(&board);

        let cancel = CancelToken::new();
        cancel.cancel();
        let summary = scheduler.run(&mut board, 1_000_000, &cancel);

        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_reset_zeroes_registers_keeps_wires() {
        let mut board = loader_board();
        let mut scheduler = Scheduler::new(&board);
        scheduler.run(&mut board, 100, &CancelToken::new());
        assert_eq!(acc_value(&board, "a1"), 42);
        let wires_before = board.graph().wires().to_vec();

        scheduler.reset(&mut board);

        assert_eq!(acc_value(&board, "a1"), 0);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.tick(), 0);
        assert_eq!(board.graph().wires(), wires_before.as_slice());
    }

    #[test]
    fn test_board_without_control_halts_immediately() {
        let board = Plugboard::new(vec![Unit::accumulator("a1")]);
        let scheduler = Scheduler::new(&board);
        assert!(scheduler.is_halted());
    }
}
