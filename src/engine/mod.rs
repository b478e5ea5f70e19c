//! Pulse-propagation execution engine.
//!
//! One tick of the scheduler is one propagation generation: follow the
//! active pulse outputs to their wired destinations, fire each reached
//! unit once, and collect the pulses those operations emit for the next
//! tick. The session object wraps a plugboard and a scheduler into the
//! single passable piece of state a driver or UI works against.

pub mod scheduler;
pub mod session;
pub mod scenario;

pub use scheduler::{
    CancelToken, ExecutionError, RunOutcome, RunSummary, Scheduler, SchedulerState, TickResult,
};
pub use session::Session;
pub use scenario::default_session;
