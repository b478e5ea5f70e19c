//! The built-in reference board.
//!
//! Reproduces the classic demo computation (2 x 3) + 1 - 2 = 5 purely
//! through wiring: the constant trunks load 1, 2, 3 into three
//! accumulators, the multiplier forms A2 x A3 into A4, A5 collects
//! A1 + A4, A7 collects A5 and subtracts A2, and the punch captures A7.
//!
//! Each program step's completion pulse feeds a step input of the
//! program control, which then activates the next scripted output.
//! Sequencing is a property of the wiring, not of the engine.

use crate::board::plugboard::Plugboard;
use crate::board::port::PortRef;
use crate::decimal::DecimalWord;
use crate::engine::session::Session;
use crate::units::Unit;

/// Build the reference session: units, constants and default wiring.
pub fn default_session() -> Session {
    let mut board = Plugboard::new(vec![
        Unit::program_control(
            "ctl",
            vec![
                DecimalWord::from_i64(1),
                DecimalWord::from_i64(2),
                DecimalWord::from_i64(3),
            ],
        ),
        Unit::accumulator("a1"),
        Unit::accumulator("a2"),
        Unit::accumulator("a3"),
        Unit::accumulator("a4"),
        Unit::accumulator("a5"),
        Unit::accumulator("a7"),
        Unit::multiplier("mult"),
        Unit::punch("punch"),
    ]);

    let wires = [
        // Digit trunks: constant transmitters into the operand
        // accumulators, operands into the multiplier, value chains
        ("ctl", "c1", "a1", "alpha"),
        ("ctl", "c2", "a2", "alpha"),
        ("ctl", "c3", "a3", "alpha"),
        ("a2", "a", "mult", "ier"),
        ("a3", "a", "mult", "icand"),
        ("mult", "product", "a4", "alpha"),
        ("a1", "a", "a5", "alpha"),
        ("a4", "a", "a5", "beta"),
        ("a5", "a", "a7", "alpha"),
        ("a2", "a", "a7", "beta"),
        ("a7", "a", "punch", "in"),
        // Program pulses: p1 loads all three operands; each completion
        // pulse steps the control on to the next scripted output
        ("ctl", "p1", "a1", "rec-alpha"),
        ("ctl", "p1", "a2", "rec-alpha"),
        ("ctl", "p1", "a3", "rec-alpha"),
        ("a1", "done", "ctl", "i1"),
        ("ctl", "p2", "mult", "start"),
        ("mult", "done", "a4", "rec-alpha"),
        ("a4", "done", "ctl", "i2"),
        ("ctl", "p3", "a5", "rec-alpha"),
        ("a5", "done", "ctl", "i3"),
        ("ctl", "p4", "a5", "rec-beta"),
        ("ctl", "p5", "a7", "rec-alpha"),
        ("a7", "done", "ctl", "i4"),
        ("ctl", "p6", "a7", "sub-beta"),
        ("ctl", "p7", "punch", "punch"),
        ("punch", "done", "ctl", "i5"),
    ];

    for (src_unit, src_port, dst_unit, dst_port) in wires {
        board
            .connect(
                PortRef::new(src_unit, src_port),
                PortRef::new(dst_unit, dst_port),
            )
            .expect("default wiring must be legal");
    }

    debug_assert!(board.validate().is_empty());
    Session::new(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scheduler::{CancelToken, RunOutcome};

    #[test]
    fn test_default_wiring_is_valid() {
        let session = default_session();
        assert!(session.validate().is_empty());
    }

    #[test]
    fn test_reference_computation() {
        let mut session = default_session();
        let summary = session.run(100, &CancelToken::new());

        assert_eq!(summary.outcome, RunOutcome::Halted);

        let record = session.punch_record();
        assert_eq!(record.len(), 1);
        assert_eq!(record[0].value.to_i64(), 5);
        // The punch fires on scripted step p7 (0-based index 6)
        assert_eq!(record[0].step, 6);

        assert_eq!(session.accumulator_value("a1"), Some(1));
        assert_eq!(session.accumulator_value("a4"), Some(6));
        assert_eq!(session.accumulator_value("a5"), Some(7));
        assert_eq!(session.accumulator_value("a7"), Some(5));
    }

    #[test]
    fn test_reference_tick_count_is_stable() {
        // Deterministic replay: the same wiring always takes the same
        // number of ticks to halt
        let mut a = default_session();
        let mut b = default_session();

        let sa = a.run(100, &CancelToken::new());
        let sb = b.run(100, &CancelToken::new());

        assert_eq!(sa, sb);
        assert_eq!(sa.ticks, 16);
    }

    #[test]
    fn test_rerun_after_reset() {
        let mut session = default_session();
        session.run(100, &CancelToken::new());
        session.reset();
        session.run(100, &CancelToken::new());

        // One fresh punch entry, not an accumulation of two runs
        assert_eq!(session.punch_record().len(), 1);
        assert_eq!(session.punch_record()[0].value.to_i64(), 5);
    }
}
