//! ENIAC Emulator - CLI Entry Point
//!
//! Commands:
//! - `eniac-emu run [board.json]` - Run a board (default: built-in scenario)
//! - `eniac-emu validate <board.json>` - Check a board's wiring
//! - `eniac-emu export <output.json>` - Write the built-in board to JSON
//! - `eniac-emu test` - Built-in self-test

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eniac-emu")]
#[command(version = "0.1.0")]
#[command(about = "A plugboard-level emulator of the ENIAC (1945) calculator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a board until it halts
    Run {
        /// Path to a board JSON file (omit for the built-in scenario)
        board: Option<String>,
        /// Maximum number of ticks to run (default: 10000)
        #[arg(short, long, default_value = "10000")]
        max_ticks: u64,
        /// Show per-tick trace output
        #[arg(short, long)]
        trace: bool,
    },
    /// Check a board file for wiring violations
    Validate {
        /// Path to the board JSON file
        board: String,
    },
    /// Write the built-in scenario board to a JSON file
    Export {
        /// Output board file
        output: String,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { board, max_ticks, trace }) => {
            run_board(board.as_deref(), max_ticks, trace);
        }
        Some(Commands::Validate { board }) => {
            validate_board(&board);
        }
        Some(Commands::Export { output }) => {
            export_board(&output);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("ENIAC Emulator v0.1.0");
            println!("A plugboard-level emulator of the 1945 machine");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_decimal_primitives();
        }
    }
}

fn load_session(path: Option<&str>) -> eniac::Session {
    use eniac::{default_session, load_board, Plugboard, Session};

    let Some(path) = path else {
        return default_session();
    };

    println!("📂 Loading board: {}", path);
    let desc = match load_board(path) {
        Ok(desc) => desc,
        Err(e) => {
            eprintln!("❌ Failed to load board: {}", e);
            std::process::exit(1);
        }
    };
    match Plugboard::from_description(&desc) {
        Ok(board) => Session::new(board),
        Err(e) => {
            eprintln!("❌ Invalid board: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_board(path: Option<&str>, max_ticks: u64, trace: bool) {
    use eniac::{CancelToken, RunOutcome};

    let mut session = load_session(path);
    println!(
        "🔧 Running ({} units, {} wires)",
        session.plugboard().units().len(),
        session.plugboard().graph().len()
    );
    println!();
    println!("━━━ Execution ━━━");

    let summary = if trace {
        let mut ticks = 0u64;
        let outcome = loop {
            if session.state() == eniac::SchedulerState::Halted {
                break RunOutcome::Halted;
            }
            if ticks >= max_ticks {
                break RunOutcome::BudgetExhausted;
            }
            let result = session.step();
            ticks += 1;
            let fired: Vec<&str> = result.fired_units.iter().map(|id| id.as_str()).collect();
            println!(
                "tick {:03}: fired [{}] -> {} active",
                result.tick,
                fired.join(", "),
                result.activated_ports.len()
            );
        };
        eniac::RunSummary { ticks, outcome }
    } else {
        session.run(max_ticks, &CancelToken::new())
    };

    println!();
    println!("━━━ Result ━━━");
    println!("Ticks: {}", summary.ticks);
    println!("Outcome: {:?}", summary.outcome);

    println!();
    println!("━━━ Punch Record ━━━");
    if session.punch_record().is_empty() {
        println!("(no cards punched)");
    } else {
        for entry in session.punch_record() {
            println!("step {:2}: {} ({})", entry.step, entry.value, entry.value.to_i64());
        }
    }

    if summary.outcome == RunOutcome::BudgetExhausted {
        println!();
        println!("⚠️  Reached tick budget ({}). Use --max-ticks to increase.", max_ticks);
    }
}

fn validate_board(path: &str) {
    use eniac::{load_board, Plugboard};

    println!("🔍 Validating: {}", path);

    let desc = match load_board(path) {
        Ok(desc) => desc,
        Err(e) => {
            eprintln!("❌ Failed to load board: {}", e);
            std::process::exit(1);
        }
    };

    // from_description already rejects illegal boards; validate() gives
    // the full violation list for editor-style feedback
    match Plugboard::from_description(&desc) {
        Ok(board) => {
            let violations = board.validate();
            if violations.is_empty() {
                println!("✓ Board is valid ({} units, {} wires)",
                    board.units().len(), board.graph().len());
            } else {
                for v in &violations {
                    println!("✗ {}", v);
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Invalid board: {}", e);
            std::process::exit(1);
        }
    }
}

fn export_board(output: &str) {
    use eniac::{default_session, save_board};

    let session = default_session();
    let desc = session.snapshot(false);

    if let Err(e) = save_board(output, &desc) {
        eprintln!("❌ Failed to save board: {}", e);
        std::process::exit(1);
    }

    println!("✓ Saved built-in board to {}", output);
}

fn demo_decimal_primitives() {
    use eniac::decimal::{arith, DecimalWord};

    println!("━━━ Digit-Serial Decimal Demo ━━━");
    println!();

    println!("DecimalWord (10 decades + sign):");
    let a = DecimalWord::from_i64(42);
    let b = DecimalWord::from_i64(-17);
    println!("  42 on the panel: {}", a);
    println!("  -17 on the panel: {}", b);
    println!();

    println!("Accumulator arithmetic:");
    let x = DecimalWord::from_i64(12345);
    let y = DecimalWord::from_i64(6789);
    let (sum, _) = arith::add(&x, &y);
    let (diff, _) = arith::subtract(&x, &y);
    let (prod, _) = arith::multiply(&x, &y);

    println!("  {} + {} = {}", x.to_i64(), y.to_i64(), sum.to_i64());
    println!("  {} - {} = {}", x.to_i64(), y.to_i64(), diff.to_i64());
    println!("  {} × {} = {}", x.to_i64(), y.to_i64(), prod.to_i64());
    println!();

    println!("✓ Core decimal primitives working!");
}

fn run_self_test() {
    use eniac::decimal::{arith, DecimalWord};
    use eniac::{default_session, CancelToken, PortRef, RunOutcome};

    println!("━━━ ENIAC Emulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    // Test 1: Conversion roundtrip
    print!("DecimalWord conversion roundtrip... ");
    let mut ok = true;
    for val in [-9_999_999_999, -100, -1, 0, 1, 100, 9_999_999_999] {
        if DecimalWord::from_i64(val).to_i64() != val {
            ok = false;
            break;
        }
    }
    if ok { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 2: Additive inverse
    print!("Additive inverse (a + -a = 0)... ");
    ok = true;
    for val in [-1000i64, -1, 0, 1, 1000] {
        let a = DecimalWord::from_i64(val);
        let (result, _) = arith::add(&a, &a.negated());
        if !result.is_zero() {
            ok = false;
            break;
        }
    }
    if ok { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 3: Multiplication correctness
    print!("Multiplication correctness... ");
    let (prod, _) = arith::multiply(
        &DecimalWord::from_i64(123),
        &DecimalWord::from_i64(456),
    );
    if prod.to_i64() == 56_088 {
        println!("✓");
        passed += 1;
    } else {
        println!("✗ (got {}, expected 56088)", prod.to_i64());
        failed += 1;
    }

    // Test 4: Shift (×10) correctness
    print!("Shift left (×10) correctness... ");
    let shifted = arith::shift_left(&DecimalWord::from_i64(1), 3);
    if shifted.to_i64() == 1000 {
        println!("✓");
        passed += 1;
    } else {
        println!("✗ (got {}, expected 1000)", shifted.to_i64());
        failed += 1;
    }

    // Test 5: Reference scenario
    print!("Reference scenario (2×3)+1-2 = 5... ");
    let mut session = default_session();
    let summary = session.run(100, &CancelToken::new());
    let record = session.punch_record();
    if summary.outcome == RunOutcome::Halted
        && record.len() == 1
        && record[0].value.to_i64() == 5
    {
        println!("✓");
        passed += 1;
    } else {
        println!("✗");
        failed += 1;
    }

    // Test 6: Cycle safety under a tick budget
    print!("Pulse cycle respects tick budget... ");
    let mut looped = default_session();
    looped
        .connect(PortRef::new("a3", "done"), PortRef::new("a3", "rec-beta"))
        .unwrap();
    let summary = looped.run(30, &CancelToken::new());
    if summary.outcome == RunOutcome::BudgetExhausted {
        println!("✓");
        passed += 1;
    } else {
        println!("✗");
        failed += 1;
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
