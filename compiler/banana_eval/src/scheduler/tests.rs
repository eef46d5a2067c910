#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use banana_ir::Expr;
use banana_parse::parse_source;
use crossbeam::channel::unbounded;
use pretty_assertions::assert_eq;

use super::{SchedulerConfig, ThreadFailure, ThreadId, ThreadOutcome};
use crate::{buffer_handler, EvalErrorKind, Interpreter, Value};

fn interpreter() -> Interpreter {
    Interpreter::builder().print_handler(buffer_handler()).build()
}

fn parse(interp: &Interpreter, source: &str) -> Vec<Expr> {
    parse_source(source, interp.interner()).unwrap()
}

fn spawn_all(interp: &mut Interpreter, sources: &[&str]) {
    for source in sources {
        let program = parse(interp, source);
        interp.spawn(&program);
    }
}

fn ids(outcomes: &[ThreadOutcome]) -> Vec<u32> {
    outcomes.iter().map(|o| o.id.raw()).collect()
}

#[test]
fn threads_interleave_round_robin() {
    let mut interp = interpreter();
    spawn_all(&mut interp, &["(print 1) (print 2)", "(print 3) (print 4)"]);
    let outcomes = interp.run();
    assert_eq!(interp.print_handler().output(), "1\n3\n2\n4\n");
    assert!(outcomes.iter().all(|o| o.result == Ok(Value::Undefined)));
}

#[test]
fn independent_programs_interleave_output() {
    let mut interp = interpreter();
    spawn_all(
        &mut interp,
        &[r#"(print "A") (print "A")"#, r#"(print "B") (print "B")"#],
    );
    interp.run();
    assert_eq!(interp.print_handler().output(), "A\nB\nA\nB\n");
}

#[test]
fn single_thread_runs_sequentially() {
    let mut interp = interpreter();
    spawn_all(&mut interp, &["(print 1) (print 2) (+ 20 22)"]);
    let outcomes = interp.run();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result, Ok(Value::Int(42)));
    assert_eq!(interp.print_handler().output(), "1\n2\n");
}

#[test]
fn failing_thread_does_not_disturb_others() {
    let mut interp = interpreter();
    spawn_all(
        &mut interp,
        &[
            "(print 1) (undefined_name) (print 2)",
            "(print 3) (print 4) (print 5)",
        ],
    );
    let outcomes = interp.run();
    assert_eq!(interp.print_handler().output(), "1\n3\n4\n5\n");

    assert_eq!(ids(&outcomes), vec![0, 1]);
    assert_eq!(
        outcomes[0].result.clone().map_err(|e| e.kind),
        Err(EvalErrorKind::UnboundReference {
            name: "undefined_name".to_string()
        })
    );
    assert_eq!(outcomes[0].steps, 11);
    assert_eq!(outcomes[1].result, Ok(Value::Undefined));
}

#[test]
fn failures_are_sent_on_the_error_channel() {
    let (tx, rx) = unbounded();
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .error_channel(tx)
        .build();
    spawn_all(&mut interp, &["(+ 1 2)", "(1 2)", "(define x)"]);
    interp.run();

    // `(define x)` fails on its first step, `(1 2)` on its eighth.
    let failures: Vec<ThreadFailure> = rx.try_iter().collect();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].id.raw(), 2);
    assert!(matches!(failures[0].error.kind, EvalErrorKind::Arity { .. }));
    assert_eq!(failures[1].id.raw(), 1);
    assert!(matches!(
        failures[1].error.kind,
        EvalErrorKind::NotCallable { .. }
    ));
}

#[test]
fn retirement_order_follows_completion() {
    let mut interp = interpreter();
    spawn_all(&mut interp, &["(+ 1 2) (+ 1 2)", "(+ 1 2)"]);
    let outcomes = interp.run();
    assert_eq!(ids(&outcomes), vec![1, 0]);
    assert_eq!(outcomes[0].steps, 11);
    assert_eq!(outcomes[1].steps, 22);
}

#[test]
fn empty_program_retires_on_first_visit() {
    let mut interp = interpreter();
    spawn_all(&mut interp, &[""]);
    assert_eq!(interp.live_threads(), 1);
    let outcomes = interp.run();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result, Ok(Value::Undefined));
    assert_eq!(outcomes[0].steps, 0);
}

#[test]
fn run_pass_reports_liveness() {
    let mut interp = interpreter();
    spawn_all(&mut interp, &["(+ 1 2)"]);
    for _ in 0..10 {
        assert!(interp.run_pass());
    }
    assert!(!interp.run_pass());
    assert_eq!(interp.live_threads(), 0);

    let outcomes = interp.run();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result, Ok(Value::Int(3)));
}

#[test]
fn cancelled_thread_retires_before_next_step() {
    let mut interp = interpreter();
    let source = "
        (define spin (lambda (n) (if (= n 0) 0 (spin (- n 1)))))
        (spin 1000000)
    ";
    let program = parse(&interp, source);
    let long = interp.spawn(&program);
    let program = parse(&interp, "(print 1)");
    let short = interp.spawn(&program);

    for _ in 0..5 {
        interp.run_pass();
    }
    long.cancel.cancel();
    let outcomes = interp.run();

    let long_outcome = outcomes.iter().find(|o| o.id == long.id).unwrap();
    assert_eq!(
        long_outcome.result.clone().map_err(|e| e.kind),
        Err(EvalErrorKind::Cancelled)
    );
    assert_eq!(long_outcome.steps, 5);

    let short_outcome = outcomes.iter().find(|o| o.id == short.id).unwrap();
    assert_eq!(short_outcome.result, Ok(Value::Undefined));
    assert_eq!(interp.print_handler().output(), "1\n");
}

#[test]
fn step_limit_retires_runaway_threads() {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .config(SchedulerConfig {
            step_limit: Some(5),
        })
        .build();
    spawn_all(&mut interp, &["(print 1)"]);
    let outcomes = interp.run();
    assert_eq!(
        outcomes[0].result.clone().map_err(|e| e.kind),
        Err(EvalErrorKind::StepLimitExceeded { limit: 5 })
    );
    assert_eq!(outcomes[0].steps, 5);
    assert_eq!(interp.print_handler().output(), "");
}

#[test]
fn step_limit_is_inclusive() {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .step_limit(Some(11))
        .build();
    spawn_all(&mut interp, &["(+ 1 2)"]);
    let outcomes = interp.run();
    assert_eq!(outcomes[0].result, Ok(Value::Int(3)));
}

#[test]
fn threads_share_the_global_environment() {
    let mut interp = interpreter();
    // The first thread binds `x` on its fourth step; the second looks it
    // up on its sixth.
    spawn_all(&mut interp, &["(define x 5)", "(+ x 1)"]);
    let outcomes = interp.run();
    let second = outcomes.iter().find(|o| o.id.raw() == 1).unwrap();
    assert_eq!(second.result, Ok(Value::Int(6)));
}

#[test]
fn thread_ids_display() {
    assert_eq!(ThreadId(3).to_string(), "#3");
}
