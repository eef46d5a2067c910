#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use banana_ir::{Expr, Span};
use banana_parse::parse_source;
use pretty_assertions::assert_eq;

use super::Interpreter;
use crate::{buffer_handler, silent_handler, ArgCount, EvalErrorKind, EvalResult, Value};

fn parse(interp: &Interpreter, source: &str) -> Vec<Expr> {
    match parse_source(source, interp.interner()) {
        Ok(program) => program,
        Err(e) => panic!("parse failed: {e}"),
    }
}

fn eval(source: &str) -> EvalResult {
    let interp = Interpreter::builder().print_handler(silent_handler()).build();
    let program = parse(&interp, source);
    interp.eval_program(&program)
}

fn eval_ok(source: &str) -> Value {
    match eval(source) {
        Ok(value) => value,
        Err(e) => panic!("evaluation of {source:?} failed: {e}"),
    }
}

fn eval_err(source: &str) -> EvalErrorKind {
    match eval(source) {
        Ok(value) => panic!("expected {source:?} to fail, got {value}"),
        Err(e) => e.kind,
    }
}

/// Evaluate and return what `print` wrote.
fn output(source: &str) -> String {
    let interp = Interpreter::builder().print_handler(buffer_handler()).build();
    let program = parse(&interp, source);
    interp.eval_program(&program).unwrap();
    interp.print_handler().output()
}

const FAC: &str = "
    (define fac
        (lambda (x)
            (if (= x 0)
                1
                (* x (fac (- x 1))))))
";

// Arithmetic

#[test]
fn nested_arithmetic() {
    assert_eq!(eval_ok("(+ 1 (* 2 3))"), Value::Int(7));
    assert_eq!(eval_ok("(- 10 (+ 1 2) 4)"), Value::Int(3));
}

#[test]
fn unary_minus_is_identity() {
    assert_eq!(eval_ok("(- 5)"), Value::Int(5));
}

#[test]
fn empty_fold_identities() {
    assert_eq!(eval_ok("(*)"), Value::Int(1));
    assert_eq!(eval_ok("(+)"), Value::Int(0));
}

#[test]
fn negative_literals() {
    assert_eq!(eval_ok("(+ -3 1)"), Value::Int(-2));
}

#[test]
fn primitives_are_values() {
    assert_eq!(eval_ok("(define plus +) (plus 2 2)"), Value::Int(4));
    assert_eq!(eval_ok("(= + +)"), Value::Bool(true));
}

// Conditionals

#[test]
fn if_picks_branches() {
    assert_eq!(eval_ok("(if 1 10 20)"), Value::Int(10));
    assert_eq!(eval_ok("(if (= 1 2) 10 20)"), Value::Int(20));
}

#[test]
fn zero_is_truthy() {
    assert_eq!(eval_ok("(if 0 10 20)"), Value::Int(10));
}

#[test]
fn false_without_else_is_undefined() {
    assert_eq!(eval_ok("(if (= 1 2) 10)"), Value::Undefined);
}

#[test]
fn untaken_branch_is_not_evaluated() {
    assert_eq!(eval_ok("(if (= 1 1) 1 (undefined_name))"), Value::Int(1));
    assert_eq!(output("(if (= 1 2) (print 1) (print 2))"), "2\n");
}

// Definitions

#[test]
fn define_then_use() {
    assert_eq!(eval_ok("(define x 5) (+ x 1)"), Value::Int(6));
}

#[test]
fn define_yields_undefined() {
    assert_eq!(eval_ok("(define x 5)"), Value::Undefined);
}

#[test]
fn duplicate_definition_in_global_scope() {
    let err = eval("(define x 1) (define x 2)").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::DuplicateDefinition {
            name: "x".to_string()
        }
    );
    assert_eq!(err.span, Some(Span::new(21, 22)));
}

#[test]
fn primitives_cannot_be_redefined_globally() {
    assert_eq!(
        eval_err("(define + 1)"),
        EvalErrorKind::DuplicateDefinition {
            name: "+".to_string()
        }
    );
}

#[test]
fn define_inside_lambda_is_local_to_each_call() {
    let source = "
        (define double (lambda (x) (define y (* x 2)) y))
        (+ (double 4) (double 5))
    ";
    assert_eq!(eval_ok(source), Value::Int(18));
}

#[test]
fn define_requires_a_symbol() {
    assert!(matches!(
        eval_err("(define 1 2)"),
        EvalErrorKind::MalformedForm { form: "define", .. }
    ));
}

// Closures

#[test]
fn factorial() {
    let source = format!("{FAC} (fac 10)");
    assert_eq!(eval_ok(&source), Value::Int(3_628_800));
}

#[test]
fn closures_capture_their_defining_scope() {
    let source = "
        (define make-adder (lambda (n) (lambda (x) (+ x n))))
        (define add5 (make-adder 5))
        (define add7 (make-adder 7))
        (+ (add5 10) (add7 10))
    ";
    assert_eq!(eval_ok(source), Value::Int(32));
}

#[test]
fn scope_is_lexical_not_dynamic() {
    let source = "
        (define n 1)
        (define f (lambda () n))
        (define g (lambda (n) (f)))
        (g 100)
    ";
    assert_eq!(eval_ok(source), Value::Int(1));
}

#[test]
fn parameters_shadow_globals() {
    assert_eq!(eval_ok("(define x 1) ((lambda (x) x) 2)"), Value::Int(2));
    assert_eq!(eval_ok("(define x 1) ((lambda (x) x) 2) x"), Value::Int(1));
}

#[test]
fn body_forms_run_in_order_and_last_wins() {
    let interp = Interpreter::builder().print_handler(buffer_handler()).build();
    let program = parse(&interp, "((lambda (x) (print x) (print (+ x 1)) (* x 10)) 4)");
    assert_eq!(interp.eval_program(&program), Ok(Value::Int(40)));
    assert_eq!(interp.print_handler().output(), "4\n5\n");
}

#[test]
fn lambda_display() {
    assert_eq!(eval_ok("(lambda (a b) a)").to_string(), "#<lambda/2>");
}

#[test]
fn closure_arity_mismatch() {
    assert_eq!(
        eval_err("((lambda (x) x) 1 2)"),
        EvalErrorKind::Arity {
            name: "lambda".to_string(),
            expected: ArgCount::Exactly(1),
            got: 2,
        }
    );
}

#[test]
fn malformed_lambdas() {
    assert!(matches!(
        eval_err("(lambda x x)"),
        EvalErrorKind::MalformedForm { form: "lambda", .. }
    ));
    assert!(matches!(
        eval_err("(lambda (1) 1)"),
        EvalErrorKind::MalformedForm { form: "lambda", .. }
    ));
}

#[test]
fn special_form_arity() {
    assert_eq!(
        eval_err("(if 1)"),
        EvalErrorKind::Arity {
            name: "if".to_string(),
            expected: ArgCount::Between(2, 3),
            got: 1,
        }
    );
    assert_eq!(
        eval_err("(if 1 2 3 4)"),
        EvalErrorKind::Arity {
            name: "if".to_string(),
            expected: ArgCount::Between(2, 3),
            got: 4,
        }
    );
    assert_eq!(
        eval_err("(define x)"),
        EvalErrorKind::Arity {
            name: "define".to_string(),
            expected: ArgCount::Exactly(2),
            got: 1,
        }
    );
    assert_eq!(
        eval_err("(lambda (x))"),
        EvalErrorKind::Arity {
            name: "lambda".to_string(),
            expected: ArgCount::AtLeast(2),
            got: 1,
        }
    );
}

// Stack safety

#[test]
fn deep_non_tail_recursion() {
    let source = "
        (define count (lambda (n) (if (= n 0) 0 (+ 1 (count (- n 1))))))
        (count 100000)
    ";
    assert_eq!(eval_ok(source), Value::Int(100_000));
}

#[test]
fn huge_factorial_overflows_instead_of_crashing() {
    let source = format!("{FAC} (fac 100000)");
    assert_eq!(
        eval_err(&source),
        EvalErrorKind::IntegerOverflow {
            operation: "*".to_string()
        }
    );
}

// Errors

#[test]
fn unbound_reference_names_the_symbol() {
    let err = eval("(+ 1 undefined_name)").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnboundReference {
            name: "undefined_name".to_string()
        }
    );
    assert_eq!(err.span, Some(Span::new(5, 19)));
}

#[test]
fn calling_a_non_callable() {
    assert_eq!(
        eval_err("(1 2)"),
        EvalErrorKind::NotCallable {
            value: "1".to_string()
        }
    );
    assert_eq!(
        eval_err(r#"("f")"#),
        EvalErrorKind::NotCallable {
            value: "\"f\"".to_string()
        }
    );
}

#[test]
fn empty_call_is_not_callable() {
    assert_eq!(
        eval_err("()"),
        EvalErrorKind::NotCallable {
            value: "undefined".to_string()
        }
    );
}

#[test]
fn primitive_errors_carry_the_call_span() {
    let err = eval("(define x 1) (+ x (= 1 1))").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
    assert_eq!(err.span, Some(Span::new(13, 26)));
}

#[test]
fn error_stops_the_program() {
    let interp = Interpreter::builder().print_handler(buffer_handler()).build();
    let program = parse(&interp, "(print 1) (oops) (print 2)");
    assert!(interp.eval_program(&program).is_err());
    assert_eq!(interp.print_handler().output(), "1\n");
}

// Output

#[test]
fn print_writes_space_separated_line() {
    assert_eq!(output(r#"(print "A" 1 (= 1 1))"#), "A 1 true\n");
    assert_eq!(output("(print (print 1))"), "1\nundefined\n");
}

// Interpreter state

#[test]
fn empty_program_is_undefined() {
    assert_eq!(eval_ok(""), Value::Undefined);
}

#[test]
fn programs_on_one_interpreter_share_globals() {
    let interp = Interpreter::builder().print_handler(silent_handler()).build();
    let first = parse(&interp, "(define x 41)");
    let second = parse(&interp, "(+ x 1)");
    assert_eq!(interp.eval_program(&first), Ok(Value::Undefined));
    assert_eq!(interp.eval_program(&second), Ok(Value::Int(42)));
}

#[test]
fn separate_interpreters_share_nothing() {
    let a = Interpreter::builder().print_handler(silent_handler()).build();
    let b = Interpreter::builder().print_handler(silent_handler()).build();
    let define = parse(&a, "(define x 1)");
    assert_eq!(a.eval_program(&define), Ok(Value::Undefined));

    let lookup = parse(&b, "(+ x 0)");
    assert!(matches!(
        b.eval_program(&lookup).map_err(|e| e.kind),
        Err(EvalErrorKind::UnboundReference { .. })
    ));
    // Defining the same name in the other interpreter is not a duplicate.
    let define = parse(&b, "(define x 2)");
    assert_eq!(b.eval_program(&define), Ok(Value::Undefined));
}

#[test]
fn eval_program_failures_reach_the_error_channel() {
    let (tx, rx) = crossbeam::channel::unbounded();
    let interp = Interpreter::builder()
        .print_handler(silent_handler())
        .error_channel(tx)
        .build();

    let ok = parse(&interp, "(+ 1 2)");
    assert_eq!(interp.eval_program(&ok), Ok(Value::Int(3)));
    assert!(rx.try_recv().is_err());

    let bad = parse(&interp, "(+ 1 missing)");
    let err = interp.eval_program(&bad).unwrap_err();
    let failure = rx.try_recv().unwrap();
    assert_eq!(failure.id.raw(), 0);
    assert_eq!(failure.error, err);
}
