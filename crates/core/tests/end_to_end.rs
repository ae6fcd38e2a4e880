//! End-to-end scenarios driving whole programs through `evaluate`.

use wisp_core::{Interpreter, Value};

fn eval(interp: &mut Interpreter, src: &str) -> Value {
    interp.load_source(src).expect("evaluation should succeed")
}

#[test]
fn basic_arithmetic() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(+ 5 6)"), Value::Int(11));
}

#[test]
fn cons_builds_an_improper_list() {
    let mut interp = Interpreter::new();
    let result = eval(&mut interp, "(cons 'a (cons 'b 'c))");
    assert_eq!(wisp_core::stringify(&result, true), "(a b . c)");
}

#[test]
fn list_builds_a_proper_list() {
    let mut interp = Interpreter::new();
    let result = eval(&mut interp, "(list 1 2 3)");
    assert_eq!(wisp_core::stringify(&result, true), "(1 2 3)");
}

#[test]
fn fibonacci_small_case() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/fibonacci.scm"))
        .unwrap();
    assert_eq!(eval(&mut interp, "(fibonacci 16)"), Value::Int(987));
}

#[test]
fn fibonacci_promotes_to_bigint_at_large_n() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/fibonacci.scm"))
        .unwrap();
    let result = eval(&mut interp, "(fibonacci 1000)");
    let text = wisp_core::stringify(&result, true);
    assert!(matches!(result, Value::BigInt(_)));
    assert_eq!(text.len(), 209);
    assert!(text.starts_with("43466557686937456435"));
    assert!(text.ends_with("875"));
}

#[test]
fn six_queens_matches_the_exact_solution_transcript() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/nqueens.scm"))
        .unwrap();
    let result = eval(&mut interp, "(queens 6)");
    assert_eq!(
        wisp_core::stringify(&result, true),
        "((5 3 1 6 4 2) (4 1 5 2 6 3) (3 6 2 5 1 4) (2 4 6 1 3 5))"
    );
}

#[test]
fn call_cc_reenters_a_left_dynamic_extent() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/dynamic_wind.scm"))
        .unwrap();
    let result = eval(&mut interp, "(run)");
    assert_eq!(
        wisp_core::stringify(&result, true),
        "(connect talk1 disconnect connect talk2 disconnect)"
    );
}

#[test]
fn call_cc_replays_the_same_continuation_more_than_once() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/yin_yang.scm"))
        .unwrap();
    let result = eval(&mut interp, "(run)");
    assert_eq!(wisp_core::stringify(&result, true), "(1 2 3 4 5)");
}

#[test]
fn call_cc_escapes_a_recursive_search() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/call_cc_escape.scm"))
        .unwrap();
    let result = eval(&mut interp, "(find-negative (list 1 2 -3 4 -5))");
    assert_eq!(result, Value::Int(-3));
}

#[test]
fn call_cc_returns_the_default_when_nothing_matches() {
    let mut interp = Interpreter::new();
    interp
        .load_source(include_str!("fixtures/call_cc_escape.scm"))
        .unwrap();
    let result = eval(&mut interp, "(find-negative (list 1 2 3))");
    assert_eq!(wisp_core::stringify(&result, true), "none");
}

#[test]
fn globals_reports_every_required_primitive() {
    let mut interp = Interpreter::new();
    let result = eval(&mut interp, "(globals)");
    let names: Vec<String> = result
        .list_to_vec()
        .unwrap()
        .iter()
        .map(|v| wisp_core::stringify(v, true))
        .collect();
    for expected in [
        "globals", "error", "number?", "=", "<", "*", "-", "+", "apply", "call/cc", "symbol?",
        "eof-object?", "read", "newline", "display", "list", "not", "null?", "pair?", "eq?",
        "cons", "cdr", "car",
    ] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
}

#[test]
fn unbound_name_reports_an_error_with_a_trace() {
    let mut interp = Interpreter::new();
    let err = interp.load_source("(this-is-not-defined)").unwrap_err();
    assert!(err.trace.is_some());
}

#[test]
fn user_error_carries_no_trace() {
    let mut interp = Interpreter::new();
    let err = interp
        .load_source("(error \"bad value\" 42)")
        .unwrap_err();
    assert!(err.trace.is_none());
    assert_eq!(err.to_string(), "Error: bad value: 42");
}
