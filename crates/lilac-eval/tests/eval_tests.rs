//! Integration tests for the Lilac tree-walking evaluator.
//!
//! Tests key evaluator features:
//! - integer, boolean and string expressions
//! - conditionals and `return` unwinding
//! - let bindings, closures and recursion
//! - builtins, arrays and hashes
//! - error messages and error propagation
//! - live vs snapshot capture
//! - the call-depth bound

use lilac_eval::{CaptureMode, EvalOptions, Environment, Evaluator, Object};
use lilac_parser::parse;
use std::rc::Rc;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Parse and evaluate with the given options in a fresh environment.
fn eval_with(options: EvalOptions, source: &str) -> Object {
    let result = parse(source);
    if result.has_errors() {
        panic!("parse errors: {:?}", result.errors.messages());
    }
    let env = Environment::new().into_shared();
    Evaluator::new(options).eval_program(&result.program, &env)
}

/// Parse and evaluate with default options.
fn eval(source: &str) -> Object {
    eval_with(EvalOptions::default(), source)
}

fn snapshot_options() -> EvalOptions {
    EvalOptions {
        capture: CaptureMode::Snapshot,
        ..EvalOptions::default()
    }
}

/// Evaluate and return the error message, panicking on a non-error result.
fn error_message(source: &str) -> String {
    match eval(source) {
        Object::Error(message) => message,
        other => panic!("expected error for `{source}`, got {other}"),
    }
}

fn int(n: i64) -> Object {
    Object::Integer(n)
}

fn string(s: &str) -> Object {
    Object::String(s.to_string())
}

fn assert_all(cases: &[(&str, Object)]) {
    for (source, expected) in cases {
        assert_eq!(&eval(source), expected, "source: {source}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_integer_expressions() {
    assert_all(&[
        ("5", int(5)),
        ("-5", int(-5)),
        ("--5", int(5)),
        ("5 + 5 + 5 + 5 - 10", int(10)),
        ("2 * 2 * 2 * 2 * 2", int(32)),
        ("-50 + 100 + -50", int(0)),
        ("5 + 5 * 2 - 10", int(5)),
        ("2 * (5 + 10)", int(30)),
        ("20 + 2 * -10", int(0)),
        ("50 / 2 * 2 + 10", int(60)),
        ("3 * (3 * 3) + 10", int(37)),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", int(50)),
        ("-7 / 2", int(-3)),
    ]);
}

#[test]
fn test_integer_overflow_wraps() {
    assert_eq!(eval("9223372036854775807 + 1"), int(i64::MIN));
    assert_eq!(eval("-9223372036854775807 - 2"), int(i64::MAX));
}

#[test]
fn test_boolean_expressions() {
    assert_all(&[
        ("true", Object::Boolean(true)),
        ("false", Object::Boolean(false)),
        ("1 < 2", Object::Boolean(true)),
        ("1 > 2", Object::Boolean(false)),
        ("1 == 1", Object::Boolean(true)),
        ("1 != 1", Object::Boolean(false)),
        ("true == true", Object::Boolean(true)),
        ("true != false", Object::Boolean(true)),
        ("(1 < 2) == true", Object::Boolean(true)),
        ("(1 > 2) == true", Object::Boolean(false)),
        ("1 == true", Object::Boolean(false)),
        ("1 != true", Object::Boolean(true)),
    ]);
}

#[test]
fn test_bang_operator() {
    assert_all(&[
        ("!true", Object::Boolean(false)),
        ("!false", Object::Boolean(true)),
        ("!5", Object::Boolean(false)),
        ("!!5", Object::Boolean(true)),
        ("!0", Object::Boolean(false)),
        ("!\"\"", Object::Boolean(false)),
    ]);
}

#[test]
fn test_string_expressions() {
    assert_eq!(eval("\"Hello World!\""), string("Hello World!"));
    assert_eq!(eval("\"Hello\" + \" \" + \"World!\""), string("Hello World!"));
    assert_eq!(eval("\"Hello\" + \" \" + \"World!\"").to_string(), "Hello World!");
}

// ══════════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_if_else_expressions() {
    assert_all(&[
        ("if (true) { 10 }", int(10)),
        ("if (false) { 10 }", Object::Null),
        ("if (1) { 10 }", int(10)),
        ("if (0) { 10 }", int(10)),
        ("if (1 < 2) { 10 }", int(10)),
        ("if (1 > 2) { 10 }", Object::Null),
        ("if (1 > 2) { 10 } else { 20 }", int(20)),
        ("if (1 < 2) { 10 } else { 20 }", int(10)),
        ("if (1 < 2) { }", Object::Null),
    ]);
}

#[test]
fn test_return_statements() {
    assert_all(&[
        ("return 10;", int(10)),
        ("return 10; 9;", int(10)),
        ("return 2 * 5; 9;", int(10)),
        ("9; return 2 * 5; 9;", int(10)),
        (
            "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            int(10),
        ),
        ("let f = fn() { return 1; 2 }; f() + 10", int(11)),
        (
            "let f = fn(x) { if (x) { return 1; } 2 }; [f(true), f(false)]",
            Object::Array(vec![int(1), int(2)]),
        ),
    ]);
}

#[test]
fn test_return_unwraps_one_level_only() {
    let src = "let inner = fn() { return 1; }; let outer = fn() { inner(); 2 }; outer()";
    assert_eq!(eval(src), int(2));
}

// ══════════════════════════════════════════════════════════════════════════════
// Bindings & functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_let_statements() {
    assert_all(&[
        ("let a = 5; a;", int(5)),
        ("let a = 5 * 5; a;", int(25)),
        ("let a = 5; let b = a; b;", int(5)),
        ("let a = 5; let b = a; let c = a + b + 5; c;", int(15)),
        ("let a = 5;", Object::Null),
        ("let a = 1; let a = a + 1; a", int(2)),
    ]);
}

#[test]
fn test_function_object() {
    match eval("fn(x) { x + 2; };") {
        Object::Function(func) => {
            assert_eq!(func.params.len(), 1);
            assert_eq!(func.params[0].name, "x");
            assert_eq!(func.body.to_string(), "(x + 2)");
        }
        other => panic!("expected function, got {other}"),
    }
    assert_eq!(eval("fn(x, y) { x + y; }").to_string(), "fn(x, y) { (x + y) }");
}

#[test]
fn test_function_application() {
    assert_all(&[
        ("let identity = fn(x) { x; }; identity(5);", int(5)),
        ("let identity = fn(x) { return x; }; identity(5);", int(5)),
        ("let double = fn(x) { x * 2; }; double(5);", int(10)),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", int(10)),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", int(20)),
        ("fn(x) { x; }(5)", int(5)),
        ("let noop = fn() { }; noop()", Object::Null),
    ]);
}

#[test]
fn test_closures() {
    let src = "let newAdder = fn(x) { fn(y) { x + y }; };
               let addTwo = newAdder(2);
               addTwo(2);";
    assert_eq!(eval(src), int(4));
}

#[test]
fn test_recursion_through_let() {
    let counter = "let counter = fn(x) { if (x > 3) { return 999; } else { counter(x + 1); } }; counter(0);";
    assert_eq!(eval(counter), int(999));

    let fib = "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(15)";
    assert_eq!(eval(fib), int(610));
}

#[test]
fn test_function_locals_do_not_leak() {
    assert_eq!(
        error_message("let f = fn() { let inner = 1; inner }; f(); inner"),
        "identifier not found: inner"
    );
    assert_eq!(
        error_message("let f = fn(param) { param }; f(1); param"),
        "identifier not found: param"
    );
}

#[test]
fn test_function_equality_is_identity() {
    assert_eq!(eval("let f = fn(x) { x }; f == f"), Object::Boolean(true));
    assert_eq!(eval("fn(x) { x } == fn(x) { x }"), Object::Boolean(false));
}

#[test]
fn test_user_binding_shadows_builtin() {
    assert_eq!(eval("let len = fn(x) { 42 }; len([1])"), int(42));
    assert_eq!(eval("len").to_string(), "builtin function");
}

// ══════════════════════════════════════════════════════════════════════════════
// Builtins
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_builtin_functions() {
    assert_all(&[
        ("len(\"\")", int(0)),
        ("len(\"four\")", int(4)),
        ("len(\"hello world\")", int(11)),
        ("len([1, 2, 3])", int(3)),
        ("len([])", int(0)),
        ("first([1, 2, 3])", int(1)),
        ("first([])", Object::Null),
        ("last([1, 2, 3])", int(3)),
        ("last([])", Object::Null),
        ("rest([1, 2, 3])", Object::Array(vec![int(2), int(3)])),
        ("rest([])", Object::Null),
        ("push([], 1)", Object::Array(vec![int(1)])),
    ]);
}

#[test]
fn test_builtin_errors() {
    let cases = [
        ("len(1)", "argument to `len` not supported, got INTEGER"),
        ("len(\"one\", \"two\")", "wrong number of arguments. got=2, want=1"),
        ("first(1)", "argument to `first` must be ARRAY, got INTEGER"),
        ("last(1)", "argument to `last` must be ARRAY, got INTEGER"),
        ("rest(1)", "argument to `rest` must be ARRAY, got INTEGER"),
        ("push(1, 1)", "argument to `push` must be ARRAY, got INTEGER"),
        ("push([1])", "wrong number of arguments. got=1, want=2"),
    ];
    for (source, expected) in cases {
        assert_eq!(error_message(source), expected, "source: {source}");
    }
}

#[test]
fn test_push_does_not_mutate_original() {
    assert_eq!(
        eval("let a = [1]; let b = push(a, 2); a").to_string(),
        "[1]"
    );
    assert_eq!(
        eval("let a = [1]; let b = push(a, 2); b").to_string(),
        "[1, 2]"
    );
}

#[test]
fn test_builtins_compose() {
    let src = "
        let map = fn(arr, f) {
            let iter = fn(arr, acc) {
                if (len(arr) == 0) { acc } else { iter(rest(arr), push(acc, f(first(arr)))) }
            };
            iter(arr, []);
        };
        map([1, 2, 3], fn(x) { x * 2 });
    ";
    assert_eq!(eval(src).to_string(), "[2, 4, 6]");
}

// ══════════════════════════════════════════════════════════════════════════════
// Collections
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_array_literals_and_indexing() {
    assert_eq!(eval("[1, 2 * 2, 3 + 3]").to_string(), "[1, 4, 6]");
    assert_all(&[
        ("[1, 2, 3][0]", int(1)),
        ("[1, 2, 3][1]", int(2)),
        ("[1, 2, 3][2]", int(3)),
        ("let i = 0; [1][i];", int(1)),
        ("[1, 2, 3][1 + 1];", int(3)),
        ("let myArray = [1, 2, 3]; myArray[2];", int(3)),
        (
            "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
            int(6),
        ),
        ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", int(2)),
        ("[1, 2, 3][3]", Object::Null),
        ("[1, 2, 3][-1]", Object::Null),
    ]);
}

#[test]
fn test_hash_literals() {
    let src = r#"let two = "two";
        {
            "one": 10 - 9,
            two: 1 + 1,
            "thr" + "ee": 6 / 2,
            4: 4,
            true: 5,
            false: 6
        }"#;
    let expected = Object::Hash(vec![
        (string("one"), int(1)),
        (string("two"), int(2)),
        (string("three"), int(3)),
        (int(4), int(4)),
        (Object::Boolean(true), int(5)),
        (Object::Boolean(false), int(6)),
    ]);
    assert_eq!(eval(src), expected);
}

#[test]
fn test_hash_duplicate_keys_keep_last_value() {
    assert_eq!(eval(r#"{"a": 1, "b": 2, "a": 3}"#).to_string(), "{a: 3, b: 2}");
}

#[test]
fn test_hash_equality_ignores_order() {
    assert_eq!(
        eval(r#"{"a": 1, "b": 2} == {"b": 2, "a": 1}"#),
        Object::Boolean(true)
    );
    assert_eq!(eval(r#"{"a": 1} == {"a": 2}"#), Object::Boolean(false));
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_error_messages() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("-\"a\"", "unknown operator: -STRING"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        ("\"a\" == \"a\"", "unknown operator: STRING == STRING"),
        ("[1] + [2]", "unknown operator: ARRAY + ARRAY"),
        ("[1] < 2", "type mismatch: ARRAY < INTEGER"),
        (r#"{"name": "Lilac"}["name"]"#, "index operator not supported: HASH"),
        ("1[0]", "index operator not supported: INTEGER"),
        ("1(2)", "not a function: INTEGER"),
        ("\"f\"()", "not a function: STRING"),
        ("fn(x) { x }(1, 2)", "wrong number of arguments. got=2, want=1"),
        ("10 / 0", "division by zero"),
    ];
    for (source, expected) in cases {
        assert_eq!(error_message(source), expected, "source: {source}");
    }
}

#[test]
fn test_first_error_wins() {
    assert_eq!(
        error_message("[1 + true, -false]"),
        "type mismatch: INTEGER + BOOLEAN"
    );
    assert_eq!(
        error_message("len(1 + true)"),
        "type mismatch: INTEGER + BOOLEAN"
    );
    assert_eq!(
        error_message("undefinedFn(1 + true)"),
        "identifier not found: undefinedFn"
    );
}

#[test]
fn test_error_inside_function_stops_program() {
    assert_eq!(
        error_message("let f = fn(x) { x + true }; let y = f(1); 99"),
        "type mismatch: INTEGER + BOOLEAN"
    );
}

#[test]
fn test_error_inspect() {
    assert_eq!(eval("foobar").to_string(), "ERROR: identifier not found: foobar");
}

// ══════════════════════════════════════════════════════════════════════════════
// Capture modes
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_live_capture_sees_later_bindings() {
    let src = "let f = fn() { later }; let later = 5; f()";
    assert_eq!(eval(src), int(5));
    assert_eq!(
        eval("let x = 1; let f = fn() { x }; let x = 2; f()"),
        int(2)
    );
}

#[test]
fn test_snapshot_capture_freezes_environment() {
    let src = "let f = fn() { later }; let later = 5; f()";
    assert_eq!(
        eval_with(snapshot_options(), src),
        Object::Error("identifier not found: later".into())
    );
    assert_eq!(
        eval_with(
            snapshot_options(),
            "let x = 1; let f = fn() { x }; let x = 2; f()"
        ),
        int(1)
    );
}

#[test]
fn test_snapshot_capture_keeps_recursion() {
    let counter = "let counter = fn(x) { if (x > 3) { return 999; } else { counter(x + 1); } }; counter(0);";
    assert_eq!(eval_with(snapshot_options(), counter), int(999));
    let closure = "let newAdder = fn(x) { fn(y) { x + y } }; newAdder(40)(2)";
    assert_eq!(eval_with(snapshot_options(), closure), int(42));
}

// ══════════════════════════════════════════════════════════════════════════════
// Call depth
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_runaway_recursion_is_an_error() {
    assert_eq!(
        error_message("let loop = fn(n) { loop(n + 1) }; loop(0)"),
        "stack overflow: maximum call depth of 1000 exceeded"
    );
}

#[test]
fn test_call_depth_bound_is_exact() {
    let count = "let count = fn(n) { if (n == 0) { 0 } else { 1 + count(n - 1) } };";
    assert_eq!(eval(&format!("{count} count(999)")), int(999));
    assert_eq!(
        eval(&format!("{count} count(1000)")),
        Object::Error("stack overflow: maximum call depth of 1000 exceeded".into())
    );
}

#[test]
fn test_custom_call_depth() {
    let options = EvalOptions {
        max_call_depth: 50,
        ..EvalOptions::default()
    };
    assert_eq!(
        eval_with(options, "let loop = fn(n) { loop(n + 1) }; loop(0)"),
        Object::Error("stack overflow: maximum call depth of 50 exceeded".into())
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Shared environment
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_environment_persists_across_programs() {
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::default();
    for (source, expected) in [
        ("let a = 1;", Object::Null),
        ("let add = fn(x) { x + a };", Object::Null),
        ("add(41)", int(42)),
        ("let loop = fn() { loop() }; loop()", Object::Error(
            "stack overflow: maximum call depth of 1000 exceeded".into(),
        )),
        ("add(1)", int(2)),
    ] {
        let program = parse(source).program;
        assert_eq!(evaluator.eval_program(&program, &env), expected, "{source}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Frame lifetimes
// ══════════════════════════════════════════════════════════════════════════════

/// Run `setup`, then `call` `times` times, returning the global environment's
/// reference count before and after the calls.
fn global_refs_across_calls(options: EvalOptions, setup: &str, call: &str, times: usize) -> (usize, usize) {
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::new(options);
    evaluator.eval_program(&parse(setup).program, &env);
    let before = Rc::strong_count(&env);
    let call = parse(call).program;
    for _ in 0..times {
        assert!(!evaluator.eval_program(&call, &env).is_error());
    }
    (before, Rc::strong_count(&env))
}

#[test]
fn test_local_functions_do_not_keep_frames_alive() {
    let setup = "let f = fn() { let g = fn() { 1 }; g() };";
    let (before, after) = global_refs_across_calls(EvalOptions::default(), setup, "f()", 100);
    assert_eq!(before, after);

    let setup = "let f = fn(n) { let down = fn(k) { if (k == 0) { 0 } else { down(k - 1) } }; down(n) };";
    let (before, after) = global_refs_across_calls(EvalOptions::default(), setup, "f(5)", 100);
    assert_eq!(before, after);

    let (before, after) = global_refs_across_calls(snapshot_options(), setup, "f(5)", 100);
    assert_eq!(before, after);
}

#[test]
fn test_escaping_closures_keep_their_frame() {
    assert_all(&[
        ("let mk = fn(x) { let get = fn() { x }; get }; let g = mk(5); g()", int(5)),
        (
            "let mk = fn() { let down = fn(k) { if (k == 0) { 7 } else { down(k - 1) } }; down }; mk()(3)",
            int(7),
        ),
        (
            "let mk = fn(x) { let a = fn() { x }; let b = fn() { a() + 1 }; [a, b] }; let p = mk(1); p[1]()",
            int(2),
        ),
    ]);
}
