use super::{run, run_in_env, sample_env};
use crate::environment::default_env;
use crate::errors::{Arity, Category, ErrorKind};
use crate::sourcecode::Position;
use crate::thread_state;
use crate::value::Value;

#[test]
fn unbound_variable() {
    let err = run("undefined-thing").unwrap_err();
    assert_eq!(err.category(), Category::UnboundVariable);
    assert!(matches!(err.kind(), ErrorKind::UnboundVariable(s) if s.name() == "undefined-thing"));
    assert_eq!(format!("{}", err), "Unbound variable: undefined-thing");
}

#[test]
fn not_a_procedure() {
    let err = run("(5 1 2)").unwrap_err();
    assert_eq!(err.category(), Category::NotAProcedure);
    assert!(matches!(err.kind(), ErrorKind::NotAProcedure(repr) if repr == "5"));

    let err = run("('() 1)").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NotAProcedure(repr) if repr == "()"));
}

#[test]
fn closure_arity_mismatch() {
    let env = default_env();
    run_in_env("(define (pair-up a b) (cons a b))", &env).unwrap();

    let err = run_in_env("(pair-up 1)", &env).unwrap_err();
    assert_eq!(err.category(), Category::ArityMismatch);
    match err.kind() {
        ErrorKind::ArityMismatch {
            procedure,
            expected,
            got,
        } => {
            assert_eq!(procedure, "pair-up");
            assert_eq!(*expected, Arity::Exact(2));
            assert_eq!(*got, 1);
        }
        other => panic!("unexpected {:?}", other),
    }

    assert!(run_in_env("(pair-up 1 2 3)", &env).is_err());

    run_in_env("(define (at-least-one x . xs) x)", &env).unwrap();
    let err = run_in_env("(at-least-one)", &env).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::ArityMismatch { expected: Arity::AtLeast(1), got: 0, .. }
    ));
}

#[test]
fn builtin_arity_mismatch() {
    let err = run("(car '(1) '(2))").unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::ArityMismatch { expected: Arity::Exact(1), got: 2, .. }
    ));
    assert!(run("(cons 1)").is_err());
}

#[test]
fn type_errors() {
    for src in &["(car 1)", "(cdr '())", "(+ 1 'a)", "(< 1 '(2))", "(length 5)"] {
        let err = run(src).unwrap_err();
        assert_eq!(err.category(), Category::Type, "for {}", src);
    }
}

#[test]
fn division_by_zero() {
    let err = run("(quotient 1 0)").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DivisionByZero));
    assert_eq!(err.category(), Category::Runtime);
}

#[test]
fn syntax_errors_abort_the_batch() {
    let err = run("(define x 1) (+ x").unwrap_err();
    assert_eq!(err.category(), Category::Syntax);
    assert!(matches!(
        err.kind(),
        ErrorKind::UnterminatedList { pos: Position { line: 1, column: 14 } }
    ));

    let err = run(")").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnexpectedCloseParen { .. }));
}

#[test]
fn eval_each_reports_per_form() {
    let env = default_env();
    let results = crate::eval_each("(define x 2) (car x) ) (* x 21)", &env);
    assert_eq!(results.len(), 4);
    assert!(matches!(results[0], Ok(Value::Unspecified)));
    assert_eq!(results[1].as_ref().unwrap_err().category(), Category::Type);
    assert_eq!(results[2].as_ref().unwrap_err().category(), Category::Syntax);
    assert_eq!(results[3].as_ref().unwrap(), &Value::int(42));
}

#[test]
fn errors_carry_call_context() {
    let env = sample_env();
    let err = run_in_env("(fact 'x)", &env).unwrap_err();
    assert_eq!(err.category(), Category::Type);
    assert!(err.context().iter().any(|c| c == "(<= n 1)"));
    let text = format!("{}", err);
    assert!(text.starts_with("Context:"));
}

#[test]
fn runaway_recursion_is_stopped() {
    thread_state::set_max_depth(100);
    let env = default_env();
    run_in_env("(define (down n) (+ 1 (down (+ n 1))))", &env).unwrap();
    let err = run_in_env("(down 0)", &env).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RecursionLimit(100)));

    // the depth counter unwinds with the error
    assert_eq!(run_in_env("(+ 1 2)", &env).unwrap(), Value::int(3));
}

#[test]
fn default_limits_stop_runaway_recursion() {
    let err = run("(define (down n) (+ 1 (down n))) (down 0)").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RecursionLimit(_)));
    assert_eq!(err.category(), Category::Runtime);
}

#[test]
fn deep_non_tail_recursion_returns() {
    let env = sample_env();
    match run_in_env("(length (range 0 3000))", &env) {
        Ok(n) => assert_eq!(n, Value::int(3000)),
        Err(e) => assert!(matches!(e.kind(), ErrorKind::RecursionLimit(_))),
    }
    assert_eq!(run_in_env("(length (range 0 100))", &env).unwrap(), Value::int(100));
}

#[test]
fn deeply_nested_source_is_a_syntax_error() {
    let src = format!("'{}{}", "(".repeat(200_000), ")".repeat(200_000));
    let err = run(&src).unwrap_err();
    assert_eq!(err.category(), Category::Syntax);
    assert!(matches!(err.kind(), ErrorKind::NestingTooDeep { .. }));
}

#[test]
fn missing_file() {
    let env = default_env();
    let err = crate::load_file("/nonexistent/file.scm", &env).unwrap_err();
    assert_eq!(err.category(), Category::Io);
}
