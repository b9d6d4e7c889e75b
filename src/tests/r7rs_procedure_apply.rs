use super::{read, run, run_in_env};
use crate::environment::default_env;
use crate::errors::ErrorKind;
use crate::value::Value;

#[test]
fn apply() {
    let env = default_env();

    assert_eq!(
        Value::int(7),
        run_in_env("(apply +  (list 3 4))", &env).unwrap()
    );

    run_in_env(
        "(define compose (lambda (f g) (lambda args (f (apply g args)))))",
        &env,
    )
    .unwrap();
    assert_eq!(
        Value::int(-900),
        run_in_env("((compose - *) 12 75)", &env).unwrap()
    );
}

#[test]
fn apply_spreads_leading_arguments() {
    assert_eq!(run("(apply + 1 2 '(3 4))").unwrap(), Value::int(10));
    assert_eq!(run("(apply list 1 2 '())").unwrap(), read("(1 2)"));
    assert_eq!(run("(apply list 1 2)").unwrap(), read("(1 2)"));
    assert_eq!(run("(apply list)").unwrap(), Value::Nil);
    assert_eq!(run("(apply (lambda (x . y) y) '(1 2 3))").unwrap(), read("(2 3)"));
}

#[test]
fn apply_needs_a_procedure() {
    let err = run("(apply 5 '(1))").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NotAProcedure(_)));
}

#[test]
fn map() {
    assert_eq!(run("(map car '((a 1) (b 2)))").unwrap(), read("(a b)"));
    assert_eq!(run("(map (lambda (x) x) '())").unwrap(), Value::Nil);
    assert_eq!(
        run("(map + '(1 2 3) '(10 20 30))").unwrap(),
        read("(11 22 33)")
    );
    assert_eq!(
        run("(map (lambda (a b) (cons a b)) '(1 2 3) '(x y))").unwrap(),
        read("((1 . x) (2 . y))")
    );
}

#[test]
fn map_propagates_errors() {
    let err = run("(map car '((1) 2))").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeError(_)));
    let err = run("(map (lambda (x y) x) '(1))").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ArityMismatch { .. }));
}

#[test]
fn map_with_closure_over_local_state() {
    let env = default_env();
    run_in_env(
        "(define (scale-all k xs) (map (lambda (x) (* k x)) xs))",
        &env,
    )
    .unwrap();
    assert_eq!(
        run_in_env("(scale-all 3 '(1 2 3))", &env).unwrap(),
        read("(3 6 9)")
    );
}
