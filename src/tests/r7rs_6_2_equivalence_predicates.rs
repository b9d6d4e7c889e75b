use super::run;
use crate::value::Value;

#[test]
fn eq() {
    assert_eq!(Value::True, run("(eq? #t #t)").unwrap());
    assert_eq!(Value::True, run("(eq? #f #f)").unwrap());
    assert_eq!(Value::True, run("(eq? 'a 'a)").unwrap());
    assert_eq!(Value::True, run("(eq? 3 3)").unwrap());
    assert_eq!(Value::True, run("(eq? '() '())").unwrap());
    assert_eq!(Value::True, run("(define x (cons 1 2)) (eq? x x)").unwrap());
    assert_eq!(Value::True, run("(eq? + +)").unwrap());
    assert_eq!(Value::True, run("
        (define (a x) (* x x))
        (define b a)
        (eq? a b)"
    ).unwrap());
    assert_eq!(Value::True, run("(define x '(1 2)) (eq? (cdr x) (cdr x))").unwrap());

    assert_eq!(Value::False, run("(eq? '(2) 2)").unwrap());
    assert_eq!(Value::False, run("(eq? #f #t)").unwrap());
    assert_eq!(Value::False, run("(eq? 'a 'b)").unwrap());
    assert_eq!(Value::False, run("(eq? 3 6)").unwrap());
    assert_eq!(Value::False, run("(eq? '() '(2))").unwrap());
    assert_eq!(Value::False, run("(eq? (cons 1 2) (cons 1 2))").unwrap());
    assert_eq!(Value::False, run("(eq? + -)").unwrap());
    assert_eq!(Value::False, run("(eq? #f '())").unwrap());
    assert_eq!(Value::False, run("
        (define (a x) (* x x))
        (define (b x) (* x x))
        (eq? a b)"
    ).unwrap());
    assert_eq!(Value::False, run("(eq? (lambda () 1) (lambda () 2))").unwrap());
}

#[test]
fn equal() {
    assert_eq!(Value::True, run("(equal? 'a 'a)").unwrap());
    assert_eq!(Value::True, run("(equal? '(a) '(a))").unwrap());
    assert_eq!(Value::True, run("(equal? '(a (b) c) '(a (b) c))").unwrap());
    assert_eq!(Value::True, run("(equal? 2 2)").unwrap());
    assert_eq!(Value::True, run("(equal? (cons 1 2) (cons 1 2))").unwrap());
    assert_eq!(Value::True, run("(equal? (list 1 2 3) '(1 2 3))").unwrap());
    assert_eq!(Value::True, run("(equal? 1 1 1)").unwrap());

    assert_eq!(Value::False, run("(equal? '(a (b) c) '(a (b) d))").unwrap());
    assert_eq!(Value::False, run("(equal? '(1 2) '(1 2 3))").unwrap());
    assert_eq!(Value::False, run("(equal? 1 #t)").unwrap());
    assert_eq!(Value::False, run("(equal? 1 1 2)").unwrap());
    assert_eq!(Value::False, run("(equal? (lambda (x) x) (lambda (x) x))").unwrap());
}

#[test]
fn equal_is_reflexive_and_symmetric() {
    for x in &["0", "'sym", "'()", "#f", "'(1 (2 3) . 4)", "car", "(lambda () 0)"] {
        let src = format!("(define x {}) (equal? x x)", x);
        assert_eq!(Value::True, run(&src).unwrap(), "for {}", x);
    }

    let pairs = [("'(1 2)", "'(1 2)"), ("'(1 2)", "'(1 3)"), ("'a", "'(a)")];
    for (a, b) in pairs.iter() {
        let ab = run(&format!("(equal? {} {})", a, b)).unwrap();
        let ba = run(&format!("(equal? {} {})", b, a)).unwrap();
        assert_eq!(ab, ba);
    }
}
