use crate::environment::Environment;
use crate::errors::*;
use crate::integer::Int;
use crate::interpreter;
use crate::value::{Builtin, Value};
use num_traits::{One, Zero};

type Args<'a> = &'a [Value];

macro_rules! builtin {
    ($name:expr, $arity:expr, $func:expr) => {
        Builtin {
            name: $name,
            arity: $arity,
            func: $func,
        }
    };
}

static BUILTINS: &[Builtin] = &[
    // pairs and lists
    builtin!("car", Arity::Exact(1), |args| args[0].car().map(Clone::clone)),
    builtin!("cdr", Arity::Exact(1), |args| args[0].cdr().map(Clone::clone)),
    builtin!("cons", Arity::Exact(2), |args| {
        Ok(Value::cons(args[0].clone(), args[1].clone()))
    }),
    builtin!("list", Arity::AtLeast(0), |args| Ok(args.iter().cloned().collect())),
    builtin!("length", Arity::Exact(1), native_length),
    builtin!("append", Arity::AtLeast(0), native_append),
    // arithmetic
    builtin!("+", Arity::AtLeast(0), |args| native_fold(args, Int::zero(), add)),
    builtin!("*", Arity::AtLeast(0), |args| native_fold(args, Int::one(), mul)),
    builtin!("-", Arity::AtLeast(1), |args| native_unifold(args, Int::zero(), sub)),
    builtin!("quotient", Arity::Exact(2), |args| {
        native_divide(args, Int::checked_quotient)
    }),
    builtin!("remainder", Arity::Exact(2), |args| {
        native_divide(args, Int::checked_rem)
    }),
    builtin!("modulo", Arity::Exact(2), |args| {
        native_divide(args, Int::checked_modulo)
    }),
    builtin!("abs", Arity::Exact(1), |args| {
        let x = args[0].try_as_int()?;
        Ok(x.checked_abs().ok_or(ErrorKind::IntegerOverflow)?.into())
    }),
    builtin!("expt", Arity::Exact(2), native_expt),
    builtin!("min", Arity::AtLeast(1), |args| native_select(args, std::cmp::min)),
    builtin!("max", Arity::AtLeast(1), |args| native_select(args, std::cmp::max)),
    // comparison
    builtin!("=", Arity::AtLeast(2), |args| native_compare(args, |a, b| a == b)),
    builtin!("<", Arity::AtLeast(2), |args| native_compare(args, |a, b| a < b)),
    builtin!("<=", Arity::AtLeast(2), |args| native_compare(args, |a, b| a <= b)),
    builtin!(">", Arity::AtLeast(2), |args| native_compare(args, |a, b| a > b)),
    builtin!(">=", Arity::AtLeast(2), |args| native_compare(args, |a, b| a >= b)),
    // equivalence
    builtin!("eq?", Arity::AtLeast(2), |args| native_chain(args, Value::eqv)),
    builtin!("equal?", Arity::AtLeast(2), |args| native_chain(args, Value::equal)),
    // types
    builtin!("null?", Arity::Exact(1), |args| Ok(args[0].is_nil().into())),
    builtin!("pair?", Arity::Exact(1), |args| Ok(args[0].is_pair().into())),
    builtin!("list?", Arity::Exact(1), |args| Ok(args[0].is_list().into())),
    builtin!("number?", Arity::Exact(1), |args| Ok(args[0].is_number().into())),
    builtin!("symbol?", Arity::Exact(1), |args| Ok(args[0].is_symbol().into())),
    builtin!("boolean?", Arity::Exact(1), |args| Ok(args[0].is_bool().into())),
    builtin!("procedure?", Arity::Exact(1), |args| {
        Ok(args[0].is_procedure().into())
    }),
    builtin!("not", Arity::Exact(1), |args| Ok((!args[0].is_true()).into())),
    // higher order
    builtin!("apply", Arity::AtLeast(1), native_apply),
    builtin!("map", Arity::AtLeast(2), native_map),
];

/// Bind every builtin procedure in `env`.
pub fn install(env: &mut Environment) {
    for builtin in BUILTINS {
        env.insert_native(builtin);
    }
}

fn add(a: Int, b: Int) -> Result<Int> {
    Ok(a.checked_add(&b).ok_or(ErrorKind::IntegerOverflow)?)
}

fn sub(a: Int, b: Int) -> Result<Int> {
    Ok(a.checked_sub(&b).ok_or(ErrorKind::IntegerOverflow)?)
}

fn mul(a: Int, b: Int) -> Result<Int> {
    Ok(a.checked_mul(&b).ok_or(ErrorKind::IntegerOverflow)?)
}

fn native_fold(args: Args, mut acc: Int, func: fn(Int, Int) -> Result<Int>) -> Result<Value> {
    for b in args {
        acc = func(acc, b.try_as_int()?)?;
    }
    Ok(acc.into())
}

/// With a single argument apply `func(unit, x)`, otherwise fold from the first.
fn native_unifold(args: Args, unit: Int, func: fn(Int, Int) -> Result<Int>) -> Result<Value> {
    let (first, rest) = match args.split_first() {
        Some(x) => x,
        None => return Ok(unit.into()),
    };

    let first = first.try_as_int()?;
    if rest.is_empty() {
        return func(unit, first).map(Value::from);
    }

    native_fold(rest, first, func)
}

fn native_divide(args: Args, op: fn(&Int, &Int) -> Option<Int>) -> Result<Value> {
    let a = args[0].try_as_int()?;
    let b = args[1].try_as_int()?;
    if b.is_zero() {
        Err(ErrorKind::DivisionByZero)?
    }
    Ok(op(&a, &b).ok_or(ErrorKind::IntegerOverflow)?.into())
}

fn native_expt(args: Args) -> Result<Value> {
    let base = args[0].try_as_int()?;
    let exp = args[1].try_as_int()?;
    if exp.is_negative() {
        Err(ErrorKind::TypeError(format!(
            "expt needs a non-negative exponent, got {}",
            exp
        )))?
    }
    let exp = exp.to_u32().ok_or(ErrorKind::IntegerOverflow)?;
    Ok(base.checked_pow(exp).ok_or(ErrorKind::IntegerOverflow)?.into())
}

fn native_select(args: Args, pick: fn(Int, Int) -> Int) -> Result<Value> {
    let mut acc = args[0].try_as_int()?;
    for b in &args[1..] {
        acc = pick(acc, b.try_as_int()?);
    }
    Ok(acc.into())
}

fn native_compare(args: Args, pred: fn(&Int, &Int) -> bool) -> Result<Value> {
    let numbers = args
        .iter()
        .map(Value::try_as_int)
        .collect::<Result<Vec<_>>>()?;
    Ok(numbers.windows(2).all(|w| pred(&w[0], &w[1])).into())
}

fn native_chain(args: Args, pred: fn(&Value, &Value) -> bool) -> Result<Value> {
    Ok(args.windows(2).all(|w| pred(&w[0], &w[1])).into())
}

fn native_length(args: Args) -> Result<Value> {
    let mut n = 0;
    for item in args[0].iter_list() {
        item?;
        n += 1;
    }
    Ok(Value::int(n))
}

fn native_append(args: Args) -> Result<Value> {
    let (last, init) = match args.split_last() {
        Some(x) => x,
        None => return Ok(Value::Nil),
    };

    let mut items = vec![];
    for list in init {
        for x in list.iter_list() {
            items.push(x?.clone());
        }
    }
    Ok(Value::list_with_tail(items, last.clone()))
}

/// `(apply f a b (c d))` calls `(f a b c d)`; a non-list last argument is
/// passed through unchanged, so `(apply f a b)` calls `(f a b)`.
fn native_apply(args: Args) -> Result<Value> {
    let (proc, rest) = (&args[0], &args[1..]);

    let call_args = match rest.split_last() {
        Some((last, init)) if last.is_list() => {
            let mut call_args = init.to_vec();
            call_args.extend(last.to_vec()?);
            call_args
        }
        _ => rest.to_vec(),
    };

    interpreter::apply(proc, &call_args)
}

fn native_map(args: Args) -> Result<Value> {
    let proc = &args[0];
    let mut lists: Vec<_> = args[1..].iter().map(Value::iter_list).collect();

    let mut results = vec![];
    loop {
        let mut call_args = Vec::with_capacity(lists.len());
        for list in &mut lists {
            match list.next() {
                None => return Ok(Value::from_vec(results)),
                Some(x) => call_args.push(x?.clone()),
            }
        }
        results.push(interpreter::apply(proc, &call_args)?);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value> {
        BUILTINS
            .iter()
            .find(|b| b.name == name)
            .unwrap_or_else(|| panic!("no builtin {}", name))
            .invoke(args)
    }

    fn ints(items: &[i64]) -> Vec<Value> {
        items.iter().map(|&i| Value::int(i)).collect()
    }

    fn list(items: &[i64]) -> Value {
        Value::from_vec(ints(items))
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in BUILTINS.iter().enumerate() {
            for b in &BUILTINS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn arithmetic() {
        assert_eq!(call("+", &[]).unwrap(), Value::int(0));
        assert_eq!(call("+", &ints(&[1, 2, 3])).unwrap(), Value::int(6));
        assert_eq!(call("*", &ints(&[2, 3, 4])).unwrap(), Value::int(24));
        assert_eq!(call("-", &ints(&[5])).unwrap(), Value::int(-5));
        assert_eq!(call("-", &ints(&[10, 3, 2])).unwrap(), Value::int(5));
        assert_eq!(call("abs", &ints(&[-4])).unwrap(), Value::int(4));
        assert_eq!(call("expt", &ints(&[3, 4])).unwrap(), Value::int(81));
        assert_eq!(call("min", &ints(&[3, -1, 2])).unwrap(), Value::int(-1));
        assert_eq!(call("max", &ints(&[3, -1, 2])).unwrap(), Value::int(3));
    }

    #[test]
    fn booleans_count_as_numbers() {
        let args = [Value::True, Value::False, Value::True];
        assert_eq!(call("+", &args).unwrap(), Value::int(2));
        assert_eq!(call("<", &[Value::False, Value::True]).unwrap(), Value::True);
    }

    #[test]
    fn division() {
        assert_eq!(call("quotient", &ints(&[17, 5])).unwrap(), Value::int(3));
        assert_eq!(call("remainder", &ints(&[-17, 5])).unwrap(), Value::int(-2));
        assert_eq!(call("modulo", &ints(&[-17, 5])).unwrap(), Value::int(3));
        for op in &["quotient", "remainder", "modulo"] {
            let err = call(op, &ints(&[1, 0])).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::DivisionByZero));
        }
    }

    #[test]
    fn comparisons_chain() {
        assert_eq!(call("<", &ints(&[1, 2, 3])).unwrap(), Value::True);
        assert_eq!(call("<", &ints(&[1, 3, 2])).unwrap(), Value::False);
        assert_eq!(call("<=", &ints(&[1, 1, 2])).unwrap(), Value::True);
        assert_eq!(call("=", &ints(&[4, 4, 4])).unwrap(), Value::True);
        assert_eq!(call(">", &ints(&[3, 2, 1])).unwrap(), Value::True);
        assert_eq!(call(">=", &ints(&[3, 3, 4])).unwrap(), Value::False);
    }

    #[test]
    fn type_errors() {
        let err = call("car", &ints(&[1])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeError(_)));
        let err = call("+", &[Value::int(1), Value::symbol("a")]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeError(_)));
        let err = call("expt", &ints(&[2, -1])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeError(_)));
    }

    #[test]
    fn arity_is_checked() {
        let err = call("cons", &ints(&[1])).unwrap_err();
        match err.kind() {
            ErrorKind::ArityMismatch {
                procedure,
                expected,
                got,
            } => {
                assert_eq!(procedure, "cons");
                assert_eq!(*expected, Arity::Exact(2));
                assert_eq!(*got, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(call("-", &[]).is_err());
        assert!(call("<", &ints(&[1])).is_err());
    }

    #[test]
    fn lists() {
        assert_eq!(call("list", &ints(&[1, 2])).unwrap(), list(&[1, 2]));
        assert_eq!(call("length", &[list(&[1, 2, 3])]).unwrap(), Value::int(3));
        assert!(call("length", &[Value::cons(Value::int(1), Value::int(2))]).is_err());
        assert_eq!(
            call("append", &[list(&[1]), list(&[2, 3]), list(&[])]).unwrap(),
            list(&[1, 2, 3])
        );
        assert_eq!(
            call("append", &[list(&[1]), Value::int(2)]).unwrap(),
            Value::cons(Value::int(1), Value::int(2))
        );
        assert_eq!(call("append", &[]).unwrap(), Value::Nil);
    }

    #[test]
    fn predicates() {
        assert_eq!(call("null?", &[Value::Nil]).unwrap(), Value::True);
        assert_eq!(call("pair?", &[Value::Nil]).unwrap(), Value::False);
        assert_eq!(call("list?", &[list(&[1])]).unwrap(), Value::True);
        assert_eq!(call("number?", &[Value::True]).unwrap(), Value::False);
        assert_eq!(call("symbol?", &[Value::symbol("x")]).unwrap(), Value::True);
        assert_eq!(call("boolean?", &[Value::False]).unwrap(), Value::True);
        assert_eq!(call("not", &[Value::Nil]).unwrap(), Value::True);
        assert_eq!(call("not", &[Value::int(0)]).unwrap(), Value::False);
        let car = Value::Native(&BUILTINS[0]);
        assert_eq!(call("procedure?", &[car]).unwrap(), Value::True);
    }

    #[test]
    fn equivalence() {
        let a = list(&[1, 2]);
        let b = list(&[1, 2]);
        assert_eq!(call("equal?", &[a.clone(), b.clone()]).unwrap(), Value::True);
        assert_eq!(call("eq?", &[a.clone(), b]).unwrap(), Value::False);
        assert_eq!(call("eq?", &[a.clone(), a]).unwrap(), Value::True);
        assert_eq!(
            call("eq?", &[Value::symbol("x"), Value::symbol("x")]).unwrap(),
            Value::True
        );
    }

    #[test]
    fn map_and_apply_with_builtins() {
        let plus = Value::Native(BUILTINS.iter().find(|b| b.name == "+").unwrap());
        assert_eq!(
            call("map", &[plus.clone(), list(&[1, 2, 3]), list(&[10, 20])]).unwrap(),
            list(&[11, 22])
        );
        assert_eq!(
            call("apply", &[plus.clone(), Value::int(1), list(&[2, 3])]).unwrap(),
            Value::int(6)
        );
        assert_eq!(
            call("apply", &[plus.clone(), Value::int(1), Value::int(2)]).unwrap(),
            Value::int(3)
        );
        let err = call("map", &[Value::int(1), list(&[1])]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotAProcedure(_)));
    }
}
