use crate::environment::{EnvRef, Environment};
use crate::errors::*;
use crate::symbol::{self, Symbol};
use crate::thread_state::ThreadState;
use crate::value::{Procedure, Value};
use tracing::{debug, trace};

enum Return {
    Value(Value),
    TailCall(Value, EnvRef),
}

/// Evaluate `expr` in `env`. Calls in tail position reuse the loop
/// instead of growing the Rust stack.
pub fn eval(expr: &Value, env: &EnvRef) -> Result<Value> {
    let _guard = ThreadState::enter()?;

    let mut expr = expr.clone();
    let mut env = env.clone();
    loop {
        let (head, tail) = match &expr {
            Value::Symbol(s) => {
                return env
                    .lookup(*s)
                    .ok_or_else(|| ErrorKind::UnboundVariable(*s).into())
            }
            Value::Pair(pair) => (pair.car.clone(), pair.cdr.clone()),
            _ => return Ok(expr),
        };

        let ret = match head {
            Value::Symbol(symbol::QUOTE) => quote(&expr, &tail)?,
            Value::Symbol(symbol::IF) => if_form(&expr, &tail, &env)?,
            Value::Symbol(symbol::DEFINE) => define(&expr, &tail, &env)?,
            Value::Symbol(symbol::SET) => set_var(&expr, &tail, &env)?,
            Value::Symbol(symbol::LAMBDA) => lambda(&expr, &tail, &env)?,
            Value::Symbol(symbol::BEGIN) => {
                let body = operands(symbol::BEGIN, &expr, &tail)?;
                sequence(&body, env.clone())?
            }
            Value::Symbol(symbol::LET) => let_form(&expr, &tail, &env)?,
            Value::Symbol(symbol::COND) => cond(&expr, &tail, &env)?,
            Value::Symbol(symbol::AND) => and_or(symbol::AND, &expr, &tail, &env)?,
            Value::Symbol(symbol::OR) => and_or(symbol::OR, &expr, &tail, &env)?,
            Value::Symbol(symbol::ELSE) => Err(ErrorKind::MalformedForm {
                keyword: symbol::ELSE,
                form: expr.short_repr(),
            })?,
            _ => application(&head, &tail, &env)
                .map_err(|e| e.with_context(expr.short_repr()))?,
        };

        match ret {
            Return::Value(value) => return Ok(value),
            Return::TailCall(x, e) => {
                expr = x;
                env = e;
            }
        }
    }
}

/// Call `proc` with already evaluated arguments.
pub fn apply(proc: &Value, args: &[Value]) -> Result<Value> {
    match call(proc, args)? {
        Return::Value(value) => Ok(value),
        Return::TailCall(expr, env) => eval(&expr, &env),
    }
}

fn call(proc: &Value, args: &[Value]) -> Result<Return> {
    match proc {
        Value::Native(builtin) => builtin.invoke(args).map(Return::Value),
        Value::Procedure(p) => {
            trace!(
                "apply {} to {} argument(s)",
                p.name().map_or("#<procedure>", |s| s.name()),
                args.len()
            );
            let local_env = p.new_local_env(args)?;
            sequence(&p.body().to_vec()?, local_env)
        }
        _ => Err(ErrorKind::NotAProcedure(proc.short_repr()).into()),
    }
}

fn application(head: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let proc = eval(head, env)?;
    let args = tail
        .iter_list()
        .map(|arg| eval(arg?, env))
        .collect::<Result<Vec<_>>>()?;
    call(&proc, &args)
}

/// Evaluate all but the last form; the last one is evaluated by the caller.
fn sequence(body: &[Value], env: EnvRef) -> Result<Return> {
    match body.split_last() {
        None => Ok(Return::Value(Value::Unspecified)),
        Some((last, init)) => {
            for form in init {
                eval(form, &env)?;
            }
            Ok(Return::TailCall(last.clone(), env))
        }
    }
}

fn malformed(keyword: Symbol, form: &Value) -> Error {
    ErrorKind::MalformedForm {
        keyword,
        form: form.short_repr(),
    }
    .into()
}

/// The operands of a special form as a vector; an improper list is malformed.
fn operands(keyword: Symbol, form: &Value, tail: &Value) -> Result<Vec<Value>> {
    tail.to_vec().map_err(|_| malformed(keyword, form))
}

fn quote(form: &Value, tail: &Value) -> Result<Return> {
    match operands(symbol::QUOTE, form, tail)?.as_slice() {
        [x] => Ok(Return::Value(x.clone())),
        _ => Err(malformed(symbol::QUOTE, form)),
    }
}

fn if_form(form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let (test, then, otherwise) = match operands(symbol::IF, form, tail)?.as_slice() {
        [test, then] => (test.clone(), then.clone(), None),
        [test, then, otherwise] => (test.clone(), then.clone(), Some(otherwise.clone())),
        _ => return Err(malformed(symbol::IF, form)),
    };

    if eval(&test, env)?.is_true() {
        Ok(Return::TailCall(then, env.clone()))
    } else {
        match otherwise {
            Some(x) => Ok(Return::TailCall(x, env.clone())),
            None => Ok(Return::Value(Value::Unspecified)),
        }
    }
}

fn define(form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let args = operands(symbol::DEFINE, form, tail)?;
    let (name, value) = match args.as_slice() {
        [Value::Symbol(name), expr] => (*name, eval(expr, env)?),
        [Value::Pair(signature), _, ..] => {
            let name = match signature.car {
                Value::Symbol(name) => name,
                _ => return Err(malformed(symbol::DEFINE, form)),
            };
            let params = signature.cdr.clone();
            check_params(symbol::DEFINE, form, &params)?;
            let body = Value::from_vec(args[1..].to_vec());
            let proc = Procedure::new(params, body, env.clone());
            (name, Value::Procedure(proc))
        }
        _ => return Err(malformed(symbol::DEFINE, form)),
    };

    debug!("define {}", name);
    env.define(name, value);
    Ok(Return::Value(Value::Unspecified))
}

fn set_var(form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let (name, expr) = match operands(symbol::SET, form, tail)?.as_slice() {
        [Value::Symbol(name), expr] => (*name, expr.clone()),
        _ => return Err(malformed(symbol::SET, form)),
    };

    let value = eval(&expr, env)?;
    debug!("set! {}", name);
    if env.assign(name, value) {
        Ok(Return::Value(Value::Unspecified))
    } else {
        Err(ErrorKind::UnboundVariable(name).into())
    }
}

fn lambda(form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let args = operands(symbol::LAMBDA, form, tail)?;
    if args.len() < 2 {
        return Err(malformed(symbol::LAMBDA, form));
    }
    let params = args[0].clone();
    check_params(symbol::LAMBDA, form, &params)?;
    let body = Value::from_vec(args[1..].to_vec());
    Ok(Return::Value(Value::Procedure(Procedure::new(
        params,
        body,
        env.clone(),
    ))))
}

/// Parameters are a symbol, or a proper or dotted list of symbols.
fn check_params(keyword: Symbol, form: &Value, params: &Value) -> Result<()> {
    let mut cursor = params;
    loop {
        match cursor {
            Value::Nil | Value::Symbol(_) => return Ok(()),
            Value::Pair(pair) if pair.car.is_symbol() => cursor = &pair.cdr,
            _ => return Err(malformed(keyword, form)),
        }
    }
}

fn let_form(form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let args = operands(symbol::LET, form, tail)?;
    let (bindings, body) = match args.split_first() {
        Some((bindings, body)) if !body.is_empty() => (bindings, body),
        _ => return Err(malformed(symbol::LET, form)),
    };

    let bindings = bindings.to_vec().map_err(|_| malformed(symbol::LET, form))?;
    let local_env: EnvRef = Environment::new(Some(env.clone())).into();
    for binding in &bindings {
        let binding = binding.to_vec().map_err(|_| malformed(symbol::LET, form))?;
        match binding.as_slice() {
            [Value::Symbol(name), expr] => {
                let value = eval(expr, env)?;
                local_env.define(*name, value);
            }
            _ => return Err(malformed(symbol::LET, form)),
        }
    }

    sequence(body, local_env)
}

fn cond(form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    for clause in operands(symbol::COND, form, tail)? {
        let clause = clause.to_vec().map_err(|_| malformed(symbol::COND, form))?;
        let (test, body) = match clause.split_first() {
            Some(x) => x,
            None => return Err(malformed(symbol::COND, form)),
        };

        if let Value::Symbol(symbol::ELSE) = test {
            return sequence(body, env.clone());
        }

        let result = eval(test, env)?;
        if result.is_true() {
            if body.is_empty() {
                return Ok(Return::Value(result));
            }
            return sequence(body, env.clone());
        }
    }
    Ok(Return::Value(Value::Unspecified))
}

/// `and` stops at the first false value, `or` at the first true one.
fn and_or(keyword: Symbol, form: &Value, tail: &Value, env: &EnvRef) -> Result<Return> {
    let stop_on = keyword == symbol::OR;
    let args = operands(keyword, form, tail)?;
    let (last, init) = match args.split_last() {
        Some(x) => x,
        None => return Ok(Return::Value((!stop_on).into())),
    };

    for expr in init {
        let value = eval(expr, env)?;
        if value.is_true() == stop_on {
            return Ok(Return::Value(value));
        }
    }
    Ok(Return::TailCall(last.clone(), env.clone()))
}
