use crate::environment::{EnvRef, EnvWeak, Environment};
use crate::errors::*;
use crate::integer::Int;
use crate::symbol::Symbol;
use std::iter::FromIterator;

#[cfg(feature = "thread-safe")]
pub use std::sync::{Arc as Ref, Weak};

#[cfg(not(feature = "thread-safe"))]
pub use std::rc::{Rc as Ref, Weak};

pub type NativeFn = fn(&[Value]) -> Result<Value>;

/// A primitive procedure implemented in Rust.
pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub func: NativeFn,
}

impl Builtin {
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(ErrorKind::ArityMismatch {
                procedure: self.name.to_string(),
                expected: self.arity,
                got: args.len(),
            }
            .into());
        }
        (self.func)(args)
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#<procedure {}>", self.name)
    }
}

#[derive(Debug)]
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

impl Pair {
    pub fn new(car: Value, cdr: Value) -> Ref<Self> {
        Ref::new(Pair { car, cdr })
    }
}

// Unlink owned children in a loop so long or deeply nested lists
// do not recurse once per pair when they are freed.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut pending = vec![];
        take_owned_pairs(self, &mut pending);
        while let Some(pair) = pending.pop() {
            if let Ok(mut pair) = Ref::try_unwrap(pair) {
                take_owned_pairs(&mut pair, &mut pending);
            }
        }
    }
}

fn take_owned_pairs(pair: &mut Pair, pending: &mut Vec<Ref<Pair>>) {
    for slot in [&mut pair.car, &mut pair.cdr] {
        if slot.is_pair() {
            if let Value::Pair(p) = std::mem::replace(slot, Value::Nil) {
                pending.push(p);
            }
        }
    }
}

#[derive(Clone)]
pub enum Value {
    Unspecified,
    Nil,
    Symbol(Symbol),
    Integer(Int),
    True,
    False,
    Pair(Ref<Pair>),
    Procedure(Procedure<EnvRef>),
    Native(&'static Builtin),
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Integer(Int::from(i))
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn cons(car: impl Into<Value>, cdr: impl Into<Value>) -> Self {
        Value::Pair(Pair::new(car.into(), cdr.into()))
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Value::list_with_tail(items, Value::Nil)
    }

    /// Build `(a b c . tail)`; with a `Nil` tail this is a proper list.
    pub fn list_with_tail(items: Vec<Value>, tail: Value) -> Self {
        items
            .into_iter()
            .rev()
            .fold(tail, |list, item| Value::cons(item, list))
    }

    pub fn decons(&self) -> Result<(&Value, &Value)> {
        match self {
            Value::Pair(pair) => Ok((&pair.car, &pair.cdr)),
            _ => Err(ErrorKind::TypeError(format!("not a pair: {}", self)))?,
        }
    }

    pub fn car(&self) -> Result<&Value> {
        self.decons().map(|(car, _)| car)
    }

    pub fn cdr(&self) -> Result<&Value> {
        self.decons().map(|(_, cdr)| cdr)
    }

    pub fn iter_list(&self) -> ListIterator {
        ListIterator::from_value(self)
    }

    /// Collect the elements of a proper list.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.iter_list().map(|r| r.map(Clone::clone)).collect()
    }

    pub fn is_true(&self) -> bool {
        match self {
            Value::False | Value::Nil => false,
            _ => true,
        }
    }

    pub fn is_bool(&self) -> bool {
        match self {
            Value::True | Value::False => true,
            _ => false,
        }
    }

    pub fn is_nil(&self) -> bool {
        match self {
            Value::Nil => true,
            _ => false,
        }
    }

    pub fn is_pair(&self) -> bool {
        match self {
            Value::Pair(_) => true,
            _ => false,
        }
    }

    pub fn is_list(&self) -> bool {
        let mut cursor = self;
        loop {
            match cursor {
                Value::Nil => return true,
                Value::Pair(pair) => cursor = &pair.cdr,
                _ => return false,
            }
        }
    }

    pub fn is_number(&self) -> bool {
        match self {
            Value::Integer(_) => true,
            _ => false,
        }
    }

    pub fn is_symbol(&self) -> bool {
        match self {
            Value::Symbol(_) => true,
            _ => false,
        }
    }

    pub fn is_procedure(&self) -> bool {
        match self {
            Value::Procedure(_) | Value::Native(_) => true,
            _ => false,
        }
    }

    pub fn try_as_symbol(&self) -> Result<Symbol> {
        match self {
            Value::Symbol(s) => Ok(*s),
            _ => Err(ErrorKind::TypeError(format!("{} is not a symbol", self)).into()),
        }
    }

    /// Numeric view of a value. Booleans count as 0 and 1.
    pub fn try_as_int(&self) -> Result<Int> {
        match self {
            Value::Integer(i) => Ok(i.clone()),
            Value::True => Ok(Int::from(1i64)),
            Value::False => Ok(Int::from(0i64)),
            _ => Err(ErrorKind::TypeError(format!("{} is not a number", self)).into()),
        }
    }

    /// Identity for pairs and procedures, value comparison for atoms.
    pub fn eqv(&self, rhs: &Self) -> bool {
        use Value::*;
        match (self, rhs) {
            (Unspecified, Unspecified) => true,
            (Nil, Nil) => true,
            (True, True) => true,
            (False, False) => true,
            (Integer(a), Integer(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (Pair(a), Pair(b)) => Ref::ptr_eq(a, b),
            (Procedure(a), Procedure(b)) => a.eqv(b),
            (Native(a), Native(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }

    /// Structural equality: pairs compare element-wise, procedures by identity.
    pub fn equal(&self, rhs: &Self) -> bool {
        let mut pending = vec![(self, rhs)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Value::Pair(x), Value::Pair(y)) => {
                    if !Ref::ptr_eq(x, y) {
                        pending.push((&x.cdr, &y.cdr));
                        pending.push((&x.car, &y.car));
                    }
                }
                _ => {
                    if !a.eqv(b) {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn short_repr(&self) -> String {
        format!("{}", self)
    }
}

enum Print<'a> {
    Value(&'a Value),
    Text(&'static str),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // nested lists are expanded onto an explicit stack
        let mut pending = vec![Print::Value(self)];
        while let Some(item) = pending.pop() {
            let value = match item {
                Print::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Print::Value(value) => value,
            };
            match value {
                Value::Unspecified => write!(f, "#<unspecified>")?,
                Value::Nil => write!(f, "()")?,
                Value::Symbol(s) => write!(f, "{}", s.name())?,
                Value::Integer(i) => write!(f, "{}", i)?,
                Value::True => write!(f, "#t")?,
                Value::False => write!(f, "#f")?,
                Value::Pair(pair) => {
                    let mut items = vec![Print::Text("("), Print::Value(&pair.car)];
                    let mut cdr = &pair.cdr;
                    loop {
                        match cdr {
                            Value::Nil => break,
                            Value::Pair(p) => {
                                items.push(Print::Text(" "));
                                items.push(Print::Value(&p.car));
                                cdr = &p.cdr;
                            }
                            _ => {
                                items.push(Print::Text(" . "));
                                items.push(Print::Value(cdr));
                                break;
                            }
                        }
                    }
                    items.push(Print::Text(")"));
                    pending.extend(items.into_iter().rev());
                }
                Value::Procedure(p) => match p.name() {
                    Some(name) => write!(f, "#<procedure {}>", name)?,
                    None => write!(f, "#<procedure>")?,
                },
                Value::Native(b) => write!(f, "#<procedure {}>", b.name)?,
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Procedure(p) => write!(f, "{:?}", p),
            _ => write!(f, "{}", self),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, rhs: &Self) -> bool {
        self.equal(rhs)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Int> for Value {
    fn from(i: Int) -> Self {
        Value::Integer(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::from_vec(iter.into_iter().collect())
    }
}

/// Parameters and body of a `lambda` expression.
struct Lambda {
    params: Value,
    body: Value,
}

/// A closure. `E` is the captured environment, held strongly (`EnvRef`) by values
/// and weakly (`EnvWeak`) when stored inside the very frame it captured.
#[derive(Clone)]
pub struct Procedure<E> {
    lambda: Ref<Lambda>,
    env: E,
    name: Option<Symbol>,
}

impl<E> Procedure<E> {
    pub fn name(&self) -> Option<Symbol> {
        self.name
    }

    pub fn rename(mut self, name: Symbol) -> Self {
        if self.name.is_none() {
            self.name = Some(name);
        }
        self
    }

    pub fn params(&self) -> &Value {
        &self.lambda.params
    }

    /// The body expressions as a proper list.
    pub fn body(&self) -> &Value {
        &self.lambda.body
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn eqv(&self, other: &Self) -> bool {
        Ref::ptr_eq(&self.lambda, &other.lambda)
    }
}

impl Procedure<EnvRef> {
    pub fn new(params: Value, body: Value, env: EnvRef) -> Self {
        Procedure {
            lambda: Ref::new(Lambda { params, body }),
            env,
            name: None,
        }
    }

    pub fn arity(&self) -> Arity {
        let mut n = 0;
        let mut cursor = self.params();
        loop {
            match cursor {
                Value::Pair(pair) => {
                    n += 1;
                    cursor = &pair.cdr;
                }
                Value::Nil => return Arity::Exact(n),
                _ => return Arity::AtLeast(n),
            }
        }
    }

    /// Fresh frame whose parent is the captured environment, with the parameters bound.
    pub fn new_local_env(&self, args: &[Value]) -> Result<EnvRef> {
        let mut env = Environment::new(Some(self.env.clone()));
        if env.set_vars(self.params(), args).is_none() {
            return Err(ErrorKind::ArityMismatch {
                procedure: self.name.map_or("#<procedure>".to_string(), |s| s.to_string()),
                expected: self.arity(),
                got: args.len(),
            }
            .into());
        }
        Ok(env.into())
    }

    pub fn downgrade(&self) -> Procedure<EnvWeak> {
        Procedure {
            lambda: self.lambda.clone(),
            env: self.env.downgrade(),
            name: self.name,
        }
    }
}

impl Procedure<EnvWeak> {
    pub fn upgrade(&self) -> Option<Procedure<EnvRef>> {
        self.env.upgrade().map(|env| Procedure {
            lambda: self.lambda.clone(),
            env,
            name: self.name,
        })
    }
}

impl<E> std::fmt::Debug for Procedure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = self.name.map_or("λ", |s| s.name());
        write!(f, "#<procedure {} {}>", name, self.lambda.params)
    }
}

pub struct ListIterator<'a> {
    next_pair: Option<&'a Value>,
}

impl<'a> ListIterator<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        ListIterator {
            next_pair: Some(value),
        }
    }
}

impl<'a> Iterator for ListIterator<'a> {
    type Item = Result<&'a Value>;
    fn next(&mut self) -> Option<Self::Item> {
        let (car, cdr) = match self.next_pair? {
            Value::Nil => return None,
            Value::Pair(pair) => (&pair.car, &pair.cdr),
            other => {
                self.next_pair = None;
                return Some(Err(ErrorKind::TypeError(format!(
                    "not a proper list, tail is {}",
                    other
                ))
                .into()));
            }
        };

        self.next_pair = Some(cdr);
        Some(Ok(car))
    }
}
