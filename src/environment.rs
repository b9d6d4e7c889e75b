pub use crate::envref::{EnvRef, EnvWeak};
use crate::builtins;
use crate::symbol::Symbol;
use crate::value::{Builtin, Procedure, Value};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum Entry {
    Value(Value),
    Procedure(Procedure<EnvWeak>),
}

/// One frame of bindings plus the link to its enclosing frame.
pub struct Environment {
    map: HashMap<Symbol, Entry>,
    parent: Option<EnvRef>,
}

impl Environment {
    pub fn new(parent: Option<EnvRef>) -> Environment {
        Environment {
            map: Default::default(),
            parent,
        }
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    pub fn lookup(&self, key: Symbol) -> Option<Value> {
        match self.map.get(&key) {
            None => self.parent.as_ref().and_then(|p| p.borrow().lookup(key)),
            Some(Entry::Value(value)) => Some(value.clone()),
            // the frame is borrowed, so the weak link to it is still alive
            Some(Entry::Procedure(proc)) => proc.upgrade().map(Value::Procedure),
        }
    }

    pub fn contains_local(&self, key: Symbol) -> bool {
        self.map.contains_key(&key)
    }

    pub fn insert_entry(&mut self, key: Symbol, entry: Entry) {
        self.map.insert(key, entry);
    }

    pub fn insert_native(&mut self, builtin: &'static Builtin) {
        self.insert_entry(Symbol::new(builtin.name), Entry::Value(Value::Native(builtin)));
    }

    /// Bind parameters positionally. A dotted tail or a lone symbol collects the
    /// remaining arguments into a list. Returns `None` on a count mismatch.
    pub fn set_vars(&mut self, params: &Value, args: &[Value]) -> Option<()> {
        let mut names = params;
        let mut args = args.iter();
        loop {
            match names {
                Value::Nil => {
                    return match args.next() {
                        None => Some(()),
                        Some(_) => None,
                    }
                }
                Value::Symbol(rest) => {
                    let rest_list: Value = args.cloned().collect();
                    self.insert_entry(*rest, Entry::Value(rest_list));
                    return Some(());
                }
                Value::Pair(pair) => {
                    let name = pair.car.try_as_symbol().ok()?;
                    let arg = args.next()?;
                    self.insert_entry(name, Entry::Value(arg.clone()));
                    names = &pair.cdr;
                }
                _ => return None,
            }
        }
    }

    pub fn all_keys(&self) -> impl Iterator<Item = Symbol> {
        let mut keys: Vec<_> = self.map.keys().cloned().collect();
        keys.extend(
            self.parent
                .iter()
                .flat_map(|parent| parent.borrow().all_keys()),
        );
        keys.into_iter()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Environment {{")?;
        for (i, (k, v)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match v {
                Entry::Value(x) => write!(f, "{}: {}", k, x)?,
                Entry::Procedure(p) => write!(f, "{}: {:?}", k, p)?,
            }
        }
        write!(f, "}}")
    }
}

impl EnvRef {
    pub fn lookup(&self, key: Symbol) -> Option<Value> {
        self.borrow().lookup(key)
    }

    /// Bind `key` in this frame, replacing any previous binding here.
    pub fn define(&self, key: Symbol, value: Value) {
        let entry = self.entry_for(key, value);
        self.borrow_mut().insert_entry(key, entry);
    }

    /// Rebind the nearest existing `key` along the chain. Returns `false` if unbound.
    pub fn assign(&self, key: Symbol, value: Value) -> bool {
        let mut current = self.clone();
        loop {
            if current.borrow().contains_local(key) {
                current.define(key, value);
                return true;
            }
            let parent = current.borrow().parent().cloned();
            match parent {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    // avoid Rc loops by storing closures that refer to the
    // environment they live in as weak references.
    fn entry_for(&self, key: Symbol, value: Value) -> Entry {
        match value {
            Value::Procedure(proc) => {
                let proc = proc.rename(key);
                if proc.env().ptr_eq(self) {
                    Entry::Procedure(proc.downgrade())
                } else {
                    Entry::Value(Value::Procedure(proc))
                }
            }
            value => Entry::Value(value),
        }
    }
}

/// The global frame with every builtin procedure bound.
pub fn default_env() -> EnvRef {
    let mut env = Environment::new(None);
    builtins::install(&mut env);
    env.into()
}
