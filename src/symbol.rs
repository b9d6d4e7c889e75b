use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Interned name. Two symbols are equal iff they were created from the same name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(usize);

// order must match the constants below
const PREDEFINED: [&str; 11] = [
    "quote", "if", "define", "set!", "lambda", "begin", "let", "cond", "else", "and", "or",
];

pub const QUOTE: Symbol = Symbol(0);
pub const IF: Symbol = Symbol(1);
pub const DEFINE: Symbol = Symbol(2);
pub const SET: Symbol = Symbol(3);
pub const LAMBDA: Symbol = Symbol(4);
pub const BEGIN: Symbol = Symbol(5);
pub const LET: Symbol = Symbol(6);
pub const COND: Symbol = Symbol(7);
pub const ELSE: Symbol = Symbol(8);
pub const AND: Symbol = Symbol(9);
pub const OR: Symbol = Symbol(10);

struct SymbolTable {
    names: Vec<&'static str>,
    ids: HashMap<&'static str, usize>,
}

impl SymbolTable {
    fn new() -> Self {
        let mut table = SymbolTable {
            names: vec![],
            ids: HashMap::new(),
        };
        for name in PREDEFINED.iter() {
            table.intern(name);
        }
        table
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        // symbols live for the rest of the process
        let name: &'static str = Box::leak(name.to_string().into_boxed_str());
        let id = self.names.len();
        self.names.push(name);
        self.ids.insert(name, id);
        id
    }
}

lazy_static! {
    static ref SYMBOLS: Mutex<SymbolTable> = Mutex::new(SymbolTable::new());
}

impl Symbol {
    pub fn new<T: AsRef<str>>(name: T) -> Self {
        let mut table = SYMBOLS.lock().unwrap_or_else(PoisonError::into_inner);
        Symbol(table.intern(name.as_ref()))
    }

    pub fn name(&self) -> &'static str {
        let table = SYMBOLS.lock().unwrap_or_else(PoisonError::into_inner);
        table.names[self.0]
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, s: &str) -> bool {
        self.name() == s
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "'{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_name_same_symbol() {
        assert_eq!(Symbol::new("fib"), Symbol::new("fib"));
        assert_ne!(Symbol::new("fib"), Symbol::new("fact"));
        assert_eq!(Symbol::new("fib").name(), "fib");
    }

    #[test]
    fn keywords_are_preinterned() {
        assert_eq!(Symbol::new("quote"), QUOTE);
        assert_eq!(Symbol::new("lambda"), LAMBDA);
        assert_eq!(Symbol::new("set!"), SET);
        assert_eq!(OR.name(), "or");
    }
}
