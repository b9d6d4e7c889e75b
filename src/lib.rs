//! A small Scheme interpreter: a reader for S-expressions, a tree-walking
//! evaluator with lexically scoped closures, and a library of builtins.

#[macro_use]
mod scheme;

pub mod builtins;
pub mod environment;
mod envref;
pub mod errors;
pub mod integer;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod sourcecode;
pub mod symbol;
pub mod thread_state;
pub mod value;

#[cfg(test)]
mod tests;

pub use environment::{default_env, EnvRef, Environment};
pub use errors::{Error, ErrorKind, Result};
pub use interpreter::{apply, eval};
pub use parser::{read_all, Reader};
pub use value::Value;

use std::path::Path;
use tracing::debug;

/// Evaluate every form of `src` in a fresh global environment and return
/// the value of the last one.
pub fn run(src: &str) -> Result<Value> {
    run_in_env(src, &default_env())
}

/// Evaluate every form of `src` in `env`, stopping at the first error.
pub fn run_in_env(src: &str, env: &EnvRef) -> Result<Value> {
    let mut result = Value::Unspecified;
    for expr in Reader::new(src) {
        result = eval(&expr?, env)?;
    }
    Ok(result)
}

/// One result per top-level form; a failing form does not stop the ones after it.
pub fn eval_each(src: &str, env: &EnvRef) -> Vec<Result<Value>> {
    Reader::new(src)
        .map(|expr| expr.and_then(|expr| eval(&expr, env)))
        .collect()
}

pub fn load_file(path: impl AsRef<Path>, env: &EnvRef) -> Result<Value> {
    let path = path.as_ref();
    debug!("loading {}", path.display());
    let src = std::fs::read_to_string(path)?;
    run_in_env(&src, env).map_err(|e| e.with_context(format!("{}", path.display())))
}
