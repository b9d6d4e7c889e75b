mod errors;
mod r7rs_6_2_equivalence_predicates;
mod r7rs_procedure_apply;

use crate::environment::{default_env, EnvRef};
use crate::errors::Result;
use crate::value::Value;

const SAMPLES: &str = include_str!("../../fixtures/samples.scm");

fn run(src: &str) -> Result<Value> {
    crate::run(src)
}

fn run_in_env(src: &str, env: &EnvRef) -> Result<Value> {
    crate::run_in_env(src, env)
}

/// A global environment with the sample programs loaded.
fn sample_env() -> EnvRef {
    let env = default_env();
    run_in_env(SAMPLES, &env).unwrap();
    env
}

fn read(src: &str) -> Value {
    crate::read_all(src).unwrap().remove(0)
}
