mod repl;

use clap::Parser;
use minischeme::thread_state::{self, DEFAULT_MAX_DEPTH};
use minischeme::{default_env, load_file, run_in_env, Value};
use std::path::PathBuf;
use std::thread;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "minischeme", version, about = "A small Scheme interpreter")]
struct Args {
    /// Source files to load, in order
    #[clap(parse(from_os_str))]
    files: Vec<PathBuf>,

    /// Evaluate an expression and print its value
    #[clap(short, long = "eval", value_name = "EXPR")]
    eval: Vec<String>,

    /// Start the REPL after loading files and expressions
    #[clap(short, long)]
    interactive: bool,

    /// Maximum nesting depth of evaluation
    #[clap(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!("{:?}", args);

    let stack_limit = thread_state::stack_limit_for(args.max_depth);

    let worker = thread::Builder::new()
        .name("eval".into())
        .stack_size(thread_state::thread_stack_for(stack_limit))
        .spawn(move || run(args, stack_limit));

    let code = match worker {
        Ok(handle) => handle.join().unwrap_or(101),
        Err(e) => {
            eprintln!("could not start evaluation thread: {}", e);
            1
        }
    };
    std::process::exit(code)
}

fn run(args: Args, stack_limit: usize) -> i32 {
    thread_state::set_max_depth(args.max_depth);
    thread_state::set_stack_limit(stack_limit);
    let env = default_env();

    for file in &args.files {
        if let Err(e) = load_file(file, &env) {
            eprintln!("{}", e);
            return 1;
        }
    }

    for expr in &args.eval {
        match run_in_env(expr, &env) {
            Ok(Value::Unspecified) => {}
            Ok(value) => println!("{}", value),
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        }
    }

    if args.interactive || (args.files.is_empty() && args.eval.is_empty()) {
        if let Err(e) = repl::repl(&env) {
            eprintln!("{}", e);
            return 1;
        }
    }

    0
}
