use minischeme::environment::{EnvRef, EnvWeak};
use minischeme::lexer::{tokenize, Lexer, Token};
use minischeme::{eval_each, Value};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Completes symbols against the names bound in an environment.
pub struct EnvHelper(EnvWeak);

impl EnvHelper {
    pub fn new(env: EnvWeak) -> Self {
        EnvHelper(env)
    }
}

impl Helper for EnvHelper {}

impl Hinter for EnvHelper {
    type Hint = String;
}

impl Highlighter for EnvHelper {}

impl Validator for EnvHelper {}

impl Completer for EnvHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let env = match self.0.upgrade() {
            Some(env) => env,
            None => return Ok((0, vec![])),
        };

        let tokens = tokenize(line);
        let token = match tokens
            .iter()
            .find(|pt| pt.start_idx <= pos && pt.end_idx == pos)
        {
            Some(t) => t,
            None => return Ok((0, vec![])),
        };

        let prefix = match &token.token {
            Token::Symbol(s) => &s[..pos - token.start_idx],
            _ => return Ok((0, vec![])),
        };

        let mut candidates: Vec<_> = env
            .borrow()
            .all_keys()
            .map(|key| key.name())
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        candidates.sort();
        candidates.dedup();

        Ok((token.start_idx, candidates))
    }
}

pub struct ReplInput {
    rl: Editor<EnvHelper>,
}

impl ReplInput {
    pub fn new(env: &EnvRef) -> Self {
        let mut rl = Editor::new();
        rl.set_helper(Some(EnvHelper::new(env.downgrade())));
        ReplInput { rl }
    }

    pub fn read_line(&mut self, prompt: &str) -> rustyline::Result<String> {
        let line = self.rl.readline(prompt)?;
        self.rl.add_history_entry(line.as_str());
        Ok(line + "\n")
    }
}

/// Read, evaluate and print until end of input. Lines are collected until
/// the parentheses balance; errors are reported and the loop continues.
pub fn repl(env: &EnvRef) -> rustyline::Result<()> {
    let mut input = ReplInput::new(env);
    let mut source = String::new();

    loop {
        let prompt = if source.is_empty() { ">> " } else { ".. " };
        match input.read_line(prompt) {
            Ok(line) => source.push_str(&line),
            Err(ReadlineError::Interrupted) => {
                source.clear();
                continue;
            }
            Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        }

        if !Lexer::new().tokenize(&source).is_balanced() {
            continue;
        }

        for result in eval_each(&source, env) {
            match result {
                Ok(Value::Unspecified) => {}
                Ok(value) => println!("{}", value),
                Err(e) => eprintln!("{}", e),
            }
        }
        source.clear();
    }
}
