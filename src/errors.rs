use crate::sourcecode::Position;
use crate::symbol::Symbol;

pub type Result<T> = std::result::Result<T, Error>;

/// Declared argument count of a procedure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// The error families a front-end distinguishes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Category {
    Syntax,
    UnboundVariable,
    NotAProcedure,
    ArityMismatch,
    Type,
    Runtime,
    Io,
}

#[derive(Debug)]
pub enum ErrorKind {
    UnterminatedList { pos: Position },
    UnexpectedCloseParen { pos: Position },
    UnexpectedEof { pos: Position },
    MalformedDot { pos: Position },
    NestingTooDeep { pos: Position },
    MalformedForm { keyword: Symbol, form: String },

    UnboundVariable(Symbol),
    NotAProcedure(String),
    ArityMismatch {
        procedure: String,
        expected: Arity,
        got: usize,
    },
    TypeError(String),

    IntegerOverflow,
    DivisionByZero,
    RecursionLimit(usize),

    IoError(std::io::Error),
}

impl ErrorKind {
    pub fn category(&self) -> Category {
        use ErrorKind::*;
        match self {
            UnterminatedList { .. }
            | UnexpectedCloseParen { .. }
            | UnexpectedEof { .. }
            | MalformedDot { .. }
            | NestingTooDeep { .. }
            | MalformedForm { .. } => Category::Syntax,
            UnboundVariable(_) => Category::UnboundVariable,
            NotAProcedure(_) => Category::NotAProcedure,
            ArityMismatch { .. } => Category::ArityMismatch,
            TypeError(_) => Category::Type,
            IntegerOverflow | DivisionByZero | RecursionLimit(_) => Category::Runtime,
            IoError(_) => Category::Io,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            UnterminatedList { pos } => write!(f, "Syntax Error: unterminated list opened at {}", pos),
            UnexpectedCloseParen { pos } => write!(f, "Syntax Error: unexpected ')' at {}", pos),
            UnexpectedEof { pos } => write!(f, "Syntax Error: unexpected end of input at {}", pos),
            MalformedDot { pos } => write!(f, "Syntax Error: misplaced '.' at {}", pos),
            NestingTooDeep { pos } => write!(f, "Syntax Error: nesting too deep at {}", pos),
            MalformedForm { keyword, form } => {
                write!(f, "Syntax Error: malformed {} form: {}", keyword, form)
            }
            UnboundVariable(symbol) => write!(f, "Unbound variable: {}", symbol),
            NotAProcedure(repr) => write!(f, "Not a procedure: {}", repr),
            ArityMismatch {
                procedure,
                expected,
                got,
            } => write!(
                f,
                "Arity Error: {} expects {} argument(s) but got {}",
                procedure, expected, got
            ),
            TypeError(msg) => write!(f, "Type Error: {}", msg),
            IntegerOverflow => write!(f, "Integer overflow"),
            DivisionByZero => write!(f, "Division by zero"),
            RecursionLimit(depth) => write!(f, "Maximum recursion depth ({}) exceeded", depth),
            IoError(e) => write!(f, "IO Error: {}", e),
        }
    }
}

// only the innermost calls are kept
const MAX_CONTEXT: usize = 16;

// here we can add some context to the error
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: Vec<String>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            context: vec![],
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Enclosing calls, innermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn with_context(mut self, mut repr: String) -> Self {
        if self.context.len() >= MAX_CONTEXT {
            return self;
        }
        if repr.len() > 75 {
            let mut cut = 70;
            while !repr.is_char_boundary(cut) {
                cut -= 1;
            }
            repr.truncate(cut);
            repr.push_str(" ...");
        }
        self.context.push(repr);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if !self.context.is_empty() {
            writeln!(f, "Context:")?;
        }
        for x in self.context.iter().rev() {
            writeln!(f, "    {}", x)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(ioe: std::io::Error) -> Self {
        Error::new(ErrorKind::IoError(ioe))
    }
}
