use crate::errors::*;
use crate::integer::Int;
use crate::lexer::{tokenize, PositionalToken, Token};
use crate::sourcecode::{Position, SourceMap};
use crate::thread_state::{DepthGuard, ThreadState};
use crate::value::Value;
use std::iter::Peekable;
use tracing::trace;

/// Parse every top-level form in `text`, failing on the first syntax error.
pub fn read_all(text: &str) -> Result<Vec<Value>> {
    Reader::new(text).collect()
}

/// Lazily reads top-level forms. After a syntax error the rest of the broken
/// form is skipped and reading continues with the next one.
pub struct Reader {
    tokens: Peekable<std::vec::IntoIter<PositionalToken>>,
    source: SourceMap,
    end_idx: usize,
    depth: usize,
}

impl Reader {
    pub fn new(text: &str) -> Self {
        Reader {
            tokens: tokenize(text).into_iter().peekable(),
            source: SourceMap::new(text),
            end_idx: text.len(),
            depth: 0,
        }
    }

    fn pos(&self, idx: usize) -> Position {
        self.source.position(idx)
    }

    /// Count one level of nesting against the thread's evaluation limits.
    fn nest(&mut self) -> Result<DepthGuard> {
        let idx = self.tokens.peek().map_or(self.end_idx, |t| t.start_idx);
        ThreadState::enter().map_err(|_| {
            ErrorKind::NestingTooDeep {
                pos: self.pos(idx),
            }
            .into()
        })
    }

    fn parse_expression(&mut self) -> Result<Value> {
        let _guard = self.nest()?;
        let PositionalToken {
            start_idx, token, ..
        } = match self.tokens.next() {
            Some(t) => t,
            None => Err(ErrorKind::UnexpectedEof {
                pos: self.pos(self.end_idx),
            })?,
        };

        match token {
            Token::Symbol(s) => parse_atom(&s),
            Token::ListOpen => {
                self.depth += 1;
                self.parse_list_open(start_idx)
            }
            Token::Quote => Ok(scheme!(quote, @self.parse_expression()?)),
            Token::ListClose => {
                self.depth = self.depth.saturating_sub(1);
                Err(ErrorKind::UnexpectedCloseParen {
                    pos: self.pos(start_idx),
                })?
            }
            Token::Dot => Err(ErrorKind::MalformedDot {
                pos: self.pos(start_idx),
            })?,
        }
    }

    fn parse_list_open(&mut self, open_idx: usize) -> Result<Value> {
        let mut items = vec![];
        loop {
            match self.tokens.peek() {
                None => Err(ErrorKind::UnterminatedList {
                    pos: self.pos(open_idx),
                })?,
                Some(PositionalToken {
                    token: Token::ListClose,
                    ..
                }) => {
                    self.tokens.next();
                    self.depth -= 1;
                    return Ok(Value::from_vec(items));
                }
                Some(PositionalToken {
                    token: Token::Dot,
                    start_idx,
                    ..
                }) => {
                    let dot_idx = *start_idx;
                    self.tokens.next();
                    let tail = self.parse_dotted_tail(dot_idx, open_idx, items.is_empty())?;
                    return Ok(Value::list_with_tail(items, tail));
                }
                Some(_) => items.push(self.parse_expression()?),
            }
        }
    }

    /// Read the single form after a `.` and the closing paren that must follow it.
    fn parse_dotted_tail(&mut self, dot_idx: usize, open_idx: usize, no_head: bool) -> Result<Value> {
        let dot_pos = self.pos(dot_idx);
        if no_head {
            Err(ErrorKind::MalformedDot { pos: dot_pos })?
        }
        match self.tokens.peek() {
            Some(PositionalToken {
                token: Token::ListClose,
                ..
            })
            | Some(PositionalToken {
                token: Token::Dot, ..
            }) => Err(ErrorKind::MalformedDot { pos: dot_pos })?,
            _ => {}
        }

        let tail = self.parse_expression()?;

        match self.tokens.next() {
            Some(PositionalToken {
                token: Token::ListClose,
                ..
            }) => {
                self.depth -= 1;
                Ok(tail)
            }
            Some(PositionalToken { start_idx, token, .. }) => {
                if token == Token::ListOpen {
                    self.depth += 1;
                }
                Err(ErrorKind::MalformedDot {
                    pos: self.pos(start_idx),
                })?
            }
            None => Err(ErrorKind::UnterminatedList {
                pos: self.pos(open_idx),
            })?,
        }
    }

    /// Drop the remaining tokens of a form that failed to parse.
    fn recover(&mut self) {
        while self.depth > 0 {
            match self.tokens.next() {
                None => break,
                Some(PositionalToken {
                    token: Token::ListOpen,
                    ..
                }) => self.depth += 1,
                Some(PositionalToken {
                    token: Token::ListClose,
                    ..
                }) => self.depth -= 1,
                Some(_) => {}
            }
        }
        self.depth = 0;
    }
}

impl Iterator for Reader {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.peek()?;
        let result = self.parse_expression();
        if let Err(e) = &result {
            trace!(error = %e, "skipping malformed form");
            self.recover();
        }
        Some(result)
    }
}

fn parse_atom(s: &str) -> Result<Value> {
    match s {
        "#t" => Ok(Value::True),
        "#f" => Ok(Value::False),
        _ if is_integer_literal(s) => {
            let i: Int = s.parse().map_err(|_| ErrorKind::IntegerOverflow)?;
            Ok(Value::Integer(i))
        }
        _ => Ok(Value::symbol(s)),
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
