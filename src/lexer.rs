use std::iter::Peekable;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    ListOpen,
    ListClose,
    Quote,
    Dot,
    Symbol(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::ListOpen => write!(f, "("),
            Token::ListClose => write!(f, ")"),
            Token::Quote => write!(f, "'"),
            Token::Dot => write!(f, "."),
            Token::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// A token with the byte range it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalToken {
    pub start_idx: usize,
    pub end_idx: usize,
    pub token: Token,
}

impl From<PositionalToken> for Token {
    fn from(token: PositionalToken) -> Self {
        token.token
    }
}

type CharI = <std::str::CharIndices<'static> as Iterator>::Item;

pub struct Lexer {
    token_stream: Vec<PositionalToken>,
    list_level: isize,
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            list_level: 0,
            token_stream: vec![],
        }
    }

    /// `true` unless there are more `(` than `)` so far.
    pub fn is_balanced(&self) -> bool {
        self.list_level <= 0
    }

    pub fn take(&mut self) -> Vec<Token> {
        self.take_pos().into_iter().map(Token::from).collect()
    }

    pub fn take_pos(&mut self) -> Vec<PositionalToken> {
        std::mem::replace(&mut self.token_stream, vec![])
    }

    pub fn tokenize(&mut self, input: &str) -> &mut Self {
        let mut chars = input.char_indices().peekable();
        while skip_whitespace(&mut chars) {
            let token = self.read_token(&mut chars);
            self.token_stream.extend(token);
        }
        self
    }

    fn read_token(
        &mut self,
        chars: &mut Peekable<impl Iterator<Item = CharI>>,
    ) -> Option<PositionalToken> {
        let (idx, ch) = *chars.peek()?;
        let single = |token| PositionalToken {
            start_idx: idx,
            end_idx: idx + 1,
            token,
        };
        match ch {
            '(' => {
                chars.next();
                self.list_level += 1;
                Some(single(Token::ListOpen))
            }
            ')' => {
                chars.next();
                self.list_level -= 1;
                Some(single(Token::ListClose))
            }
            '\'' => {
                chars.next();
                Some(single(Token::Quote))
            }
            ';' => {
                skip_line_comment(chars);
                None
            }
            _ => {
                let token = read_symbol(chars);
                match &token.token {
                    Token::Symbol(s) if s == "." => Some(single(Token::Dot)),
                    _ => Some(token),
                }
            }
        }
    }
}

/// Convenience for lexing a complete text in one go.
pub fn tokenize(input: &str) -> Vec<PositionalToken> {
    Lexer::new().tokenize(input).take_pos()
}

/// skip whitespace and return true if there are characters left.
fn skip_whitespace(chars: &mut Peekable<impl Iterator<Item = CharI>>) -> bool {
    loop {
        match chars.peek() {
            Some((_, ch)) if ch.is_whitespace() => {
                chars.next();
            }
            Some(_) => return true,
            None => return false,
        }
    }
}

fn skip_line_comment(chars: &mut Peekable<impl Iterator<Item = CharI>>) {
    for (_, ch) in chars {
        if ch == '\n' {
            break;
        }
    }
}

fn read_symbol(chars: &mut Peekable<impl Iterator<Item = CharI>>) -> PositionalToken {
    let mut buf = String::new();
    let mut start_idx = None;
    let mut end_idx = 0;
    while let Some(&(idx, ch)) = chars.peek() {
        if ch.is_whitespace() || is_delimiter(ch) {
            break;
        }
        start_idx.get_or_insert(idx);
        end_idx = idx + ch.len_utf8();
        buf.push(ch);
        chars.next();
    }
    PositionalToken {
        start_idx: start_idx.unwrap_or(end_idx),
        end_idx,
        token: Token::Symbol(buf),
    }
}

fn is_delimiter(ch: char) -> bool {
    match ch {
        '(' | ')' | '\'' | ';' => true,
        _ => false,
    }
}
