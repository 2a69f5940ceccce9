//! Token sub-parsers.
//!
//! A [`TokenLexer`] is created on the first character of a token and then
//! resumed with each chunk of input until the token is complete. Every
//! lexer keeps only what it needs to continue from the next character (the
//! text accumulated so far plus its scanning state), so a token cut by any
//! number of chunk boundaries is still read exactly once.

use base64::{engine::general_purpose::STANDARD, Engine};

use super::{
    classifiers::{
        is_blob_char, is_identifier_char, is_identifier_start, is_number_start, non_finite_value,
    },
    cursor::InputCursor,
    error::{ReconError, ReconErrorKind},
    event::{NumericLiteral, ReadEvent},
};

/// Outcome of a step that may need more input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    Ready(T),
    Pending,
}

/// What follows an attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrFollower {
    /// `(` was consumed: the attribute has a body
    Body,
    /// Anything else (left unconsumed)
    Bare,
}

/// A completely lexed token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Literal(ReadEvent),
    Attribute { name: String, follower: AttrFollower },
}

macro_rules! ready {
    ($e:expr) => {
        match $e {
            Step::Ready(value) => value,
            Step::Pending => return Ok(Step::Pending),
        }
    };
}
pub(crate) use ready;

/// Input ran out at `cursor`: pending if more may follow, otherwise `kind`.
fn exhausted<T>(cursor: &InputCursor, kind: ReconErrorKind) -> Result<Step<T>, ReconError> {
    if cursor.is_partial() {
        Ok(Step::Pending)
    } else {
        Err(ReconError::new(kind, cursor.position()))
    }
}

/// A token in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenLexer {
    String(StringLexer),
    Identifier(IdentifierLexer),
    Number(NumberLexer),
    Blob(BlobLexer),
    Attribute(AttributeLexer),
}

impl TokenLexer {
    /// Start a literal whose first character `first` is under the cursor.
    /// Candidates are tried as quoted string, identifier, number, then blob.
    pub fn literal(first: char, cursor: &mut InputCursor) -> Result<Self, ReconError> {
        let start = cursor.position();
        let lexer = if first == '"' {
            TokenLexer::String(StringLexer::default())
        } else if is_identifier_start(first) {
            TokenLexer::Identifier(IdentifierLexer::new(first))
        } else if is_number_start(first) {
            TokenLexer::Number(NumberLexer::new(first, start))
        } else if first == '%' {
            TokenLexer::Blob(BlobLexer::new(start))
        } else {
            return Err(ReconError::new(
                ReconErrorKind::UnexpectedCharacter { found: first },
                start,
            ));
        };
        cursor.advance(first);
        Ok(lexer)
    }

    /// Start an attribute at the `@` under the cursor.
    pub fn attribute(cursor: &mut InputCursor) -> Self {
        cursor.advance('@');
        TokenLexer::Attribute(AttributeLexer::Start)
    }

    /// Continue with the input under the cursor.
    pub fn resume(&mut self, cursor: &mut InputCursor) -> Result<Step<Token>, ReconError> {
        let token = match self {
            TokenLexer::String(lexer) => Token::Literal(ReadEvent::Text(ready!(lexer.resume(cursor)?))),
            TokenLexer::Identifier(lexer) => {
                let ident = ready!(lexer.resume(cursor));
                Token::Literal(identifier_event(&ident))
            }
            TokenLexer::Number(lexer) => Token::Literal(ready!(lexer.resume(cursor)?)),
            TokenLexer::Blob(lexer) => Token::Literal(ready!(lexer.resume(cursor)?)),
            TokenLexer::Attribute(lexer) => {
                let (name, follower) = ready!(lexer.resume(cursor)?);
                Token::Attribute { name, follower }
            }
        };
        Ok(Step::Ready(token))
    }
}

/// Identifiers become text, except the boolean and non-finite keywords.
pub fn identifier_event(ident: &str) -> ReadEvent {
    match ident {
        "true" => ReadEvent::Boolean(true),
        "false" => ReadEvent::Boolean(false),
        _ => match non_finite_value(ident) {
            Some(value) => ReadEvent::Number(NumericLiteral::Float(value)),
            None => ReadEvent::Text(ident.to_string()),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierLexer {
    text: String,
}

impl IdentifierLexer {
    fn new(first: char) -> Self {
        Self {
            text: first.to_string(),
        }
    }

    fn resume(&mut self, cursor: &mut InputCursor) -> Step<String> {
        let from = cursor.offset();
        cursor.skip_while(is_identifier_char);
        self.text.push_str(cursor.slice_from(from));
        if cursor.peek().is_none() && cursor.is_partial() {
            return Step::Pending;
        }
        Step::Ready(std::mem::take(&mut self.text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Backslash,
    /// Inside `\uXXXX`; `high` is set while reading the low half of a pair
    Hex {
        high: Option<u32>,
        code: u32,
        digits: u8,
    },
    /// A high surrogate was read; `\` must follow
    LowBackslash { high: u32 },
    /// A high surrogate and `\` were read; `u` must follow
    LowU { high: u32 },
}

/// `"..."` with JSON-style escapes. Created after the opening quote.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLexer {
    text: String,
    escape: Escape,
    // stream offset of the backslash of the escape being read
    escape_at: usize,
}

impl Default for StringLexer {
    fn default() -> Self {
        Self {
            text: String::new(),
            escape: Escape::None,
            escape_at: 0,
        }
    }
}

impl StringLexer {
    fn invalid_escape(&self) -> ReconError {
        ReconError::new(ReconErrorKind::InvalidEscape, self.escape_at)
    }

    fn resume(&mut self, cursor: &mut InputCursor) -> Result<Step<String>, ReconError> {
        loop {
            let Some(c) = cursor.next_char() else {
                return exhausted(cursor, ReconErrorKind::UnclosedString);
            };
            let escape = self.escape;
            self.escape = match escape {
                Escape::None => match c {
                    '"' => return Ok(Step::Ready(std::mem::take(&mut self.text))),
                    '\\' => {
                        self.escape_at = cursor.position() - 1;
                        Escape::Backslash
                    }
                    _ => {
                        self.text.push(c);
                        Escape::None
                    }
                },
                Escape::Backslash => match unescape(c) {
                    Some(unescaped) => {
                        self.text.push(unescaped);
                        Escape::None
                    }
                    None if c == 'u' => Escape::Hex {
                        high: None,
                        code: 0,
                        digits: 0,
                    },
                    None => return Err(self.invalid_escape()),
                },
                Escape::Hex { high, code, digits } => {
                    let digit = c.to_digit(16).ok_or_else(|| self.invalid_escape())?;
                    let code = code * 16 + digit;
                    if digits < 3 {
                        Escape::Hex {
                            high,
                            code,
                            digits: digits + 1,
                        }
                    } else {
                        self.hex_complete(high, code)?
                    }
                }
                Escape::LowBackslash { high } if c == '\\' => Escape::LowU { high },
                Escape::LowU { high } if c == 'u' => Escape::Hex {
                    high: Some(high),
                    code: 0,
                    digits: 0,
                },
                Escape::LowBackslash { .. } | Escape::LowU { .. } => {
                    return Err(self.invalid_escape())
                }
            };
        }
    }

    /// Four hex digits were read, joining a surrogate pair when one follows.
    fn hex_complete(&mut self, high: Option<u32>, code: u32) -> Result<Escape, ReconError> {
        let code = match high {
            None if (0xD800..0xDC00).contains(&code) => {
                return Ok(Escape::LowBackslash { high: code })
            }
            None => code,
            Some(high) => {
                if !(0xDC00..0xE000).contains(&code) {
                    return Err(self.invalid_escape());
                }
                0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00)
            }
        };
        let unescaped = char::from_u32(code).ok_or_else(|| self.invalid_escape())?;
        self.text.push(unescaped);
        Ok(Escape::None)
    }
}

fn unescape(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'b' => Some('\u{0008}'),
        'f' => Some('\u{000C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
    /// `-` followed by an identifier: only `-inf`/`-infinity` are valid
    NegativeKeyword,
}

impl NumberState {
    fn is_accepting(self) -> bool {
        matches!(
            self,
            NumberState::Integer | NumberState::Fraction | NumberState::ExponentDigits
        )
    }
}

/// `-?digits(.digits)?([eE][+-]?digits)?`, or `-inf`/`-infinity`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLexer {
    text: String,
    state: NumberState,
    start: usize,
}

impl NumberLexer {
    fn new(first: char, start: usize) -> Self {
        let state = if first == '-' {
            NumberState::Sign
        } else {
            NumberState::Integer
        };
        Self {
            text: first.to_string(),
            state,
            start,
        }
    }

    fn resume(&mut self, cursor: &mut InputCursor) -> Result<Step<ReadEvent>, ReconError> {
        let from = cursor.offset();
        let complete = self.scan(cursor);
        self.text.push_str(cursor.slice_from(from));
        if !complete {
            return Ok(Step::Pending);
        }

        let invalid_at = |offset| ReconError::new(ReconErrorKind::InvalidNumber, offset);
        match self.state {
            NumberState::NegativeKeyword => match non_finite_value(&self.text[1..]) {
                Some(value) if value.is_infinite() => Ok(Step::Ready(ReadEvent::Number(
                    NumericLiteral::Float(f64::NEG_INFINITY),
                ))),
                _ => Err(invalid_at(self.start)),
            },
            state if !state.is_accepting() => Err(invalid_at(cursor.position())),
            _ => numeric_literal(&self.text)
                .map(|literal| Step::Ready(ReadEvent::Number(literal)))
                .ok_or_else(|| invalid_at(self.start)),
        }
    }

    /// Advance over number characters. False when the chunk ran out while
    /// the number could still continue.
    fn scan(&mut self, cursor: &mut InputCursor) -> bool {
        loop {
            let Some(c) = cursor.peek() else {
                return !cursor.is_partial();
            };
            let next = match (self.state, c) {
                (NumberState::Sign, c) if is_identifier_start(c) => NumberState::NegativeKeyword,
                (NumberState::NegativeKeyword, c) if is_identifier_char(c) => {
                    NumberState::NegativeKeyword
                }
                (NumberState::Sign, '0'..='9') => NumberState::Integer,
                (NumberState::Integer, '0'..='9') => NumberState::Integer,
                (NumberState::Integer, '.') => NumberState::Point,
                (NumberState::Integer | NumberState::Fraction, 'e' | 'E') => NumberState::Exponent,
                (NumberState::Point | NumberState::Fraction, '0'..='9') => NumberState::Fraction,
                (NumberState::Exponent, '+' | '-') => NumberState::ExponentSign,
                (
                    NumberState::Exponent | NumberState::ExponentSign | NumberState::ExponentDigits,
                    '0'..='9',
                ) => NumberState::ExponentDigits,
                _ => return true,
            };
            cursor.advance(c);
            self.state = next;
        }
    }
}

fn numeric_literal(text: &str) -> Option<NumericLiteral> {
    let is_float = text.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(n) = text.parse::<i64>() {
            return Some(NumericLiteral::Int(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(NumericLiteral::UInt(n));
        }
    }
    text.parse::<f64>().ok().map(NumericLiteral::Float)
}

/// `%` followed by standard base64. Created after the `%`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobLexer {
    encoded: String,
    start: usize,
}

impl BlobLexer {
    fn new(start: usize) -> Self {
        Self {
            encoded: String::new(),
            start,
        }
    }

    fn resume(&mut self, cursor: &mut InputCursor) -> Result<Step<ReadEvent>, ReconError> {
        let from = cursor.offset();
        cursor.skip_while(is_blob_char);
        self.encoded.push_str(cursor.slice_from(from));
        if cursor.peek().is_none() && cursor.is_partial() {
            return Ok(Step::Pending);
        }
        STANDARD
            .decode(&self.encoded)
            .map(|bytes| Step::Ready(ReadEvent::Blob(bytes)))
            .map_err(|_| ReconError::new(ReconErrorKind::InvalidBlob, self.start))
    }
}

/// `@name` or `@"quoted name"`, plus whether a `(` body follows immediately.
/// Created after the `@`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeLexer {
    Start,
    Quoted(StringLexer),
    Bare(IdentifierLexer),
    /// The name is complete; waiting to see whether `(` follows
    Named(String),
}

impl AttributeLexer {
    fn resume(
        &mut self,
        cursor: &mut InputCursor,
    ) -> Result<Step<(String, AttrFollower)>, ReconError> {
        loop {
            let next = match self {
                AttributeLexer::Start => match cursor.peek() {
                    None => return exhausted(cursor, ReconErrorKind::UnexpectedEnd),
                    Some('"') => {
                        cursor.advance('"');
                        AttributeLexer::Quoted(StringLexer::default())
                    }
                    Some(c) if is_identifier_start(c) => {
                        cursor.advance(c);
                        AttributeLexer::Bare(IdentifierLexer::new(c))
                    }
                    Some(c) => {
                        return Err(ReconError::new(
                            ReconErrorKind::UnexpectedCharacter { found: c },
                            cursor.position(),
                        ))
                    }
                },
                AttributeLexer::Quoted(lexer) => AttributeLexer::Named(ready!(lexer.resume(cursor)?)),
                AttributeLexer::Bare(lexer) => AttributeLexer::Named(ready!(lexer.resume(cursor))),
                AttributeLexer::Named(name) => {
                    let follower = match cursor.peek() {
                        None if cursor.is_partial() => return Ok(Step::Pending),
                        Some('(') => {
                            cursor.advance('(');
                            AttrFollower::Body
                        }
                        _ => AttrFollower::Bare,
                    };
                    return Ok(Step::Ready((std::mem::take(name), follower)));
                }
            };
            *self = next;
        }
    }
}
