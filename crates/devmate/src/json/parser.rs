//! JSON parser implementation

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::{JsonLexer, Token, TokenKind};
use crate::value::{Array, Number, Object, Value};

/// Configuration for the JSON parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// Recursive-descent JSON parser with depth and size limits
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: JsonLexer<'a>,
    config: Config,
    depth: u16,
    input_len: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            lexer: JsonLexer::new(input),
            config,
            depth: 0,
            input_len: input.len(),
        }
    }

    /// Parse the complete input into a single Value.
    ///
    /// Anything other than whitespace after the root value is an error.
    pub fn parse_value(&mut self) -> Result<Value> {
        if self.config.max_size > 0 && self.input_len > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.lexer.position(),
            ));
        }

        let token = self.lexer.next_token()?;
        let value = self.parse_token(token)?;

        let trailing = self.lexer.next_token()?;
        if !trailing.is_eof() {
            return Err(Error::at(ErrorKind::TrailingContent, trailing.span.start));
        }

        Ok(value)
    }

    fn parse_token(&mut self, token: Token) -> Result<Value> {
        match token.kind {
            TokenKind::LeftBrace => self.parse_object(),
            TokenKind::LeftBracket => self.parse_array(),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::String(s) => Ok(Value::String(s)),
            TokenKind::Number(literal) => Ok(Value::Number(Number::from_literal(literal))),
            _ => Err(expected_error("value", &token)),
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.increment_depth()?;
        let mut object = Object::new();

        let mut token = self.lexer.next_token()?;
        if token.kind == TokenKind::RightBrace {
            self.decrement_depth();
            return Ok(Value::Object(object));
        }

        loop {
            let key = match token.kind {
                TokenKind::String(key) => key,
                TokenKind::RightBrace => {
                    return Err(Error::at(ErrorKind::TrailingComma, token.span.start));
                }
                _ => return Err(expected_error("string key", &token)),
            };

            let colon = self.lexer.next_token()?;
            if colon.kind != TokenKind::Colon {
                return Err(expected_error("':'", &colon));
            }

            let value_token = self.lexer.next_token()?;
            let value = self.parse_token(value_token)?;
            object.push(key, value);

            let separator = self.lexer.next_token()?;
            match separator.kind {
                TokenKind::Comma => token = self.lexer.next_token()?,
                TokenKind::RightBrace => break,
                _ => return Err(expected_error("',' or '}'", &separator)),
            }
        }

        self.decrement_depth();
        Ok(Value::Object(object))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.increment_depth()?;
        let mut array = Array::new();

        let mut token = self.lexer.next_token()?;
        if token.kind == TokenKind::RightBracket {
            self.decrement_depth();
            return Ok(Value::Array(array));
        }

        loop {
            if token.kind == TokenKind::RightBracket {
                return Err(Error::at(ErrorKind::TrailingComma, token.span.start));
            }
            array.push(self.parse_token(token)?);

            let separator = self.lexer.next_token()?;
            match separator.kind {
                TokenKind::Comma => token = self.lexer.next_token()?,
                TokenKind::RightBracket => break,
                _ => return Err(expected_error("',' or ']'", &separator)),
            }
        }

        self.decrement_depth();
        Ok(Value::Array(array))
    }

    fn increment_depth(&mut self) -> Result<()> {
        if self.config.max_depth > 0 && self.depth >= self.config.max_depth {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                self.lexer.position(),
            ));
        }
        self.depth = self.depth.saturating_add(1);
        Ok(())
    }

    fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

fn expected_error(expected: &str, token: &Token) -> Error {
    Error::at(
        ErrorKind::Expected {
            expected: expected.to_string(),
            found: token.kind.describe().to_string(),
        },
        token.span.start,
    )
}
