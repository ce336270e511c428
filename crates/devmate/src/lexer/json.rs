//! JSON-specific lexer

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::cursor::Cursor;
use crate::lexer::token::{Token, TokenKind};

/// JSON lexer that tokenizes JSON input
#[derive(Clone, Debug)]
pub struct JsonLexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> JsonLexer<'a> {
    /// Create a new JSON lexer from input bytes
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Current position of the underlying cursor
    pub const fn position(&self) -> Pos {
        self.cursor.position()
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.cursor.skip_whitespace();

        let start = self.cursor.position();

        let kind = match self.cursor.current() {
            None => TokenKind::Eof,
            Some(b) => {
                if let Some(punct) = TokenKind::punct(b) {
                    self.cursor.advance();
                    punct
                } else {
                    match b {
                        b'"' => self.lex_string()?,
                        b'n' => self.lex_keyword(b"null", TokenKind::Null)?,
                        b't' => self.lex_keyword(b"true", TokenKind::True)?,
                        b'f' => self.lex_keyword(b"false", TokenKind::False)?,
                        b'-' | b'0'..=b'9' => self.lex_number()?,
                        _ => return Err(Error::at(ErrorKind::InvalidToken, start)),
                    }
                }
            }
        };

        let end = self.cursor.position();
        Ok(Token::new(kind, Span::new(start, end)))
    }

    /// Lex a string literal
    fn lex_string(&mut self) -> Result<TokenKind> {
        let start = self.cursor.position();
        // Consume opening quote
        self.cursor.advance();

        // Raw bytes are collected so multi-byte UTF-8 sequences survive intact
        let mut buf: Vec<u8> = Vec::new();

        loop {
            match self.cursor.current() {
                None => return Err(self.error_here(ErrorKind::UnterminatedString)),
                Some(b'"') => {
                    self.cursor.advance();
                    break;
                }
                Some(b'\\') => {
                    self.cursor.advance();
                    let escaped = match self.cursor.current() {
                        Some(b'"') => '"',
                        Some(b'\\') => '\\',
                        Some(b'/') => '/',
                        Some(b'b') => '\x08',
                        Some(b'f') => '\x0C',
                        Some(b'n') => '\n',
                        Some(b'r') => '\r',
                        Some(b't') => '\t',
                        Some(b'u') => {
                            self.cursor.advance();
                            let ch = self.lex_unicode_escape()?;
                            push_char(&mut buf, ch);
                            continue;
                        }
                        _ => return Err(self.error_here(ErrorKind::InvalidEscapeSequence)),
                    };
                    push_char(&mut buf, escaped);
                    self.cursor.advance();
                }
                Some(b) => {
                    // JSON strings cannot contain control characters
                    if b < 0x20 {
                        return Err(self.error_here(ErrorKind::InvalidToken));
                    }
                    buf.push(b);
                    self.cursor.advance();
                }
            }
        }

        String::from_utf8(buf)
            .map(TokenKind::String)
            .map_err(|_| Error::at(ErrorKind::InvalidUtf8, start))
    }

    /// Lex a unicode escape (the part after `\u`), joining surrogate pairs
    fn lex_unicode_escape(&mut self) -> Result<char> {
        let start_pos = self.cursor.position();
        let high = self.lex_hex4()?;

        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.cursor.eat(b"\\u") {
                return Err(Error::at(ErrorKind::InvalidUnicodeEscape, start_pos));
            }
            let low = self.lex_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(Error::at(ErrorKind::InvalidUnicodeEscape, start_pos));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code).ok_or_else(|| Error::at(ErrorKind::InvalidUnicodeEscape, start_pos))
    }

    fn lex_hex4(&mut self) -> Result<u32> {
        let mut code: u32 = 0;
        for _ in 0..4 {
            let digit = self
                .cursor
                .current()
                .and_then(|b| char::from(b).to_digit(16))
                .ok_or_else(|| self.error_here(ErrorKind::InvalidUnicodeEscape))?;
            code = code * 16 + digit;
            self.cursor.advance();
        }
        Ok(code)
    }

    /// Lex one of the `null` / `true` / `false` literals
    fn lex_keyword(&mut self, keyword: &[u8], kind: TokenKind) -> Result<TokenKind> {
        if self.cursor.eat(keyword) {
            Ok(kind)
        } else {
            Err(self.error_here(ErrorKind::InvalidToken))
        }
    }

    /// Lex a number literal, keeping its source text
    fn lex_number(&mut self) -> Result<TokenKind> {
        let start = self.cursor.pos();

        // Optional minus sign
        self.cursor.consume(b'-');

        // Integer part
        match self.cursor.current() {
            Some(b'0') => {
                self.cursor.advance();
            }
            Some(b'1'..=b'9') => {
                self.skip_digits();
            }
            _ => return Err(self.error_here(ErrorKind::InvalidNumber)),
        }

        // Optional fraction part
        if self.cursor.consume(b'.') {
            if !matches!(self.cursor.current(), Some(b'0'..=b'9')) {
                return Err(self.error_here(ErrorKind::InvalidNumber));
            }
            self.skip_digits();
        }

        // Optional exponent part
        if matches!(self.cursor.current(), Some(b'e' | b'E')) {
            self.cursor.advance();
            if matches!(self.cursor.current(), Some(b'+' | b'-')) {
                self.cursor.advance();
            }
            if !matches!(self.cursor.current(), Some(b'0'..=b'9')) {
                return Err(self.error_here(ErrorKind::InvalidNumber));
            }
            self.skip_digits();
        }

        let literal = std::str::from_utf8(self.cursor.slice_from(start))
            .map_err(|_| self.error_here(ErrorKind::InvalidNumber))?;

        Ok(TokenKind::Number(literal.to_string()))
    }

    fn skip_digits(&mut self) {
        self.cursor.eat_while(|b| b.is_ascii_digit());
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }
}

fn push_char(buf: &mut Vec<u8>, ch: char) {
    let mut encoded = [0u8; 4];
    buf.extend_from_slice(ch.encode_utf8(&mut encoded).as_bytes());
}

impl Iterator for JsonLexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.is_eof() => None,
            other => Some(other),
        }
    }
}
