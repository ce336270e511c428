//! JSON tokens

use crate::error::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    Null,
    True,
    False,
    /// Unescaped string contents
    String(String),
    /// Number literal exactly as written in the source
    Number(String),
    Eof,
}

impl TokenKind {
    /// Single-byte structural token for `b`, if any
    pub const fn punct(b: u8) -> Option<Self> {
        match b {
            b'{' => Some(Self::LeftBrace),
            b'}' => Some(Self::RightBrace),
            b'[' => Some(Self::LeftBracket),
            b']' => Some(Self::RightBracket),
            b':' => Some(Self::Colon),
            b',' => Some(Self::Comma),
            _ => None,
        }
    }

    /// Short description used in "expected X, found Y" messages
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Null => "null",
            Self::True => "true",
            Self::False => "false",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Eof => "end of input",
        }
    }
}

/// Token with its source span
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
