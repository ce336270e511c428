//! Error types for devmate

use std::fmt;
use thiserror::Error;

use crate::convert::Format;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Coarse classification of failures reported to callers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The source document is malformed
    Parse,
    /// The requested format pair is not supported
    UnsupportedDirection,
    /// A value cannot be written in the target format
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "parse error"),
            Self::UnsupportedDirection => write!(f, "unsupported direction"),
            Self::Serialization => write!(f, "serialization error"),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    // JSON lexing and parsing
    InvalidEscapeSequence,
    InvalidUnicodeEscape,
    UnterminatedString,
    InvalidNumber,
    InvalidToken,
    Expected { expected: String, found: String },
    TrailingComma,
    TrailingContent,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },

    // XML parsing
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    InvalidName,
    InvalidEntity,
    InvalidCharacter,
    InvalidUtf8,
    DuplicateAttribute { name: String },
    MultipleRoots,
    MisplacedDeclaration,
    CdataEndInText,

    // Serialization
    InvalidElementName { name: String },
    UnrepresentableCharacter { code: u32 },

    // Direction selection
    UnknownFormat { name: String },
    UnsupportedDirection { from: Format, to: Format },
}

impl ErrorKind {
    /// Map this kind onto the caller-facing taxonomy
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidElementName { .. } | Self::UnrepresentableCharacter { .. } => {
                ErrorCategory::Serialization
            }
            Self::UnknownFormat { .. } | Self::UnsupportedDirection { .. } => {
                ErrorCategory::UnsupportedDirection
            }
            _ => ErrorCategory::Parse,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEscapeSequence => write!(f, "invalid escape sequence"),
            Self::InvalidUnicodeEscape => write!(f, "invalid unicode escape"),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::InvalidNumber => write!(f, "invalid number"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::TrailingComma => write!(f, "trailing comma"),
            Self::TrailingContent => write!(f, "unexpected content after document end"),
            Self::MaxDepthExceeded { max } => {
                write!(f, "max depth exceeded: {max}")
            }
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidEntity => write!(f, "invalid entity reference"),
            Self::InvalidCharacter => write!(f, "invalid character"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::MultipleRoots => write!(f, "multiple root elements"),
            Self::MisplacedDeclaration => {
                write!(f, "xml declaration is only allowed at the start of the document")
            }
            Self::CdataEndInText => write!(f, "']]>' is not allowed in character data"),
            Self::InvalidElementName { name } => {
                write!(f, "'{name}' is not a valid xml element name")
            }
            Self::UnrepresentableCharacter { code } => {
                write!(f, "character U+{code:04X} cannot be written as xml text")
            }
            Self::UnknownFormat { name } => write!(f, "unknown format: {name}"),
            Self::UnsupportedDirection { from, to } => {
                write!(f, "conversion from {from} to {to} is not supported")
            }
        }
    }
}

/// Main error type for devmate
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Error without a meaningful source position
    pub fn without_span(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }

    pub fn is_parse(&self) -> bool {
        self.category() == ErrorCategory::Parse
    }

    pub fn is_serialization(&self) -> bool {
        self.category() == ErrorCategory::Serialization
    }

    pub fn is_unsupported_direction(&self) -> bool {
        self.category() == ErrorCategory::UnsupportedDirection
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.start.line == 0 {
            write!(f, "{}: {}", self.category(), self.message)
        } else {
            write!(
                f,
                "{} at {}: {}",
                self.category(),
                self.span.start,
                self.message
            )
        }
    }
}

/// Result type alias for devmate
pub type Result<T> = std::result::Result<T, Error>;
