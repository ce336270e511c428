//! Byte cursor shared by the JSON lexer and the XML parser

use crate::error::Pos;

/// Forward-only view over input bytes that tracks line and column.
///
/// Columns count characters rather than bytes: continuation bytes of a
/// multi-byte UTF-8 sequence do not move the column.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    /// Byte under the cursor
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Step over one byte, returning it
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.current()?;
        self.offset += 1;
        match b {
            b'\n' => {
                self.line += 1;
                self.col = 1;
            }
            b if b & 0b1100_0000 == 0b1000_0000 => {}
            _ => self.col += 1,
        }
        Some(b)
    }

    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Step over `b` if it is next
    pub fn consume(&mut self, b: u8) -> bool {
        let hit = self.current() == Some(b);
        if hit {
            self.advance();
        }
        hit
    }

    /// Step over `prefix` if the input continues with it
    pub fn eat(&mut self, prefix: &[u8]) -> bool {
        let hit = self.starts_with(prefix);
        if hit {
            self.advance_by(prefix.len());
        }
        hit
    }

    /// Consume bytes while `pred` holds and return them
    pub fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.offset;
        while self.current().is_some_and(&mut pred) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Skip JSON/XML whitespace; true if anything was skipped
    pub fn skip_whitespace(&mut self) -> bool {
        !self
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            .is_empty()
    }

    /// Consume everything up to and including `terminator`, returning the
    /// bytes before it. `None` when the input ends first; the cursor is
    /// then left at the end.
    pub fn skip_past(&mut self, terminator: &[u8]) -> Option<&'a [u8]> {
        let start = self.offset;
        while !self.is_eof() {
            if self.starts_with(terminator) {
                let skipped = self.slice_from(start);
                self.advance_by(terminator.len());
                return Some(skipped);
            }
            self.advance();
        }
        None
    }

    pub const fn position(&self) -> Pos {
        Pos::new(self.offset, self.line, self.col)
    }

    pub const fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Byte offset into the input
    pub const fn pos(&self) -> usize {
        self.offset
    }

    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.offset).unwrap_or_default()
    }

    fn rest(&self) -> &'a [u8] {
        self.input.get(self.offset..).unwrap_or_default()
    }
}
