//! XML parser implementation

use crate::error::{Error, ErrorKind, Pos, Result};
use crate::lexer::Cursor;
use crate::xml::model::{Content, Document, Element};

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl Config {
    pub const fn unlimited() -> Self {
        Self { max_depth: 0 }
    }

    pub const fn new(max_depth: u16) -> Self {
        Self { max_depth }
    }
}

/// XML parser.
///
/// Builds an element tree from a single document. The XML declaration,
/// processing instructions, comments and a DOCTYPE are skipped, CDATA
/// sections become text, whitespace-only text is dropped and attributes are
/// checked for well-formedness but not kept.
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.skip_misc(true)?;
        if self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::UnexpectedEof));
        }

        let root = self.parse_element(1)?;
        self.skip_misc(false)?;

        match self.cursor.current() {
            None => Ok(Document { root }),
            Some(b'<') => Err(self.error_here(ErrorKind::MultipleRoots)),
            Some(_) => Err(self.error_here(ErrorKind::TrailingContent)),
        }
    }

    /// Skip whitespace, comments and processing instructions outside the
    /// root element (plus a DOCTYPE before it)
    fn skip_misc(&mut self, allow_doctype: bool) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if allow_doctype && self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self, depth: u16) -> Result<Element> {
        if self.config.max_depth > 0 && depth > self.config.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }

        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        self.skip_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            let mut element = Element::new(name);
            element.mark_empty();
            return Ok(element);
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            let close_pos = self.cursor.position();
            if self.cursor.eat(b"</") {
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            expected: name,
                            found: close_name,
                        },
                        close_pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"<![CDATA[") {
                let text = self.parse_cdata()?;
                if !text.is_empty() {
                    children.push(Content::Text(text));
                }
            } else if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!") {
                return Err(self.error_here(ErrorKind::InvalidToken));
            } else if self.cursor.current() == Some(b'<') {
                let child = self.parse_element(depth.saturating_add(1))?;
                children.push(Content::Element(child));
            } else if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof));
            } else if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        Ok(Element {
            name,
            children,
            empty: false,
        })
    }

    fn skip_attributes(&mut self) -> Result<()> {
        let mut seen: Vec<String> = Vec::new();

        loop {
            let had_whitespace = self.cursor.skip_whitespace();

            match self.cursor.current() {
                Some(b'/' | b'>') => return Ok(()),
                Some(_) if had_whitespace => {}
                Some(_) => return Err(self.error_here(ErrorKind::InvalidToken)),
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let name_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            self.parse_attribute_value()?;

            if seen.contains(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, name_pos));
            }
            seen.push(name);
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            Some(_) => return Err(self.error_here(ErrorKind::InvalidToken)),
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let raw = self.cursor.eat_while(|b| b != quote && b != b'<');
        match self.cursor.advance() {
            Some(b) if b == quote => decode_text(raw, start_pos),
            Some(_) => Err(Error::at(ErrorKind::InvalidCharacter, start_pos)),
            None => Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start_pos = self.cursor.position();
        let raw = self.cursor.eat_while(|b| b != b'<');
        if raw.windows(3).any(|w| w == b"]]>") {
            return Err(Error::at(ErrorKind::CdataEndInText, start_pos));
        }
        let text = decode_text(raw, start_pos)?;
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let start_pos = self.cursor.position();
        let raw = self
            .cursor
            .skip_past(b"]]>")
            .ok_or_else(|| self.error_here(ErrorKind::UnexpectedEof))?;
        let text = to_utf8(raw, start_pos)?;
        check_chars(&text, start_pos)?;
        Ok(normalize_newlines(&text))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => {
                self.cursor.advance();
            }
            Some(_) => return Err(Error::at(ErrorKind::InvalidName, start_pos)),
            None => return Err(Error::at(ErrorKind::UnexpectedEof, start_pos)),
        }
        self.cursor.eat_while(is_name_char);

        to_utf8(self.cursor.slice_from(start), start_pos)
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // An internal subset may contain '>' inside brackets
        let mut bracket_depth = 0usize;
        while let Some(b) = self.cursor.advance() {
            match b {
                b'[' => bracket_depth += 1,
                b']' => bracket_depth = bracket_depth.saturating_sub(1),
                b'>' if bracket_depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<!--".len());
        self.skip_past(b"-->")
    }

    /// Skip `<?target ...?>`. The `xml` target is reserved for the
    /// declaration, which may only open the document.
    fn skip_processing_instruction(&mut self) -> Result<()> {
        let start_pos = self.cursor.position();
        self.cursor.advance_by(b"<?".len());
        let target = self.parse_name()?;
        if target.eq_ignore_ascii_case("xml") && !(start_pos.offset == 0 && target == "xml") {
            return Err(Error::at(ErrorKind::MisplacedDeclaration, start_pos));
        }
        self.skip_past(b"?>")
    }

    fn skip_past(&mut self, terminator: &[u8]) -> Result<()> {
        match self.cursor.skip_past(terminator) {
            Some(_) => Ok(()),
            None => Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.cursor.current() {
            Some(b) if b == expected => {
                self.cursor.advance();
                Ok(())
            }
            Some(_) => Err(self.error_here(ErrorKind::InvalidToken)),
            None => Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }
}

fn to_utf8(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

// Non-ASCII bytes are accepted in names; UTF-8 validity is checked once the
// name is complete.
fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Characters allowed in XML 1.0 character data
pub(crate) fn is_xml_char(ch: char) -> bool {
    match ch {
        '\t' | '\n' | '\r' => true,
        '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => false,
        _ => true,
    }
}

fn check_chars(text: &str, pos: Pos) -> Result<()> {
    if text.chars().all(is_xml_char) {
        Ok(())
    } else {
        Err(Error::at(ErrorKind::InvalidCharacter, pos))
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Validate and decode raw character data: newlines are normalized, then
/// entity and character references are resolved
fn decode_text(raw: &[u8], pos: Pos) -> Result<String> {
    let text = to_utf8(raw, pos)?;
    check_chars(&text, pos)?;
    decode_entities(&normalize_newlines(&text), pos)
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);

        let after = after.get(1..).unwrap_or_default();
        let Some(semi) = after.find(';') else {
            return Err(Error::at(ErrorKind::InvalidEntity, pos));
        };
        let (entity, tail) = after.split_at(semi);

        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(Error::at(ErrorKind::InvalidEntity, pos)),
        }

        rest = tail.get(1..).unwrap_or_default();
    }

    result.push_str(rest);
    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let (digits, radix) = match entity.strip_prefix("#x") {
        Some(hex) => (hex, 16),
        None => (entity.strip_prefix('#')?, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let code = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(code).filter(|ch| is_xml_char(*ch))
}
