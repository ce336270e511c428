//! XML serialization

use crate::error::{Error, ErrorKind, Result};
use crate::xml::model::{Content, Document, Element};
use crate::xml::parser::is_xml_char;

/// Writes an element tree as compact XML text without a declaration.
///
/// Element names are checked before anything is emitted for them, so a
/// failure never yields partial output to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Writer;

impl Writer {
    pub const fn new() -> Self {
        Self
    }

    pub fn write(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();
        write_element(&doc.root, &mut output)?;
        Ok(output)
    }
}

/// Serialize a document as compact XML
pub fn to_string(doc: &Document) -> Result<String> {
    Writer::new().write(doc)
}

fn write_element(element: &Element, output: &mut String) -> Result<()> {
    check_name(&element.name)?;

    output.push('<');
    output.push_str(&element.name);

    if element.empty {
        output.push_str(" />");
        return Ok(());
    }

    output.push('>');
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(child, output)?,
            Content::Text(text) => escape_text(text, output)?,
        }
    }
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
    Ok(())
}

fn escape_text(text: &str, output: &mut String) -> Result<()> {
    for ch in text.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            // Kept as a reference so it survives newline normalization
            '\r' => output.push_str("&#xD;"),
            c if is_xml_char(c) => output.push(c),
            c => {
                return Err(Error::without_span(ErrorKind::UnrepresentableCharacter {
                    code: u32::from(c),
                }));
            }
        }
    }
    Ok(())
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::without_span(ErrorKind::InvalidElementName {
            name: name.to_string(),
        }))
    }
}

/// Whether `name` can be used as an XML element name
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == ':' || (!ch.is_ascii() && ch.is_alphabetic())
}

fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch)
        || ch.is_ascii_digit()
        || matches!(ch, '-' | '.' | '\u{B7}')
        || (!ch.is_ascii() && ch.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(element: Element) -> Result<String> {
        let mut out = String::new();
        write_element(&element, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_write_nested() -> Result<()> {
        let mut a = Element::new("a");
        a.push_text("1");
        let mut b = Element::new("b");
        b.mark_empty();
        let mut root = Element::new("root");
        root.push_element(a);
        root.push_element(b);

        assert_eq!(render(root)?, "<root><a>1</a><b /></root>");
        Ok(())
    }

    #[test]
    fn test_empty_without_mark_is_open_close() -> Result<()> {
        assert_eq!(render(Element::new("a"))?, "<a></a>");
        Ok(())
    }

    #[test]
    fn test_text_escaping() -> Result<()> {
        let mut a = Element::new("a");
        a.push_text("x < y && y > \"z\"\r\n");
        assert_eq!(render(a)?, "<a>x &lt; y &amp;&amp; y &gt; \"z\"&#xD;\n</a>");
        Ok(())
    }

    #[test]
    fn test_invalid_names_rejected() {
        for name in ["", "1a", "-a", ".a", "a b", "a<b", "a/b", "a\"b"] {
            assert!(!is_valid_name(name), "{name:?}");
            let err = render(Element::new(name)).err();
            assert!(
                err.as_ref().is_some_and(Error::is_serialization),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_valid_names_accepted() {
        for name in ["a", "_a", "a-b.c", "a1", "ns:item", "größe", "名前"] {
            assert!(is_valid_name(name), "{name:?}");
        }
    }

    #[test]
    fn test_control_characters_rejected() {
        let mut a = Element::new("a");
        a.push_text("bell\u{7}");
        let err = render(a).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnrepresentableCharacter { code: 7 })
        );
    }

    #[test]
    fn test_document_writer() -> Result<()> {
        let doc = Document::new(Element::new("root"));
        assert_eq!(to_string(&doc)?, "<root></root>");
        assert_eq!(Writer::new().write(&doc)?, "<root></root>");
        Ok(())
    }
}
