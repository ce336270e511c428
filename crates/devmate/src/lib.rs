//! DevMate - XML/JSON conversion core of the devmate toolbox
//!
//! # Quick Start
//!
//! ```
//! use devmate::{convert, ConvertOptions, Format};
//! # fn main() -> Result<(), devmate::Error> {
//! let json = convert(
//!     "<root><name>devmate</name><port>8080</port></root>",
//!     Format::Xml,
//!     Format::Json,
//!     &ConvertOptions::default(),
//! )?;
//! assert_eq!(json, r#"{"name":"devmate","port":8080}"#);
//!
//! let xml = devmate::json_to_xml(r#"{"tags": ["a", "b"], "owner": null}"#)?;
//! assert_eq!(xml, "<root><tags><item>a</item><item>b</item></tags><owner /></root>");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorCategory, ErrorKind, Pos, Result, Span};

pub mod lexer;
pub use lexer::{Token, TokenKind};

pub mod value;
pub use value::{Array, Number, Object, Value};

pub mod convert;
pub use convert::{
    convert, detect_format_from_path, json_to_xml, xml_to_json, ConvertOptions, Direction, Format,
};

pub mod json;
pub mod xml;
pub use json::{Config as JsonConfig, Parser as JsonParser, Writer as JsonWriter};
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser, Writer as XmlWriter,
};

/// Parse JSON from string
pub fn from_json_str(s: &str) -> Result<Value> {
    JsonParser::new(s.as_bytes()).parse_value()
}

/// Parse JSON with custom limits
pub fn from_json_str_with_config(s: &str, config: JsonConfig) -> Result<Value> {
    JsonParser::with_config(s.as_bytes(), config).parse_value()
}

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    XmlParser::new(s.as_bytes()).parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    XmlParser::new(bytes).parse()
}
