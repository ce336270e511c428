//! Format conversion between XML and JSON

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::json::{Config as JsonConfig, Parser as JsonParser, Writer as JsonWriter};
use crate::value::{Number, Value};
use crate::xml::{
    Config as XmlConfig, Document as XmlDocument, Element as XmlElement, Parser as XmlParser,
    Writer as XmlWriter,
};

/// Name of the wrapper element produced for JSON input
pub const SYNTHETIC_ROOT: &str = "root";

/// Name of the elements produced for array items
pub const ARRAY_ITEM: &str = "item";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Look up a format by name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| {
            Error::without_span(ErrorKind::UnknownFormat {
                name: s.trim().to_string(),
            })
        })
    }
}

/// Detect a format from a file extension
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Option<Format> {
    let ext = path.as_ref().extension()?.to_str()?;
    Format::from_name(ext)
}

/// A supported conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    XmlToJson,
    JsonToXml,
}

impl Direction {
    pub fn from_formats(from: Format, to: Format) -> Result<Self> {
        match (from, to) {
            (Format::Xml, Format::Json) => Ok(Self::XmlToJson),
            (Format::Json, Format::Xml) => Ok(Self::JsonToXml),
            _ => Err(Error::without_span(ErrorKind::UnsupportedDirection {
                from,
                to,
            })),
        }
    }
}

/// Conversion options per format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Indent JSON output
    pub pretty: bool,
    pub json: JsonConfig,
    pub xml: XmlConfig,
}

impl ConvertOptions {
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Convert `input` from one format to the other.
///
/// Only `xml -> json` and `json -> xml` are supported; any other pair fails
/// with an unsupported-direction error before the input is looked at.
#[instrument(skip_all, fields(%from, %to))]
pub fn convert(input: &str, from: Format, to: Format, options: &ConvertOptions) -> Result<String> {
    let direction = Direction::from_formats(from, to)?;
    debug!(?direction, input_len = input.len(), "converting");

    match direction {
        Direction::XmlToJson => {
            let doc = XmlParser::with_config(input.as_bytes(), options.xml).parse()?;
            let value = document_to_value(&doc);
            Ok(JsonWriter::new(options.pretty).write(&value))
        }
        Direction::JsonToXml => {
            let value = JsonParser::with_config(input.as_bytes(), options.json).parse_value()?;
            let doc = value_to_document(&value);
            XmlWriter::new().write(&doc)
        }
    }
}

/// Convert an XML document to JSON text with default limits
pub fn xml_to_json(input: &str, pretty: bool) -> Result<String> {
    convert(
        input,
        Format::Xml,
        Format::Json,
        &ConvertOptions::default().with_pretty(pretty),
    )
}

/// Convert JSON text to an XML document with default limits
pub fn json_to_xml(input: &str) -> Result<String> {
    convert(input, Format::Json, Format::Xml, &ConvertOptions::default())
}

/// Flatten the root's element children into a single object.
///
/// Each child contributes its tag name and the typed value of its inner
/// text. A repeated tag name replaces the earlier value in place.
pub fn document_to_value(doc: &XmlDocument) -> Value {
    let mut members = IndexMap::new();
    for child in doc.root.child_elements() {
        members.insert(child.name.clone(), infer_scalar(child.inner_text()));
    }
    debug!(keys = members.len(), "flattened xml root");
    Value::Object(members.into_iter().collect())
}

/// Classify element text: integer, then float, then boolean, else string
pub fn infer_scalar(text: String) -> Value {
    let trimmed = text.trim();

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(Number::from(int));
    }
    if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(text)
}

/// Wrap a JSON value in the synthetic `root` element
pub fn value_to_document(value: &Value) -> XmlDocument {
    let mut root = XmlElement::new(SYNTHETIC_ROOT);
    fill_element(&mut root, value);
    XmlDocument::new(root)
}

fn fill_element(element: &mut XmlElement, value: &Value) {
    match value {
        Value::Object(obj) => {
            for (key, item) in obj {
                let mut child = XmlElement::new(key.as_str());
                fill_element(&mut child, item);
                element.push_element(child);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                let mut child = XmlElement::new(ARRAY_ITEM);
                fill_element(&mut child, item);
                element.push_element(child);
            }
        }
        Value::String(text) => element.push_text(text.as_str()),
        Value::Number(number) => element.push_text(number.as_str()),
        Value::Bool(b) => element.push_text(if *b { "true" } else { "false" }),
        Value::Null => element.mark_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(Format::from_name("xml"), Some(Format::Xml));
        assert_eq!(Format::from_name(" JSON "), Some(Format::Json));
        assert_eq!(Format::from_name("Xml"), Some(Format::Xml));
        assert_eq!(Format::from_name("yaml"), None);
        assert_eq!(Format::from_name(""), None);
    }

    #[test]
    fn test_format_from_str_unknown() {
        let err = "toml".parse::<Format>().err();
        assert!(err.as_ref().is_some_and(Error::is_unsupported_direction));
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnknownFormat {
                name: "toml".to_string()
            })
        );
    }

    #[test]
    fn test_direction_from_formats() {
        assert_eq!(
            Direction::from_formats(Format::Xml, Format::Json).ok(),
            Some(Direction::XmlToJson)
        );
        assert_eq!(
            Direction::from_formats(Format::Json, Format::Xml).ok(),
            Some(Direction::JsonToXml)
        );
        for format in [Format::Json, Format::Xml] {
            let err = Direction::from_formats(format, format).err();
            assert!(err.is_some_and(|e| e.is_unsupported_direction()));
        }
    }

    #[test]
    fn test_infer_scalar_precedence() {
        assert_eq!(infer_scalar("42".to_string()), Value::from(42));
        assert_eq!(infer_scalar("01".to_string()), Value::from(1));
        assert_eq!(infer_scalar(" -7 ".to_string()), Value::from(-7));
        assert_eq!(infer_scalar("1".to_string()), Value::from(1));
        assert_eq!(infer_scalar("2.75".to_string()).as_f64(), Some(2.75));
        assert_eq!(infer_scalar("TRUE".to_string()), Value::Bool(true));
        assert_eq!(infer_scalar("False".to_string()), Value::Bool(false));
        assert_eq!(infer_scalar("yes".to_string()), Value::from("yes"));
        assert_eq!(infer_scalar(String::new()), Value::from(""));
    }

    #[test]
    fn test_infer_scalar_non_finite_stays_string() {
        for text in ["inf", "NaN", "1e999", "-infinity"] {
            assert_eq!(infer_scalar(text.to_string()), Value::from(text), "{text}");
        }
    }

    #[test]
    fn test_infer_scalar_keeps_untrimmed_string() {
        assert_eq!(infer_scalar(" hello ".to_string()), Value::from(" hello "));
    }

    #[test]
    fn test_value_to_document_shapes() -> Result<()> {
        let value = JsonParser::new(br#"{"a":[1,"x"],"b":null,"c":{"d":true},"e":""}"#)
            .parse_value()?;
        let xml = XmlWriter::new().write(&value_to_document(&value))?;
        assert_eq!(
            xml,
            "<root><a><item>1</item><item>x</item></a><b /><c><d>true</d></c><e></e></root>"
        );
        Ok(())
    }

    #[test]
    fn test_repeated_json_keys_each_get_an_element() -> Result<()> {
        assert_eq!(
            json_to_xml(r#"{"a":1,"b":{"c":2,"c":null},"a":3}"#)?,
            "<root><a>1</a><b><c>2</c><c /></b><a>3</a></root>"
        );
        Ok(())
    }

    #[test]
    fn test_scalar_root_goes_inside_wrapper() -> Result<()> {
        assert_eq!(json_to_xml("5")?, "<root>5</root>");
        assert_eq!(json_to_xml("null")?, "<root />");
        assert_eq!(json_to_xml("[]")?, "<root></root>");
        Ok(())
    }

    #[test]
    fn test_convert_rejects_same_format() {
        let err = convert("{}", Format::Json, Format::Json, &ConvertOptions::default()).err();
        assert!(err.is_some_and(|e| e.is_unsupported_direction()));
    }

    #[test]
    fn test_convert_honors_limits() {
        let options = ConvertOptions {
            xml: XmlConfig::new(2),
            ..ConvertOptions::default()
        };
        let err = convert("<a><b><c/></b></a>", Format::Xml, Format::Json, &options).err();
        assert!(err.is_some_and(|e| matches!(e.kind(), ErrorKind::MaxDepthExceeded { max: 2 })));
    }
}
