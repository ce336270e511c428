//! JSON serialization

use crate::value::Value;

/// Serializes values as compact or indented JSON text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Writer {
    indent: Option<&'static str>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::compact()
    }
}

impl Writer {
    /// Single-line output with no insignificant whitespace
    pub const fn compact() -> Self {
        Self { indent: None }
    }

    /// Multi-line output indented by two spaces per level
    pub const fn pretty() -> Self {
        Self { indent: Some("  ") }
    }

    /// Pick compact or pretty output from a flag
    pub const fn new(pretty: bool) -> Self {
        if pretty {
            Self::pretty()
        } else {
            Self::compact()
        }
    }

    pub fn write(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(value, 0, &mut out);
        out
    }

    fn write_value(&self, value: &Value, level: usize, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(n.as_str()),
            Value::String(s) => write_string(s, out),
            Value::Array(arr) => {
                if arr.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline(level + 1, out);
                    self.write_value(item, level + 1, out);
                }
                self.newline(level, out);
                out.push(']');
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (key, item)) in obj.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline(level + 1, out);
                    write_string(key, out);
                    out.push(':');
                    if self.indent.is_some() {
                        out.push(' ');
                    }
                    self.write_value(item, level + 1, out);
                }
                self.newline(level, out);
                out.push('}');
            }
        }
    }

    fn newline(&self, level: usize, out: &mut String) {
        if let Some(indent) = self.indent {
            out.push('\n');
            for _ in 0..level {
                out.push_str(indent);
            }
        }
    }
}

/// Serialize a value as compact JSON
pub fn to_string(value: &Value) -> String {
    Writer::compact().write(value)
}

/// Serialize a value as indented JSON
pub fn to_string_pretty(value: &Value) -> String {
    Writer::pretty().write(value)
}

fn write_string(input: &str, out: &mut String) {
    out.push('"');
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
}
