//! JSON parsing and serialization

pub mod parser;
pub mod writer;

pub use parser::{Config, Parser};
pub use writer::{to_string, to_string_pretty, Writer};
