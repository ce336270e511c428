//! Subcommand implementations. Each writes its report to the given writer.

pub mod convert;
pub mod http;
pub mod uuid;
