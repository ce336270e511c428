use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use devmate::{ConvertOptions, Direction, Format};
use tracing::{debug, warn};

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Source format (xml or json)
    #[arg(value_name = "FROM")]
    pub from: String,
    /// Target format (xml or json)
    #[arg(value_name = "TO")]
    pub to: String,
    /// Input file (defaults to stdin)
    #[arg(short, long, value_name = "INPUT")]
    pub input: Option<PathBuf>,
    /// Also write the result to this file
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
    /// Indent JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn run(args: &ConvertArgs, out: &mut impl Write) -> Result<()> {
    let Some(direction) = resolve_direction(&args.from, &args.to) else {
        warn!(from = %args.from, to = %args.to, "unsupported conversion, nothing to do");
        return Ok(());
    };

    let (from, to) = match direction {
        Direction::XmlToJson => (Format::Xml, Format::Json),
        Direction::JsonToXml => (Format::Json, Format::Xml),
    };

    let input = read_input(args.input.as_deref())?;
    debug!(?direction, bytes = input.len(), "read input");

    let options = ConvertOptions::default().with_pretty(args.pretty);
    let output = devmate::convert(&input, from, to, &options)
        .with_context(|| format!("failed to convert {from} to {to}"))?;

    writeln!(out, "{output}").context("failed to write stdout")?;
    if let Some(path) = &args.output {
        write_output(path, &output)?;
    }
    Ok(())
}

/// `None` for unknown names and same-format pairs
fn resolve_direction(from: &str, to: &str) -> Option<Direction> {
    let from = Format::from_name(from)?;
    let to = Format::from_name(to)?;
    Direction::from_formats(from, to).ok()
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        None => read_stdin(io::stdin().lock())?,
    };
    Ok(strip_bom(text))
}

fn read_stdin(mut reader: impl Read) -> Result<String> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    if buffer.trim().is_empty() {
        bail!("no input provided on stdin");
    }
    Ok(buffer)
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

fn write_output(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data)
        .with_context(|| format!("failed to write output file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(from: &str, to: &str) -> ConvertArgs {
        ConvertArgs {
            from: from.to_string(),
            to: to.to_string(),
            input: None,
            output: None,
            pretty: false,
        }
    }

    #[test]
    fn test_resolve_direction() {
        assert_eq!(resolve_direction("XML", "json"), Some(Direction::XmlToJson));
        assert_eq!(resolve_direction(" json", "Xml "), Some(Direction::JsonToXml));
        assert_eq!(resolve_direction("json", "json"), None);
        assert_eq!(resolve_direction("yaml", "json"), None);
    }

    #[test]
    fn test_unsupported_pair_is_noop() {
        let mut out = Vec::new();
        assert!(run(&args("csv", "json"), &mut out).is_ok());
        assert!(out.is_empty());
    }

    #[test]
    fn test_read_stdin_rejects_blank() {
        assert!(read_stdin(" \n".as_bytes()).is_err());
        assert_eq!(
            read_stdin("<a/>".as_bytes()).ok().as_deref(),
            Some("<a/>")
        );
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}<a/>".to_string()), "<a/>");
        assert_eq!(strip_bom("<a/>".to_string()), "<a/>");
    }

    #[test]
    fn test_file_to_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.xml");
        let output = dir.path().join("out.json");
        fs::write(&input, "\u{feff}<root><a>1</a><b>x</b></root>")?;

        let mut args = args("xml", "json");
        args.input = Some(input);
        args.output = Some(output.clone());

        let mut out = Vec::new();
        run(&args, &mut out)?;
        assert_eq!(String::from_utf8(out)?, "{\"a\":1,\"b\":\"x\"}\n");
        assert_eq!(fs::read_to_string(output)?, r#"{"a":1,"b":"x"}"#);
        Ok(())
    }

    #[test]
    fn test_failed_conversion_writes_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.xml");
        fs::write(&input, r#"{"a":"#)?;

        let mut args = args("json", "xml");
        args.input = Some(input);
        args.output = Some(output.clone());

        let mut out = Vec::new();
        assert!(run(&args, &mut out).is_err());
        assert!(out.is_empty());
        assert!(!output.exists());
        Ok(())
    }
}
