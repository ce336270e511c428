use std::io::Write;

use ::uuid::Uuid;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct UuidArgs {
    /// Number of UUIDs to generate
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub count: u32,
    /// Print upper-case hex digits
    #[arg(long)]
    pub upper: bool,
}

/// Print `count` random v4 UUIDs, one per line
pub fn run(args: &UuidArgs, out: &mut impl Write) -> Result<()> {
    let mut buf = Uuid::encode_buffer();
    for _ in 0..args.count {
        let hyphenated = Uuid::new_v4().hyphenated();
        let text = if args.upper {
            hyphenated.encode_upper(&mut buf)
        } else {
            hyphenated.encode_lower(&mut buf)
        };
        writeln!(out, "{text}").context("failed to write stdout")?;
    }
    Ok(())
}
