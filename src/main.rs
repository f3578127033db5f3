//! `block-hasher` command-line tool.
//!
//! Reads one or more JSON block documents (bare blocks or `init`/`block`
//! envelopes) from a file or stdin and prints each block's `0x` SHA-256
//! identifier. Any parse, serialization, or check failure exits non-zero.

use anyhow::{Context, Result, bail};
use block_hasher::{BlockDocument, HashReport, RunOptions};
use clap::Parser;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "block-hasher")]
#[command(about = "Compute canonical SHA-256 identifiers for JSON block documents")]
struct Args {
    /// File with one or more JSON block documents (`-` or omitted reads stdin)
    file: Option<PathBuf>,

    /// Check each block's `hash` field against the computed hash
    #[arg(long)]
    verify: bool,

    /// Print the canonical encoding before each hash
    #[arg(long)]
    canonical: bool,

    /// Require each hash to have at least `difficulty` leading zero hex digits
    #[arg(long)]
    check_work: bool,

    /// Require positive transaction totals and equal input/output sums
    #[arg(long)]
    check_transactions: bool,

    /// Print one JSON report per block instead of plain text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions::new(
            self.verify,
            self.canonical,
            self.check_work,
            self.check_transactions,
        )
    }
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout only carries hashes.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let opts = args.run_options();
    let input = open_input(args.file.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    let stream = serde_json::Deserializer::from_reader(input).into_iter::<Value>();
    for (index, item) in stream.enumerate() {
        let value = item.with_context(|| format!("document {index}: malformed JSON"))?;
        let doc = BlockDocument::from_value(value).with_context(|| format!("document {index}"))?;
        let report = doc
            .process(&opts)
            .with_context(|| format!("document {index}"))?;
        write_report(&mut out, &report, args.json)?;
        count += 1;
    }

    if count == 0 {
        bail!("no block documents in input");
    }
    info!(count, "hashed block documents");
    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).with_context(|| format!("opening {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn write_report(out: &mut impl Write, report: &HashReport, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
    } else {
        if let Some(canonical) = &report.canonical {
            writeln!(out, "{canonical}")?;
        }
        writeln!(out, "{}", report.hash)?;
    }
    Ok(())
}
