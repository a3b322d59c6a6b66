//! GS1-128 commands (`barline gs1 ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use barline::Code128Sequence;
use barline::gs1::{Gs1Builder, parse_elements, parse_validated};
use clap::{Args, Subcommand};

use crate::cli::Session;
use crate::cli::utils::{read_pattern, read_text_arg};

/// GS1 subcommands.
#[derive(Subcommand, Debug)]
pub enum Gs1Command {
    /// Build a GS1-128 symbol from `AI=DATA` fields.
    Build(Gs1BuildArgs),
    /// Split decoded GS1-128 text (or bars) into AI fields.
    Split(Gs1SplitArgs),
}

/// Arguments for `barline gs1 build`.
#[derive(Args, Debug)]
pub struct Gs1BuildArgs {
    /// Fields in order, e.g. `01=00012345678905 10=AB123`.
    #[arg(required = true)]
    pub fields: Vec<String>,
    /// Print the human readable `(AI)data` line to stderr.
    #[arg(long)]
    pub hri: bool,
    /// Print symbol values instead of bars.
    #[arg(long)]
    pub symbols: bool,
}

/// Arguments for `barline gs1 split`.
#[derive(Args, Debug)]
pub struct Gs1SplitArgs {
    /// Decoded text with `[FNC1]` markers (falls back to stdin if omitted).
    #[arg(long)]
    pub text: Option<String>,
    /// Read input from file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Input is a Code 128 bar pattern rather than text.
    #[arg(long)]
    pub bars: bool,
    /// Also validate each field's content against the AI table.
    #[arg(long)]
    pub strict: bool,
}

/// Execute a GS1 command.
pub fn handle(command: Gs1Command, session: &Session) -> Result<()> {
    match command {
        Gs1Command::Build(args) => build(args, session),
        Gs1Command::Split(args) => split(args, session),
    }
}

fn build(args: Gs1BuildArgs, session: &Session) -> Result<()> {
    let registry = session.registry()?;
    let mut builder = Gs1Builder::new(&registry);
    for field in &args.fields {
        let (ai, data) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("field '{field}' must look like AI=DATA"))?;
        builder = builder
            .field(ai.trim(), data)
            .with_context(|| format!("invalid field '{field}'"))?;
    }
    let seq = builder.build().context("failed to build GS1-128 symbol")?;
    if args.hri {
        eprintln!("{}", builder.hri());
    }
    if args.symbols {
        let values: Vec<String> = seq.symbols().iter().map(u8::to_string).collect();
        return session.out.text(&format!("{}\n", values.join(",")));
    }
    session.out.pattern(&seq.to_modules())
}

fn split(args: Gs1SplitArgs, session: &Session) -> Result<()> {
    let registry = session.registry()?;
    let text = if args.bars {
        let pattern = read_pattern(args.text, args.from)?;
        Code128Sequence::from_modules(&pattern)
            .context("failed to decode Code 128 pattern")?
            .text()
    } else {
        let raw = read_text_arg(args.text, args.from)?;
        raw.trim_end_matches(['\r', '\n']).to_string()
    };
    let fields = if args.strict {
        parse_validated(&text, &registry)
    } else {
        parse_elements(&text, &registry)
    }
    .with_context(|| format!("failed to split {text:?}"))?;

    let mut out = String::new();
    for field in &fields {
        let title = registry
            .get(&field.ai)
            .map(|spec| spec.title.as_str())
            .unwrap_or("");
        out.push_str(&format!("({}) {}\t{}\n", field.ai, field.data, title));
    }
    session.out.text(&out)
}
