//! Code 128 commands (`barline code128 ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use barline::code128::table;
use barline::format::to_padded_radix;
use barline::{CodeSet, Code128Sequence};
use clap::{Args, Subcommand};

use crate::cli::Session;
use crate::cli::common::CodeSetArg;
use crate::cli::utils::{parse_values, read_pattern, read_text_arg};

/// Code 128 subcommands.
#[derive(Subcommand, Debug)]
pub enum Code128Command {
    /// Encode text (code sets chosen automatically) or explicit symbol values.
    Encode(Code128EncodeArgs),
    /// Read a bar pattern back into text.
    Decode(Code128DecodeArgs),
    /// Print the symbol table.
    Table,
}

/// Arguments for `barline code128 encode`.
#[derive(Args, Debug)]
pub struct Code128EncodeArgs {
    /// Input text; `[FNC1]` inserts a function code (falls back to stdin if omitted).
    #[arg(long, conflicts_with = "values")]
    pub text: Option<String>,
    /// Read input text from file (`-` for stdin).
    #[arg(long = "from", conflicts_with = "values")]
    pub from: Option<PathBuf>,
    /// Explicit symbol values, e.g. `40,73,19,20,21`.
    #[arg(long)]
    pub values: Option<String>,
    /// Start code set used with --values.
    #[arg(long = "set", default_value_t = CodeSetArg::B, value_enum)]
    pub set: CodeSetArg,
    /// Print symbol values instead of bars.
    #[arg(long)]
    pub symbols: bool,
}

/// Arguments for `barline code128 decode`.
#[derive(Args, Debug)]
pub struct Code128DecodeArgs {
    /// Bar pattern as `1`/`0` modules (falls back to stdin if omitted).
    #[arg(long, conflicts_with = "values")]
    pub pattern: Option<String>,
    /// Read the pattern from file (`-` for stdin).
    #[arg(long = "from", conflicts_with = "values")]
    pub from: Option<PathBuf>,
    /// Decode a finished symbol value list instead of bars.
    #[arg(long)]
    pub values: Option<String>,
    /// Also print the symbol values.
    #[arg(long)]
    pub symbols: bool,
}

/// Execute a Code 128 command.
pub fn handle(command: Code128Command, session: &Session) -> Result<()> {
    match command {
        Code128Command::Encode(args) => encode(args, session),
        Code128Command::Decode(args) => decode(args, session),
        Code128Command::Table => print_table(session),
    }
}

fn join_values(values: &[u8]) -> String {
    values
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn encode(args: Code128EncodeArgs, session: &Session) -> Result<()> {
    let seq = match args.values {
        Some(raw) => {
            let values = parse_values(&raw)?;
            barline::encode_code128(args.set.into(), &values)
                .context("failed to build symbol sequence")?
        }
        None => {
            let text = read_text_arg(args.text, args.from)?;
            let text = text.strip_suffix('\n').unwrap_or(&text);
            barline::encode_code128_text(text)
                .with_context(|| format!("failed to encode {text:?}"))?
        }
    };
    if args.symbols {
        return session.out.text(&format!("{}\n", join_values(seq.symbols())));
    }
    session.out.pattern(&seq.to_modules())
}

fn decode(args: Code128DecodeArgs, session: &Session) -> Result<()> {
    let seq = match args.values {
        Some(raw) => {
            let values = parse_values(&raw)?;
            let set = values
                .first()
                .and_then(|&v| CodeSet::from_start(v))
                .unwrap_or(CodeSet::B);
            Code128Sequence::build(set, &values).context("invalid symbol sequence")?
        }
        None => {
            let pattern = read_pattern(args.pattern, args.from)?;
            Code128Sequence::from_modules(&pattern).context("failed to decode Code 128 pattern")?
        }
    };
    let mut out = String::new();
    if args.symbols {
        out.push_str(&join_values(seq.symbols()));
        out.push('\n');
    }
    out.push_str(&barline::decode_code128(&seq));
    out.push('\n');
    session.out.text(&out)
}

/// Caret notation for control characters, `^@` to `^_`.
fn char_label(byte: u8) -> String {
    match byte {
        0..=31 => format!("^{}", char::from(byte + 64)),
        32 => "SP".to_string(),
        127 => "DEL".to_string(),
        _ => char::from(byte).to_string(),
    }
}

fn symbol_label(set: CodeSet, value: u8) -> String {
    match (set, value) {
        (_, table::START_A) => "START A".into(),
        (_, table::START_B) => "START B".into(),
        (_, table::START_C) => "START C".into(),
        (_, table::STOP) => "STOP".into(),
        (_, 102) => "FNC1".into(),
        (CodeSet::C, 0..=99) => format!("{value:02}"),
        (CodeSet::C, 100) => "CODE B".into(),
        (CodeSet::C, _) => "CODE A".into(),
        (_, 96) => "FNC3".into(),
        (_, 97) => "FNC2".into(),
        (_, 98) => "SHIFT".into(),
        (_, 99) => "CODE C".into(),
        (CodeSet::A, 100) => "CODE B".into(),
        (CodeSet::B, 101) => "CODE A".into(),
        (_, 100) | (_, 101) => "FNC4".into(),
        _ => set.value_char(value).map(char_label).unwrap_or_default(),
    }
}

fn print_table(session: &Session) -> Result<()> {
    let mut out = format!(
        "{:>5}  {:<8} {:<8} {:<8} {}\n",
        "value", "A", "B", "C", "pattern"
    );
    for value in 0..table::SYMBOL_COUNT as u8 {
        let bits = table::pattern(value).unwrap_or_default();
        out.push_str(&format!(
            "{value:>5}  {:<8} {:<8} {:<8} {}\n",
            symbol_label(CodeSet::A, value),
            symbol_label(CodeSet::B, value),
            symbol_label(CodeSet::C, value),
            to_padded_radix(bits as u64, 2, table::SYMBOL_WIDTH).unwrap_or_default(),
        ));
    }
    session.out.text(&out)
}
