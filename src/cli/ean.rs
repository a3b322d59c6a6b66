//! EAN/UPC commands (`barline ean ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use barline::ean::{self, EanKind};
use clap::{Args, Subcommand};

use crate::cli::Session;
use crate::cli::utils::read_pattern;

/// EAN subcommands.
#[derive(Subcommand, Debug)]
pub enum EanCommand {
    /// Encode EAN-13, EAN-8, UPC-A or a 2/5 digit add-on into bars.
    Encode(EanEncodeArgs),
    /// Read digits back from a bar pattern.
    Decode(EanDecodeArgs),
    /// Compute or verify a check digit.
    Checksum(EanChecksumArgs),
}

/// Arguments for `barline ean encode`.
#[derive(Args, Debug)]
pub struct EanEncodeArgs {
    /// Digits: 12/13 (EAN-13), 7/8 (EAN-8), 5 or 2 (add-on).
    pub digits: String,
    /// Treat the digits as UPC-A (11 or 12 digits).
    #[arg(long)]
    pub upc: bool,
    /// Print the digit encodings (L/G/R) to stderr.
    #[arg(long)]
    pub parity: bool,
}

/// Arguments for `barline ean decode`.
#[derive(Args, Debug)]
pub struct EanDecodeArgs {
    /// Bar pattern as `1`/`0` modules (falls back to stdin if omitted).
    #[arg(long)]
    pub pattern: Option<String>,
    /// Read the pattern from file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
}

/// Arguments for `barline ean checksum`.
#[derive(Args, Debug)]
pub struct EanChecksumArgs {
    /// Digits without (or, with --verify, including) the check digit.
    pub digits: String,
    /// Verify the trailing check digit instead of computing one.
    #[arg(long)]
    pub verify: bool,
}

/// Execute an EAN command.
pub fn handle(command: EanCommand, session: &Session) -> Result<()> {
    match command {
        EanCommand::Encode(args) => encode(args, session),
        EanCommand::Decode(args) => decode(args, session),
        EanCommand::Checksum(args) => checksum(args, session),
    }
}

fn encode(args: EanEncodeArgs, session: &Session) -> Result<()> {
    let digits = if args.upc {
        if args.digits.len() == 11 {
            format!("0{}", args.digits)
        } else {
            ean::upc_a_to_ean13(&args.digits)
                .with_context(|| format!("'{}' is not a UPC-A number", args.digits))?
        }
    } else {
        args.digits
    };
    let pattern =
        barline::encode_ean(&digits).with_context(|| format!("failed to encode '{digits}'"))?;
    if args.parity {
        let parity: String = ean::parity_pattern(&digits)?
            .iter()
            .map(ToString::to_string)
            .collect();
        eprintln!("{parity}");
    }
    tracing::debug!(modules = pattern.len(), "encoded EAN pattern");
    session.out.pattern(&pattern)
}

fn decode(args: EanDecodeArgs, session: &Session) -> Result<()> {
    let pattern = read_pattern(args.pattern, args.from)?;
    let digits = barline::decode_ean(&pattern).context("failed to decode EAN pattern")?;
    let kind = EanKind::for_modules(pattern.len())
        .map(|k| k.to_string())
        .unwrap_or_default();
    session.out.text(&format!("{digits}\t{kind}\n"))
}

fn checksum(args: EanChecksumArgs, session: &Session) -> Result<()> {
    if args.verify {
        ean::verify(&args.digits)
            .with_context(|| format!("'{}' failed verification", args.digits))?;
        return session.out.text(&format!("{} ok\n", args.digits));
    }
    let check = barline::checksum_ean(&args.digits)
        .with_context(|| format!("cannot compute a check digit for '{}'", args.digits))?;
    session.out.text(&format!("{check}\n"))
}
