//! Application Identifier table commands (`barline ai ...`).

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::Session;

/// AI table subcommands.
#[derive(Subcommand, Debug)]
pub enum AiCommand {
    /// List all known Application Identifiers.
    List,
    /// Show the definition of one identifier.
    Show(AiShowArgs),
    /// Write the active table as JSON, a starting point for `--ai-table`.
    Export,
}

/// Arguments for `barline ai show`.
#[derive(Args, Debug)]
pub struct AiShowArgs {
    /// Identifier to display, e.g. `01` or `3103`.
    pub ai: String,
}

/// Execute an AI table command.
pub fn handle(command: AiCommand, session: &Session) -> Result<()> {
    match command {
        AiCommand::List => list(session),
        AiCommand::Show(args) => show(args, session),
        AiCommand::Export => export(session),
    }
}

fn list(session: &Session) -> Result<()> {
    let registry = session.registry()?;
    let mut out = String::from("Application identifiers:\n");
    for spec in registry.list() {
        out.push_str(&format!(
            "  {:<4} {:<6} {}\n",
            spec.ai,
            spec.length.to_string(),
            spec.title
        ));
    }
    session.out.text(&out)
}

fn show(args: AiShowArgs, session: &Session) -> Result<()> {
    let registry = session.registry()?;
    let spec = registry
        .get(&args.ai)
        .with_context(|| format!("identifier '{}' not found", args.ai))?;
    let mut out = format!("AI ({}): {}\n", spec.ai, spec.title);
    out.push_str(&format!("  format:      {}\n", spec.length));
    out.push_str(&format!(
        "  separator:   {}\n",
        if spec.length.is_fixed() {
            "none (fixed length)"
        } else {
            "FNC1 when followed by another field"
        }
    ));
    if spec.date {
        out.push_str("  date:        YYMMDD\n");
    }
    if spec.check_digit {
        out.push_str("  check digit: GS1 modulo 10\n");
    }
    session.out.text(&out)
}

fn export(session: &Session) -> Result<()> {
    let registry = session.registry()?;
    let json = registry.to_json()?;
    session.out.text(&format!("{json}\n"))
}
