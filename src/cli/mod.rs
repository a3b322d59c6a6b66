//! Command-line interface wiring for the `barline` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use std::path::PathBuf;

use anyhow::Result;
use barline::AiRegistry;
use clap::{Parser, Subcommand};

pub mod ai;
pub mod code128;
pub mod common;
pub mod ean;
pub mod gs1;
pub mod utils;

use common::{Output, OutputStyle};

/// Parsed CLI entrypoint for the `barline` binary.
#[derive(Parser, Debug)]
#[command(
    name = "barline",
    version,
    about = "Code 128, GS1-128 and EAN/UPC barcode toolkit"
)]
pub struct Cli {
    /// JSON table of GS1 Application Identifiers replacing the built-in one.
    #[arg(long = "ai-table", global = true)]
    pub ai_table: Option<PathBuf>,
    /// Render style for bar patterns.
    #[arg(long, global = true, default_value_t = OutputStyle::AsciiX, value_enum)]
    pub style: OutputStyle,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<PathBuf>,
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Ean(ean::EanCommand),
    #[command(subcommand)]
    Code128(code128::Code128Command),
    #[command(subcommand)]
    Gs1(gs1::Gs1Command),
    #[command(subcommand)]
    Ai(ai::AiCommand),
}

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub ai_table: Option<PathBuf>,
    pub out: Output,
}

impl Session {
    pub fn registry(&self) -> Result<AiRegistry> {
        utils::load_registry(self.ai_table.as_deref())
    }
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    let session = Session {
        ai_table: cli.ai_table,
        out: Output {
            style: cli.style,
            path: cli.output,
        },
    };
    match cli.command {
        Command::Ean(cmd) => ean::handle(cmd, &session),
        Command::Code128(cmd) => code128::handle(cmd, &session),
        Command::Gs1(cmd) => gs1::handle(cmd, &session),
        Command::Ai(cmd) => ai::handle(cmd, &session),
    }
}
