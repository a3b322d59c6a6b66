//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use anyhow::Result;
use barline::{BarcodePattern, CodeSet, RenderStyle};
use clap::ValueEnum;

use crate::cli::utils::write_output;

/// Module width in SVG user units.
const SVG_MODULE_WIDTH: u32 = 2;
const SVG_HEIGHT: u32 = 60;

/// How bar patterns are written out.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    #[value(name = "ascii-x")]
    AsciiX,
    #[value(name = "ascii-01")]
    Ascii01,
    Blocks,
    Svg,
}

/// Code set selector for explicit symbol values.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CodeSetArg {
    A,
    B,
    C,
}

impl From<CodeSetArg> for CodeSet {
    fn from(value: CodeSetArg) -> CodeSet {
        match value {
            CodeSetArg::A => CodeSet::A,
            CodeSetArg::B => CodeSet::B,
            CodeSetArg::C => CodeSet::C,
        }
    }
}

/// Where and how command results are written.
#[derive(Debug, Clone)]
pub struct Output {
    pub style: OutputStyle,
    pub path: Option<PathBuf>,
}

impl Output {
    pub fn render(&self, pattern: &BarcodePattern) -> String {
        let text = match self.style {
            OutputStyle::AsciiX => pattern.render(RenderStyle::AsciiX),
            OutputStyle::Ascii01 => pattern.render(RenderStyle::Ascii01),
            OutputStyle::Blocks => pattern.render(RenderStyle::Blocks),
            OutputStyle::Svg => return pattern.to_svg(SVG_MODULE_WIDTH, SVG_HEIGHT),
        };
        format!("{text}\n")
    }

    pub fn pattern(&self, pattern: &BarcodePattern) -> Result<()> {
        self.text(&self.render(pattern))
    }

    /// Write to the output path, or stdout when none was given.
    pub fn text(&self, content: &str) -> Result<()> {
        match &self.path {
            Some(path) => write_output(path, content),
            None => {
                print!("{content}");
                Ok(())
            }
        }
    }
}
