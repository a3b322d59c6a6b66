//! Input and output plumbing shared by the `barline` subcommands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use barline::{AiRegistry, BarcodePattern};

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Payload, element string or module text: `--text` wins, then `--from`
/// (`-` meaning stdin), then stdin.
pub fn read_text_arg(text: Option<String>, from: Option<PathBuf>) -> Result<String> {
    match (text, from) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) if !is_stdio(&path) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read input {}", path.display())),
        _ => read_stdin(),
    }
}

pub fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read barcode input from stdin")?;
    Ok(input)
}

/// Write rendered bars, SVG or a decoded payload to `path` (`-` is stdout).
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        return stdout.flush().context("failed to flush stdout");
    }
    fs::write(path, content)
        .with_context(|| format!("failed to write output {}", path.display()))
}

/// Parse a module string such as `10100011010...` (whitespace ignored).
pub fn read_pattern(text: Option<String>, from: Option<PathBuf>) -> Result<BarcodePattern> {
    let raw = read_text_arg(text, from)?;
    let pattern: BarcodePattern = raw.parse().context("failed to parse bar pattern")?;
    if pattern.is_empty() {
        return Err(anyhow!("bar pattern is empty"));
    }
    Ok(pattern)
}

/// Comma or whitespace separated symbol values like `104,40,73`.
pub fn parse_values(input: &str) -> Result<Vec<u8>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|_| anyhow!("'{part}' is not a symbol value (0-255)"))
        })
        .collect()
}

/// The AI table in effect: the one given with `--ai-table`, or the built-in set.
pub fn load_registry(path: Option<&Path>) -> Result<AiRegistry> {
    match path {
        Some(path) => AiRegistry::load(path),
        None => Ok(AiRegistry::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inline_text_wins_over_file() {
        let text = read_text_arg(Some("4006381333931".into()), Some("missing.txt".into())).unwrap();
        assert_eq!(text, "4006381333931");
    }

    #[test]
    fn missing_input_file_names_the_path() {
        let err = read_text_arg(None, Some("no/such/payload.txt".into())).unwrap_err();
        assert!(err.to_string().contains("no/such/payload.txt"), "{err}");
    }

    #[test]
    fn symbol_values_accept_commas_and_spaces() {
        assert_eq!(parse_values("104, 40 73,,106").unwrap(), vec![104, 40, 73, 106]);
        assert!(parse_values("104,300").is_err());
    }
}
