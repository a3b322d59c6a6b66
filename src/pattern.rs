use crate::error::{BarcodeError, Result};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Ordered bar/space modules of a linear symbol. `true` is a bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BarcodePattern {
    modules: Vec<bool>,
}

impl BarcodePattern {
    pub fn new(modules: Vec<bool>) -> Self {
        Self { modules }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            modules: Vec::with_capacity(capacity),
        }
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The same modules read right to left.
    pub fn reversed(&self) -> Self {
        Self {
            modules: self.modules.iter().rev().copied().collect(),
        }
    }

    /// Append the lowest `width` bits of `bits`, most significant first.
    pub(crate) fn push_bits(&mut self, bits: u16, width: usize) {
        for shift in (0..width).rev() {
            self.modules.push((bits >> shift) & 1 == 1);
        }
    }

    /// Read `width` modules starting at `start` as an integer, first module
    /// most significant. Returns `None` past the end.
    pub(crate) fn bits_at(&self, start: usize, width: usize) -> Option<u16> {
        let slice = self.modules.get(start..start + width)?;
        Some(slice.iter().fold(0u16, |acc, &m| (acc << 1) | m as u16))
    }

    /// Project every module through a caller supplied mapping.
    pub fn map_indexed<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(usize, bool) -> T,
    {
        self.modules
            .iter()
            .enumerate()
            .map(|(idx, &bar)| f(idx, bar))
            .collect()
    }

    pub fn render_with(&self, bar: char, space: char) -> String {
        self.modules
            .iter()
            .map(|&m| if m { bar } else { space })
            .collect()
    }

    pub fn render(&self, style: RenderStyle) -> String {
        match style {
            RenderStyle::AsciiX => self.render_with('X', ' '),
            RenderStyle::Ascii01 => self.render_with('1', '0'),
            RenderStyle::Blocks => self.render_with('█', ' '),
        }
    }

    /// Contiguous bar runs as `(first module, width)` pairs.
    pub fn bars(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = None;
        for (idx, &m) in self.modules.iter().enumerate() {
            match (m, start) {
                (true, None) => start = Some(idx),
                (false, Some(s)) => {
                    runs.push((s, idx - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.modules.len() - s));
        }
        runs
    }

    /// Minimal SVG document drawing one rectangle per bar run.
    pub fn to_svg(&self, module_width: u32, height: u32) -> String {
        let width = self.modules.len() as u32 * module_width;
        let mut out = String::new();
        writeln!(
            &mut out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )
        .ok();
        writeln!(
            &mut out,
            r#"  <rect width="{width}" height="{height}" fill="white"/>"#
        )
        .ok();
        for (start, run) in self.bars() {
            writeln!(
                &mut out,
                r#"  <rect x="{}" y="0" width="{}" height="{height}" fill="black"/>"#,
                start as u32 * module_width,
                run as u32 * module_width
            )
            .ok();
        }
        out.push_str("</svg>\n");
        out
    }
}

impl From<Vec<bool>> for BarcodePattern {
    fn from(modules: Vec<bool>) -> Self {
        Self::new(modules)
    }
}

/// Accepts `1`/`X`/`#`/`█` for bars and `0`/`.`/`_`/`-` for spaces;
/// whitespace is ignored.
impl FromStr for BarcodePattern {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut modules = Vec::with_capacity(s.len());
        for (index, ch) in s.chars().enumerate() {
            match ch {
                '1' | 'X' | 'x' | '#' | '█' => modules.push(true),
                '0' | '.' | '_' | '-' => modules.push(false),
                c if c.is_whitespace() => {}
                ch => return Err(BarcodeError::InvalidCharacter { index, ch }),
            }
        }
        Ok(Self { modules })
    }
}

impl fmt::Display for BarcodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderStyle::Ascii01))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Use 'X' for bars and blanks for spaces
    AsciiX,
    /// Use '1'/'0' for bars/spaces
    Ascii01,
    /// Full block characters for terminal previews
    Blocks,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::AsciiX => write!(f, "ascii-x"),
            RenderStyle::Ascii01 => write!(f, "ascii-01"),
            RenderStyle::Blocks => write!(f, "blocks"),
        }
    }
}
