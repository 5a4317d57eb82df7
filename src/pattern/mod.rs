//! Pattern files and their decoders.
//!
//! A [`Pattern`] is an ordered list of text lines holding one pattern file.
//! Three formats are understood, sniffed from the content:
//!
//! - Life 1.05: first line starts with `#Life 1.05`
//! - RLE: any line is an `x = W, y = H[, rule = R]` header
//! - Plaintext: everything else
//!
//! Decoders write straight into a [`Grid`] through `set_cell_state`. They
//! never touch shared configuration: a rule embedded in the pattern is
//! returned to the caller instead.

mod life105;
mod plaintext;
mod rle;

pub use life105::Life105;
pub use plaintext::Plaintext;
pub use rle::{Rle, RleHeader};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::compute::Grid;
use crate::error::{LifeError, Result};

/// Header that identifies a Life 1.05 file.
pub const LIFE_105_HEADER: &str = "#Life 1.05";
/// Header of the unsupported Life 1.06 format.
pub const LIFE_106_HEADER: &str = "#Life 1.06";

/// One pattern file as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    lines: Vec<String>,
}

impl Pattern {
    /// Wrap lines into a pattern. Fails on an empty list.
    pub fn new(lines: Vec<String>) -> Result<Self> {
        if lines.is_empty() {
            return Err(LifeError::EmptyInput("pattern has no lines"));
        }
        Ok(Self { lines })
    }

    /// Split text into lines. `\r\n` and `\n` endings are both accepted.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(text.lines().map(str::to_string).collect())
    }

    /// Read every line from a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Self::new(lines)
    }

    /// Load a pattern file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Sniff the file format.
    pub fn format(&self) -> Result<PatternFormat> {
        PatternFormat::detect(&self.lines)
    }
}

/// Supported pattern file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFormat {
    Life105,
    Rle,
    Plaintext,
}

impl PatternFormat {
    /// Pick a format from the pattern's content.
    pub fn detect(lines: &[String]) -> Result<Self> {
        let first = lines
            .first()
            .ok_or(LifeError::EmptyInput("pattern has no lines"))?;

        if first.starts_with(LIFE_105_HEADER) {
            Ok(PatternFormat::Life105)
        } else if first.starts_with(LIFE_106_HEADER) {
            Err(LifeError::UnsupportedFormat(
                "Life 1.06 file format is not supported".to_string(),
            ))
        } else if rle::is_rle(lines) {
            Ok(PatternFormat::Rle)
        } else {
            Ok(PatternFormat::Plaintext)
        }
    }

    /// Decoder for this format.
    pub fn decoder(self) -> &'static dyn PatternDecoder {
        match self {
            PatternFormat::Life105 => &Life105,
            PatternFormat::Rle => &Rle,
            PatternFormat::Plaintext => &Plaintext,
        }
    }
}

/// Decodes pattern lines into a grid.
pub trait PatternDecoder {
    /// Write the pattern into `grid`, placing its logical origin at
    /// `(origin_x, origin_y)` relative to the grid center.
    ///
    /// Returns the rule embedded in the pattern, if any. On error, cells
    /// written by earlier lines remain in the grid.
    fn decode(
        &self,
        grid: &mut Grid,
        lines: &[String],
        origin_x: isize,
        origin_y: isize,
    ) -> Result<Option<String>>;
}

/// Sniff the format of `pattern`, decode it centered on the grid, and return
/// the rule to use: the pattern's own rule if it carries one, otherwise
/// `default_rule`.
pub fn decode(grid: &mut Grid, pattern: &Pattern, default_rule: &str) -> Result<String> {
    let format = pattern.format()?;
    log::debug!(
        "Decoding {:?} pattern ({} lines)",
        format,
        pattern.lines().len()
    );

    let rule = format.decoder().decode(grid, pattern.lines(), 0, 0)?;
    Ok(rule.unwrap_or_else(|| default_rule.to_string()))
}

/// Like [`decode`], but decodes into a copy of `grid` and only replaces the
/// grid when the whole pattern decodes.
pub fn decode_atomic(grid: &mut Grid, pattern: &Pattern, default_rule: &str) -> Result<String> {
    let mut scratch = grid.clone();
    let rule = decode(&mut scratch, pattern, default_rule)?;
    *grid = scratch;
    Ok(rule)
}

#[cfg(test)]
pub(crate) fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
