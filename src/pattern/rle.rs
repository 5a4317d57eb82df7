//! Run Length Encoded decoder.
//!
//! See <https://conwaylife.com/wiki/Run_Length_Encoded>. Optional `#` lines
//! are followed by a header `x = W, y = H[, rule = R]` and a body of runs:
//! an optional count followed by `b` (dead), any other letter (alive), `$`
//! (end of row) or `!` (end of pattern).

use crate::compute::Grid;
use crate::error::{LifeError, Result};

use super::PatternDecoder;

/// Largest accepted run count.
const MAX_RUN: usize = u32::MAX as usize;

/// Decoder for RLE files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rle;

/// Parsed `x = W, y = H[, rule = R]` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RleHeader {
    pub width: usize,
    pub height: usize,
    pub rule: Option<String>,
}

impl RleHeader {
    /// Find and parse a header anywhere in `line`.
    ///
    /// Returns `None` when the line has no header, and an error when it has
    /// one whose dimensions do not fit.
    pub fn find(line: &str) -> Option<Result<Self>> {
        scan_header(line).map(Self::from_match)
    }

    fn from_match(found: HeaderMatch<'_>) -> Result<Self> {
        Ok(Self {
            width: dimension("width", found.width)?,
            height: dimension("height", found.height)?,
            rule: found.rule.map(str::to_string),
        })
    }
}

fn dimension(name: &str, digits: &str) -> Result<usize> {
    digits
        .parse::<u32>()
        .map(|v| v as usize)
        .map_err(|e| LifeError::MalformedHeader(format!("Error parsing {name} {digits:?}: {e}")))
}

/// Does any line hold an RLE header?
pub(crate) fn is_rle(lines: &[String]) -> bool {
    lines.iter().any(|line| scan_header(line).is_some())
}

impl PatternDecoder for Rle {
    fn decode(
        &self,
        grid: &mut Grid,
        lines: &[String],
        origin_x: isize,
        origin_y: isize,
    ) -> Result<Option<String>> {
        let (x, y) = grid.translate_origin(origin_x, origin_y);
        let (x, y) = (x as isize, y as isize);

        let mut header = None;
        let mut first = 0;
        for (i, line) in lines.iter().enumerate() {
            if let Some(found) = RleHeader::find(line) {
                header = Some(found?);
                first = i + 1;
                break;
            }
            // All lines before the header must be # lines
            if !line.starts_with('#') {
                return Err(LifeError::MalformedHeader(
                    "Incorrect or missing RLE header".to_string(),
                ));
            }
        }
        let header = header.ok_or_else(|| {
            LifeError::MalformedHeader("Incorrect or missing RLE header".to_string())
        })?;
        if first >= lines.len() {
            return Err(LifeError::MalformedHeader(
                "Missing lines after RLE header".to_string(),
            ));
        }

        let width = header.width as isize;
        let height = header.height as isize;

        // Cursor relative to the pattern's top-left corner
        let mut col: isize = 0;
        let mut row: isize = 0;
        let mut count: usize = 0;

        for line in &lines[first..] {
            for c in line.chars() {
                match c {
                    '$' => {
                        let rows = count.max(1) as isize;
                        grid.fill_dead(x, x + col, y + row, width, rows);
                        col = 0;
                        row += rows;
                        count = 0;
                    }
                    '!' => {
                        grid.fill_dead(x, x + col, y + row, width, height - row);
                        return Ok(header.rule);
                    }
                    '0'..='9' => {
                        let digit = c as usize - '0' as usize;
                        count = count
                            .checked_mul(10)
                            .and_then(|n| n.checked_add(digit))
                            .filter(|&n| n <= MAX_RUN)
                            .ok_or_else(|| {
                                LifeError::MalformedPattern(format!("Run count too large: {line}"))
                            })?;
                    }
                    c if c.is_ascii_alphabetic() => {
                        let alive = c != 'b';
                        let run = count.max(1);
                        // Cells past one full row wrap onto ones already written
                        for i in 0..run.min(grid.columns()) {
                            grid.set_cell_state(x + col + i as isize, y + row, alive);
                        }
                        col += run as isize;
                        count = 0;
                    }
                    c if c.is_ascii_whitespace() => {}
                    _ => {
                        return Err(LifeError::MalformedPattern(format!(
                            "Illegal character {c:?} in RLE body: {line}"
                        )));
                    }
                }
            }
        }

        Ok(header.rule)
    }
}

/// Raw header fields, borrowed from the line.
struct HeaderMatch<'a> {
    width: &'a str,
    height: &'a str,
    rule: Option<&'a str>,
}

/// Byte cursor used to match the header grammar.
struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn skip_whitespace(&mut self) {
        while self.s.as_bytes().get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.s[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// `\s* token \s*`
    fn eat_padded(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        let ok = self.eat(token);
        self.skip_whitespace();
        ok
    }

    fn digits(&mut self) -> Option<&'a str> {
        let s = self.s;
        let start = self.pos;
        while s.as_bytes().get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        let end = self.pos;
        (end > start).then(|| &s[start..end])
    }
}

/// Match `x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)(\s*,\s*rule\s*=\s*(.*))?` anywhere
/// in the line.
fn scan_header(line: &str) -> Option<HeaderMatch<'_>> {
    line.match_indices('x')
        .find_map(|(start, _)| match_header_at(line, start))
}

fn match_header_at(line: &str, start: usize) -> Option<HeaderMatch<'_>> {
    let mut cur = Cursor { s: line, pos: start };

    if !(cur.eat("x") && cur.eat_padded("=")) {
        return None;
    }
    let width = cur.digits()?;
    if !(cur.eat_padded(",") && cur.eat("y") && cur.eat_padded("=")) {
        return None;
    }
    let height = cur.digits()?;

    let mut rule_cur = Cursor { s: line, pos: cur.pos };
    let rule = if rule_cur.eat_padded(",") && rule_cur.eat("rule") && rule_cur.eat_padded("=") {
        Some(line[rule_cur.pos..].trim_end()).filter(|r| !r.is_empty())
    } else {
        None
    };

    Some(HeaderMatch {
        width,
        height,
        rule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::lines;

    fn decode(grid: &mut Grid, text: &str) -> Result<Option<String>> {
        Rle.decode(grid, &lines(text), 0, 0)
    }

    #[test]
    fn test_header_spacing_variants() {
        for line in [
            "x = 3, y = 2",
            "x=3,y=2",
            "x =3 ,  y= 2",
            "  x = 3, y = 2  ",
        ] {
            let header = RleHeader::find(line).unwrap().unwrap();
            assert_eq!((header.width, header.height), (3, 2), "{}", line);
            assert_eq!(header.rule, None);
        }
    }

    #[test]
    fn test_header_with_rule() {
        let header = RleHeader::find("x = 36, y = 9, rule = B3/S23  ")
            .unwrap()
            .unwrap();
        assert_eq!(header.width, 36);
        assert_eq!(header.height, 9);
        assert_eq!(header.rule.as_deref(), Some("B3/S23"));

        let header = RleHeader::find("x=1,y=1,rule=B36/S23").unwrap().unwrap();
        assert_eq!(header.rule.as_deref(), Some("B36/S23"));
    }

    #[test]
    fn test_non_headers() {
        for line in ["#C x marks the spot", "bo$2bo$3o!", "x = , y = 3", "y = 3, x = 2"] {
            assert!(RleHeader::find(line).is_none(), "{}", line);
        }
    }

    #[test]
    fn test_header_dimension_overflow() {
        assert!(matches!(
            RleHeader::find("x = 99999999999, y = 3"),
            Some(Err(LifeError::MalformedHeader(_)))
        ));
    }

    #[test]
    fn test_glider_with_rule() {
        let mut grid = Grid::new(10, 10);
        let rule = decode(&mut grid, "#N Glider\n#O Richard K. Guy\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n")
            .unwrap();
        assert_eq!(rule.as_deref(), Some("B3/S23"));
        assert_eq!(
            grid.live_coordinates(),
            vec![(6, 5), (7, 6), (5, 7), (6, 7), (7, 7)]
        );
    }

    #[test]
    fn test_body_spans_lines() {
        let mut grid = Grid::new(12, 12);
        decode(&mut grid, "x = 4, y = 1\n2o\n2o!\n").unwrap();
        assert_eq!(grid.live_coordinates(), vec![(6, 6), (7, 6), (8, 6), (9, 6)]);
    }

    #[test]
    fn test_row_counts_and_dead_fill() {
        let mut grid = Grid::new(10, 10);
        // Fill everything so the dead fill is observable
        for y in 0..10 {
            for x in 0..10 {
                grid.set_cell_state(x, y, true);
            }
        }
        decode(&mut grid, "x = 3, y = 4\no2$obo!\n").unwrap();

        // Inside the 3x4 box at (5, 5) only the written live cells remain
        let mut inside = Vec::new();
        for y in 5..9 {
            for x in 5..8 {
                if grid.cell(x, y).unwrap().alive {
                    inside.push((x, y));
                }
            }
        }
        assert_eq!(inside, vec![(5, 5), (5, 7), (7, 7)]);

        // Outside the box nothing changed
        assert!(grid.cell(8, 5).unwrap().alive);
        assert!(grid.cell(5, 9).unwrap().alive);
        assert!(grid.cell(4, 6).unwrap().alive);
    }

    #[test]
    fn test_whitespace_in_body_ignored() {
        let mut grid = Grid::new(10, 10);
        decode(&mut grid, "x = 3, y = 1\n o b o !\n").unwrap();
        assert_eq!(grid.live_coordinates(), vec![(5, 5), (7, 5)]);
    }

    #[test]
    fn test_other_letters_are_alive() {
        let mut grid = Grid::new(10, 10);
        decode(&mut grid, "x = 3, y = 1\nAbz!\n").unwrap();
        assert_eq!(grid.live_coordinates(), vec![(5, 5), (7, 5)]);
    }

    #[test]
    fn test_missing_terminator_is_accepted() {
        let mut grid = Grid::new(10, 10);
        assert_eq!(decode(&mut grid, "x = 2, y = 1\n2o\n").unwrap(), None);
        assert_eq!(grid.live_cells(), 2);
    }

    #[test]
    fn test_huge_row_skip_is_fast() {
        let mut grid = Grid::new(16, 16);
        let start = std::time::Instant::now();
        decode(&mut grid, "x = 1000, y = 1\n3000000$o!\n").unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        // 3000000 rows down wraps back to the starting row
        assert_eq!(grid.live_coordinates(), vec![(8, 8)]);
    }

    #[test]
    fn test_huge_cell_run_wraps_the_row() {
        let mut grid = Grid::new(16, 16);
        let start = std::time::Instant::now();
        decode(&mut grid, "x = 1, y = 1\n4000000000o!\n").unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        let row: Vec<_> = (0..16).map(|x| (x, 8)).collect();
        assert_eq!(grid.live_coordinates(), row);
    }

    #[test]
    fn test_run_count_limit() {
        let mut grid = Grid::new(10, 10);
        assert!(matches!(
            decode(&mut grid, "x = 1, y = 1\n5000000000o!\n"),
            Err(LifeError::MalformedPattern(_))
        ));
    }

    #[test]
    fn test_malformed_header() {
        let mut grid = Grid::new(10, 10);
        for text in [
            "not a comment\nx = 3, y = 3\n3o!\n",
            "#C only comments\n",
            "#C header is last\nx = 3, y = 3\n",
            "\nx = 3, y = 3\n3o!\n",
        ] {
            assert!(
                matches!(decode(&mut grid, text), Err(LifeError::MalformedHeader(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_illegal_body_character() {
        let mut grid = Grid::new(10, 10);
        assert!(matches!(
            decode(&mut grid, "x = 3, y = 1\no.o!\n"),
            Err(LifeError::MalformedPattern(_))
        ));
    }
}
