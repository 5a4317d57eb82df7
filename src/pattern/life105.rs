//! Life 1.05 decoder.
//!
//! ```text
//! #Life 1.05
//! #D description lines (0+)
//! #N            use the default rule
//! #R 23/3       stay-alive/birth rule (note the inverted order)
//! #P -1 4       cursor position as "row col", center is 0 0
//! .*.           pattern lines, '.' dead and '*' alive
//! ```

use crate::compute::Grid;
use crate::error::{LifeError, Result};

use super::PatternDecoder;

/// Decoder for Life 1.05 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Life105;

impl PatternDecoder for Life105 {
    fn decode(
        &self,
        grid: &mut Grid,
        lines: &[String],
        origin_x: isize,
        origin_y: isize,
    ) -> Result<Option<String>> {
        let (x, y) = grid.translate_origin(origin_x, origin_y);
        let (mut x, mut y) = (x as isize, y as isize);
        let mut rule = None;

        for line in lines {
            if line.starts_with("#D") || line.starts_with("#Life") || line.starts_with("#N") {
                continue;
            } else if let Some(fields) = line.strip_prefix("#R ") {
                rule = Some(parse_rule(fields)?);
            } else if line.starts_with("#P") {
                let (row, col) = parse_position(line)?;
                let (px, py) = grid.translate_origin(col + origin_x, row + origin_y);
                x = px as isize;
                y = py as isize;
            } else {
                for (i, c) in line.chars().enumerate() {
                    if c != '.' && c != '*' {
                        return Err(LifeError::MalformedPattern(format!(
                            "Illegal characters in pattern: {line}"
                        )));
                    }
                    grid.set_cell_state(x + i as isize, y, c == '*');
                }
                y += 1;
            }
        }

        Ok(rule)
    }
}

/// Turn `stay/birth` into a `B<birth>/S<stay>` rulestring.
fn parse_rule(fields: &str) -> Result<String> {
    if !fields.contains('/') {
        return Err(LifeError::MalformedRule(format!(
            "Rule must contain '/': {fields}"
        )));
    }

    let parts: Vec<&str> = fields.split('/').map(str::trim).collect();
    let [stay, birth] = parts[..] else {
        return Err(LifeError::MalformedRule(format!(
            "Problem splitting rule on '/': {fields}"
        )));
    };

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(stay) {
        return Err(LifeError::MalformedRule(format!(
            "Error parsing stay alive value: {stay:?}"
        )));
    }
    if !digits(birth) {
        return Err(LifeError::MalformedRule(format!(
            "Error parsing birth value: {birth:?}"
        )));
    }

    Ok(format!("B{birth}/S{stay}"))
}

/// Parse `#P row col`.
fn parse_position(line: &str) -> Result<(isize, isize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [_, row, col] = fields[..] else {
        return Err(LifeError::MalformedHeader(format!(
            "Cannot parse position line: {line}"
        )));
    };

    let parse = |s: &str| {
        s.parse::<isize>().map_err(|e| {
            LifeError::MalformedHeader(format!("Error parsing position {s:?}: {e}"))
        })
    };
    Ok((parse(row)?, parse(col)?))
}
