//! Plaintext decoder.
//!
//! Lines starting with `!` are comments. In every other line `.` is a dead
//! cell and any other character is a live one, which is more lenient than the
//! usual `O`-only convention.

use crate::compute::Grid;
use crate::error::Result;

use super::PatternDecoder;

/// Decoder for plaintext (`.cells`) files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl PatternDecoder for Plaintext {
    fn decode(
        &self,
        grid: &mut Grid,
        lines: &[String],
        origin_x: isize,
        origin_y: isize,
    ) -> Result<Option<String>> {
        let (x, y) = grid.translate_origin(origin_x, origin_y);
        let x = x as isize;
        let mut y = y as isize;

        for line in lines.iter().filter(|l| !l.starts_with('!')) {
            for (i, c) in line.chars().enumerate() {
                grid.set_cell_state(x + i as isize, y, c != '.');
            }
            y += 1;
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::lines;

    #[test]
    fn test_any_glyph_is_alive() {
        let mut grid = Grid::new(10, 10);
        Plaintext
            .decode(&mut grid, &lines("!Name: mixed\nO*X\n.#.\n"), 0, 0)
            .unwrap();
        assert_eq!(
            grid.live_coordinates(),
            vec![(5, 5), (6, 5), (7, 5), (6, 6)]
        );
    }

    #[test]
    fn test_blank_lines_advance_rows() {
        let mut grid = Grid::new(10, 10);
        Plaintext
            .decode(&mut grid, &lines("O\n\nO\n"), 0, 0)
            .unwrap();
        assert_eq!(grid.live_coordinates(), vec![(5, 5), (5, 7)]);
    }

    #[test]
    fn test_origin_offset() {
        let mut grid = Grid::new(10, 10);
        let rule = Plaintext.decode(&mut grid, &lines("O\n"), -2, 3).unwrap();
        assert_eq!(rule, None);
        assert_eq!(grid.live_coordinates(), vec![(3, 8)]);
    }
}
