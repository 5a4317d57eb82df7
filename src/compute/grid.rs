//! Toroidal cell grid.
//!
//! Cells are stored row-major. Every neighbor lookup wraps at the edges, so
//! the grid behaves like the surface of a torus.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::prelude::*;
use rayon::prelude::*;

use super::RuleSet;

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Current (rendered) state.
    pub alive: bool,
    /// State for the following tick.
    pub alive_next: bool,
    /// Column, fixed at creation.
    pub x: usize,
    /// Row, fixed at creation.
    pub y: usize,
    /// Consecutive ticks alive. Zero for dead cells.
    pub age: u32,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    /// Live cells after the tick.
    pub live_cells: usize,
    /// Change in live cells relative to before the tick.
    pub delta: i64,
}

/// Fixed-size toroidal grid of cells.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    columns: usize,
    rows: usize,
    /// Pre-allocated next-state buffer: (alive_next, age_next) per cell.
    next: Vec<(bool, u32)>,
}

impl Grid {
    /// Create an all-dead grid.
    ///
    /// # Panics
    ///
    /// Panics if `columns` or `rows` is zero.
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(
            columns > 0 && rows > 0,
            "grid dimensions must be non-zero, got {columns}x{rows}"
        );

        let cells = (0..rows)
            .flat_map(|y| {
                (0..columns).map(move |x| Cell {
                    alive: false,
                    alive_next: false,
                    x,
                    y,
                    age: 0,
                })
            })
            .collect();

        Self {
            cells,
            columns,
            rows,
            next: vec![(false, 0); columns * rows],
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Convert (x, y) to flat index.
    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.columns + x
    }

    /// Cell at (x, y), if in range.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.columns && y < self.rows {
            Some(&self.cells[self.idx(x, y)])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterator over live cells.
    pub fn live(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.alive)
    }

    /// Number of live cells.
    pub fn live_cells(&self) -> usize {
        self.live().count()
    }

    /// Coordinates of all live cells in row-major order.
    pub fn live_coordinates(&self) -> Vec<(usize, usize)> {
        self.live().map(|c| (c.x, c.y)).collect()
    }

    /// Live neighbor count of (x, y) and the truncated mean age of those
    /// neighbors (0 when there are none). Wraps at the edges.
    pub fn neighbor_count(&self, x: usize, y: usize) -> (usize, u32) {
        neighbor_count(&self.cells, self.columns, self.rows, x, y)
    }

    /// Advance every cell one generation.
    ///
    /// Next states are computed from the current states of all cells before
    /// any cell is updated, so transitions are simultaneous.
    pub fn tick(&mut self, rules: &RuleSet) -> TickStats {
        let before = self.live_cells();
        let (columns, rows) = (self.columns, self.rows);
        let cells = &self.cells;

        self.next.par_iter_mut().enumerate().for_each(|(i, next)| {
            let cell = &cells[i];
            let (count, avg_age) = neighbor_count(cells, columns, rows, cell.x, cell.y);
            let alive_next = rules.next_state(cell.alive, count);
            *next = if !alive_next {
                (false, 0)
            } else if cell.alive {
                (true, cell.age + 1)
            } else {
                // Newborns inherit the mean age of their parents
                (true, avg_age + 1)
            };
        });

        let mut live_cells = 0;
        for (cell, &(alive_next, age)) in self.cells.iter_mut().zip(self.next.iter()) {
            cell.alive_next = alive_next;
            cell.age = age;
            cell.alive = alive_next;
            if alive_next {
                live_cells += 1;
            }
        }

        TickStats {
            live_cells,
            delta: live_cells as i64 - before as i64,
        }
    }

    /// Set a cell's state, wrapping the coordinates into range.
    ///
    /// Sets `alive` and `alive_next` together and zeroes the age of dead
    /// cells. Returns the wrapped coordinates.
    pub fn set_cell_state(&mut self, x: isize, y: isize, alive: bool) -> (usize, usize) {
        let x = x.rem_euclid(self.columns as isize) as usize;
        let y = y.rem_euclid(self.rows as isize) as usize;
        let idx = self.idx(x, y);

        let cell = &mut self.cells[idx];
        cell.alive = alive;
        cell.alive_next = alive;
        if !alive {
            cell.age = 0;
        }

        (x, y)
    }

    /// Map pattern coordinates (origin at the pattern's logical center) onto
    /// the grid, centered on the grid's midpoint and wrapped.
    pub fn translate_origin(&self, x: isize, y: isize) -> (usize, usize) {
        let x = (self.columns / 2) as isize + x;
        let y = (self.rows / 2) as isize + y;
        (
            x.rem_euclid(self.columns as isize) as usize,
            y.rem_euclid(self.rows as isize) as usize,
        )
    }

    /// Kill the rest of a `width`-wide box, `height` rows tall.
    ///
    /// `x_edge` is the left side of the box, `x` is where the first row
    /// starts; further rows start at `x_edge`.
    ///
    /// Spans longer than the grid wrap onto cells already killed, so at most
    /// `columns` cells per row and `rows + 1` rows are visited. The extra row
    /// covers a box that wraps back onto its partial first row.
    pub fn fill_dead(&mut self, x_edge: isize, x: isize, y: isize, width: isize, height: isize) {
        let columns = self.columns as isize;
        let height = height.clamp(0, self.rows as isize + 1);

        let mut x = x;
        for row in 0..height {
            let span = (x_edge + width - x).clamp(0, columns);
            for col in x..x + span {
                self.set_cell_state(col, y + row, false);
            }
            x = x_edge;
        }
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.alive = false;
            cell.alive_next = false;
            cell.age = 0;
        }
    }

    /// Fill the grid randomly, each cell alive with probability `ratio`.
    ///
    /// A `seed` of 0 derives one from the clock. Returns the seed used.
    pub fn randomize(&mut self, seed: u64, ratio: f64) -> u64 {
        let seed = if seed == 0 {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1)
        } else {
            seed
        };
        log::info!("seed = {}", seed);

        let mut rng = StdRng::seed_from_u64(seed);
        let ratio = ratio.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            let alive = rng.gen_bool(ratio);
            cell.alive = alive;
            cell.alive_next = alive;
            cell.age = 0;
        }
        seed
    }
}

fn neighbor_count(
    cells: &[Cell],
    columns: usize,
    rows: usize,
    x: usize,
    y: usize,
) -> (usize, u32) {
    let x_prev = (x + columns - 1) % columns;
    let x_next = (x + 1) % columns;
    let y_prev = (y + rows - 1) % rows;
    let y_next = (y + 1) % rows;

    let mut count = 0usize;
    let mut age_sum = 0u64;
    for (nx, ny) in [
        (x_prev, y_prev),
        (x, y_prev),
        (x_next, y_prev),
        (x_prev, y),
        (x_next, y),
        (x_prev, y_next),
        (x, y_next),
        (x_next, y_next),
    ] {
        let neighbor = &cells[ny * columns + nx];
        if neighbor.alive {
            count += 1;
            age_sum += neighbor.age as u64;
        }
    }

    if count > 0 {
        (count, (age_sum / count as u64) as u32)
    } else {
        (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_with(columns: usize, rows: usize, live: &[(isize, isize)]) -> Grid {
        let mut grid = Grid::new(columns, rows);
        for &(x, y) in live {
            grid.set_cell_state(x, y, true);
        }
        grid
    }

    #[test]
    fn test_grid_has_no_holes() {
        let grid = Grid::new(7, 5);
        assert_eq!(grid.cells().len(), 35);
        for y in 0..5 {
            for x in 0..7 {
                let cell = grid.cell(x, y).unwrap();
                assert_eq!((cell.x, cell.y), (x, y));
            }
        }
        assert!(grid.cell(7, 0).is_none());
    }

    #[test]
    fn test_dead_grid_stays_dead() {
        let mut grid = Grid::new(16, 16);
        let stats = grid.tick(&RuleSet::default());
        assert_eq!(stats.live_cells, 0);
        assert_eq!(stats.delta, 0);
        assert_eq!(grid.live_cells(), 0);
    }

    #[test]
    fn test_lonely_cell_dies() {
        let mut grid = grid_with(8, 8, &[(4, 4)]);
        let stats = grid.tick(&RuleSet::default());
        assert_eq!(stats.live_cells, 0);
        assert_eq!(stats.delta, -1);
        assert_eq!(grid.cell(4, 4).unwrap().age, 0);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut grid = grid_with(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        let rules = RuleSet::default();

        grid.tick(&rules);
        assert_eq!(grid.live_coordinates(), vec![(2, 1), (2, 2), (2, 3)]);

        grid.tick(&rules);
        assert_eq!(grid.live_coordinates(), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_block_ages() {
        let mut grid = grid_with(6, 6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        let rules = RuleSet::default();
        for _ in 0..3 {
            grid.tick(&rules);
        }
        for cell in grid.live() {
            assert_eq!(cell.age, 3);
            assert!(cell.alive_next);
        }
    }

    #[test]
    fn test_newborn_inherits_mean_age() {
        // Blinker: the center survives, the two new ends are born
        let mut grid = grid_with(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        let rules = RuleSet::default();
        grid.tick(&rules);
        // Newborns had parents of age 0, so they start at 1
        assert_eq!(grid.cell(2, 1).unwrap().age, 1);
        assert_eq!(grid.cell(2, 2).unwrap().age, 1);

        grid.tick(&rules);
        // Center survived twice; ends were born from parents aged 1
        assert_eq!(grid.cell(2, 2).unwrap().age, 2);
        assert_eq!(grid.cell(1, 2).unwrap().age, 2);
    }

    #[test]
    fn test_neighbor_count_wraps_at_corners() {
        let columns = 6;
        let rows = 5;
        // Neighbors of (0, 0) on the opposite edges
        let grid = grid_with(
            columns,
            rows,
            &[(5, 4), (0, 4), (1, 0), (5, 1)],
        );
        assert_eq!(grid.neighbor_count(0, 0).0, 4);

        // Neighbors of the far corner wrap back to (0, 0)
        let grid = grid_with(columns, rows, &[(0, 0), (4, 0), (0, 3)]);
        assert_eq!(grid.neighbor_count(5, 4).0, 3);
    }

    #[test]
    fn test_neighbor_count_mean_age() {
        let mut grid = grid_with(8, 8, &[(3, 3), (4, 3), (3, 4), (4, 4)]);
        grid.tick(&RuleSet::default());
        grid.set_cell_state(5, 5, true);
        // (4, 4) has neighbors (3,3), (4,3), (3,4) aged 1 and (5,5) aged 0
        assert_eq!(grid.neighbor_count(4, 4), (4, 0));
        assert_eq!(grid.neighbor_count(2, 2), (1, 1));
        assert_eq!(grid.neighbor_count(7, 0), (0, 0));
    }

    #[test]
    fn test_set_cell_state_wraps() {
        let mut grid = Grid::new(10, 8);
        assert_eq!(grid.set_cell_state(-1, -1, true), (9, 7));
        assert_eq!(grid.set_cell_state(10, 8, true), (0, 0));
        assert_eq!(grid.set_cell_state(23, 17, true), (3, 1));

        let cell = grid.cell(9, 7).unwrap();
        assert!(cell.alive && cell.alive_next);
    }

    #[test]
    fn test_set_dead_zeroes_age() {
        let mut grid = grid_with(6, 6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        grid.tick(&RuleSet::default());
        assert_eq!(grid.cell(2, 2).unwrap().age, 1);
        grid.set_cell_state(2, 2, false);
        let cell = grid.cell(2, 2).unwrap();
        assert_eq!(cell.age, 0);
        assert!(!cell.alive && !cell.alive_next);
    }

    #[test]
    fn test_translate_origin() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.translate_origin(0, 0), (5, 4));
        assert_eq!(grid.translate_origin(-6, -5), (9, 7));
        assert_eq!(grid.translate_origin(5, 4), (0, 0));
    }

    #[test]
    fn test_fill_dead() {
        let mut grid = Grid::new(6, 6);
        for y in 0..6 {
            for x in 0..6 {
                grid.set_cell_state(x, y, true);
            }
        }
        // First row from x=3, then two full rows of a 4-wide box at x=1
        grid.fill_dead(1, 3, 1, 4, 3);
        let dead: Vec<_> = grid
            .cells()
            .iter()
            .filter(|c| !c.alive)
            .map(|c| (c.x, c.y))
            .collect();
        assert_eq!(
            dead,
            vec![
                (3, 1),
                (4, 1),
                (1, 2),
                (2, 2),
                (3, 2),
                (4, 2),
                (1, 3),
                (2, 3),
                (3, 3),
                (4, 3)
            ]
        );
    }

    #[test]
    fn test_fill_dead_oversized_box() {
        let full = |columns: usize, rows: usize| {
            let mut grid = Grid::new(columns, rows);
            for y in 0..rows as isize {
                for x in 0..columns as isize {
                    grid.set_cell_state(x, y, true);
                }
            }
            grid
        };

        // Box just large enough to wrap back onto the partial first row
        let mut small = full(6, 5);
        small.fill_dead(0, 3, 2, 6, 6);
        assert_eq!(small.live_cells(), 0);

        // Huge boxes give the same result without visiting every wrapped cell
        let mut huge = full(6, 5);
        huge.fill_dead(0, 3, 2, isize::MAX / 2, isize::MAX / 2);
        assert_eq!(huge.live_cells(), 0);

        // One row short of wrapping leaves the start of the first row alive
        let mut partial = full(6, 5);
        partial.fill_dead(0, 3, 2, 6, 5);
        assert_eq!(partial.live_coordinates(), vec![(0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_sized_grid_panics() {
        Grid::new(0, 4);
    }

    #[test]
    fn test_randomize_is_seeded() {
        let mut a = Grid::new(32, 32);
        let mut b = Grid::new(32, 32);
        assert_eq!(a.randomize(42, 0.15), 42);
        b.randomize(42, 0.15);
        assert_eq!(a.live_coordinates(), b.live_coordinates());
        assert!(a.live_cells() > 0);

        a.clear();
        assert_eq!(a.live_cells(), 0);
        a.randomize(7, 0.0);
        assert_eq!(a.live_cells(), 0);
    }

    proptest! {
        #[test]
        fn prop_toroidal_identity(
            pattern in proptest::collection::vec(any::<bool>(), 9),
            columns in 4usize..12,
            rows in 4usize..12,
        ) {
            // Same 3x3 neighborhood around (0, 0) and around an interior cell
            let mut corner = Grid::new(columns, rows);
            let mut interior = Grid::new(columns, rows);
            for (i, &alive) in pattern.iter().enumerate() {
                let dx = (i % 3) as isize - 1;
                let dy = (i / 3) as isize - 1;
                corner.set_cell_state(dx, dy, alive);
                interior.set_cell_state(2 + dx, 2 + dy, alive);
            }
            prop_assert_eq!(corner.neighbor_count(0, 0), interior.neighbor_count(2, 2));

            let (cx, cy) = (columns - 1, rows - 1);
            let mut far = Grid::new(columns, rows);
            for (i, &alive) in pattern.iter().enumerate() {
                let dx = (i % 3) as isize - 1;
                let dy = (i / 3) as isize - 1;
                far.set_cell_state(cx as isize + dx, cy as isize + dy, alive);
            }
            prop_assert_eq!(far.neighbor_count(cx, cy), interior.neighbor_count(2, 2));
        }
    }
}
