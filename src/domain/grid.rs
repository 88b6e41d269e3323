/// Grid: the 7 × 15 occupancy matrix.
///
/// Row 0 is the ground row; play climbs towards row 14.
/// Addressing outside the grid is a caller bug, caught by `debug_assert!`.

pub const COLS: usize = 7;
pub const ROWS: usize = 15;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: [[bool; COLS]; ROWS],
}

impl Grid {
    pub fn new() -> Self {
        Grid { cells: [[false; COLS]; ROWS] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < COLS && y < ROWS, "grid read out of range: ({x}, {y})");
        self.cells[y][x]
    }

    /// Alias of `get`, reads better at call sites that test overlap.
    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y)
    }

    /// Set a cell. Returns true if the value actually changed.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, occupied: bool) -> bool {
        debug_assert!(x < COLS && y < ROWS, "grid write out of range: ({x}, {y})");
        let cell = &mut self.cells[y][x];
        let changed = *cell != occupied;
        *cell = occupied;
        changed
    }

    pub fn clear(&mut self) {
        self.cells = [[false; COLS]; ROWS];
    }

    pub fn count_occupied(&self, y: usize) -> usize {
        self.row(y).iter().filter(|&&c| c).count()
    }

    pub fn row(&self, y: usize) -> &[bool; COLS] {
        debug_assert!(y < ROWS, "grid row out of range: {y}");
        &self.cells[y]
    }

    /// Coordinates of every occupied cell, bottom row first.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &c)| c)
                .map(move |(x, _)| (x, y))
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let g = Grid::new();
        assert_eq!(g.occupied_cells().count(), 0);
        for y in 0..ROWS {
            assert_eq!(g.count_occupied(y), 0);
        }
    }

    #[test]
    fn set_reports_change() {
        let mut g = Grid::new();
        assert!(g.set(3, 4, true));
        assert!(!g.set(3, 4, true));
        assert!(g.is_occupied(3, 4));
        assert!(g.set(3, 4, false));
        assert!(!g.get(3, 4));
    }

    #[test]
    fn count_is_per_row() {
        let mut g = Grid::new();
        g.set(0, 2, true);
        g.set(6, 2, true);
        g.set(1, 3, true);
        assert_eq!(g.count_occupied(2), 2);
        assert_eq!(g.count_occupied(3), 1);
        assert_eq!(g.count_occupied(4), 0);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut g = Grid::new();
        g.set(0, 0, true);
        g.set(6, 14, true);
        g.clear();
        assert_eq!(g, Grid::new());
    }

    #[test]
    fn occupied_cells_bottom_first() {
        let mut g = Grid::new();
        g.set(5, 9, true);
        g.set(2, 1, true);
        let cells: Vec<_> = g.occupied_cells().collect();
        assert_eq!(cells, vec![(2, 1), (5, 9)]);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn out_of_range_write_fails_fast() {
        let mut g = Grid::new();
        g.set(COLS, 0, true);
    }
}
