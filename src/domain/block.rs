/// The active block: a contiguous run of cells sliding along one row.

use super::grid::COLS;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

/// A single cell write produced by a slide: `(column, occupied)`.
pub type CellWrite = (usize, bool);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Block {
    /// Leftmost occupied column.
    pub position: usize,
    pub width: usize,
    pub direction: Direction,
}

impl Block {
    /// A fresh block at the left wall, heading right.
    pub fn new(width: usize) -> Self {
        debug_assert!(width >= 1 && width <= COLS);
        Block { position: 0, width, direction: Direction::Right }
    }

    /// Columns covered by the block.
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.position..self.position + self.width
    }

    pub fn touches_right_wall(&self) -> bool {
        self.position + self.width == COLS
    }

    pub fn touches_left_wall(&self) -> bool {
        self.position == 0
    }

    /// Advance one cell in the current direction.
    ///
    /// Returns the two cell writes needed to repaint the row, in the order
    /// they must be applied. The caller is expected to have bounced first;
    /// a block against the wall it is heading into never moves.
    pub fn slide(&mut self) -> [CellWrite; 2] {
        match self.direction {
            Direction::Right => {
                debug_assert!(!self.touches_right_wall());
                let writes = [(self.position, false), (self.position + self.width, true)];
                self.position += 1;
                writes
            }
            Direction::Left => {
                debug_assert!(!self.touches_left_wall());
                let writes = [(self.position - 1, true), (self.position + self.width - 1, false)];
                self.position -= 1;
                writes
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_starts_at_left_wall() {
        let b = Block::new(3);
        assert_eq!(b.columns(), 0..3);
        assert_eq!(b.direction, Direction::Right);
        assert!(b.touches_left_wall());
    }

    #[test]
    fn slide_right_moves_trailing_cell_to_front() {
        let mut b = Block::new(3);
        assert_eq!(b.slide(), [(0, false), (3, true)]);
        assert_eq!(b.position, 1);
    }

    #[test]
    fn slide_left_moves_trailing_cell_to_front() {
        let mut b = Block { position: 4, width: 2, direction: Direction::Left };
        assert_eq!(b.slide(), [(3, true), (5, false)]);
        assert_eq!(b.position, 3);
    }

    #[test]
    fn right_wall_depends_on_width() {
        assert!(Block { position: 4, width: 3, direction: Direction::Right }.touches_right_wall());
        assert!(Block { position: 6, width: 1, direction: Direction::Right }.touches_right_wall());
        assert!(!Block { position: 5, width: 1, direction: Direction::Right }.touches_right_wall());
    }
}
