/// Placement, bounce and outcome rules.
///
/// Pure functions over the grid and the active block. They decide what
/// happens; the engine performs the writes and emits the events.
///
/// ## Bounce (checked before every slide move)
/// ┌───────────┬──────────────────────────┬──────────────┐
/// │ Heading   │ Condition                │ New heading  │
/// ├───────────┼──────────────────────────┼──────────────┤
/// │ Right     │ rightmost cell on col 6  │ Left         │
/// │ Left      │ leftmost cell on col 0   │ Right        │
/// │ either    │ otherwise                │ unchanged    │
/// └───────────┴──────────────────────────┴──────────────┘
///
/// ## Placement
/// ┌──────────────────────────────┬─────────────────────────────┐
/// │ Condition                    │ Result                      │
/// ├──────────────────────────────┼─────────────────────────────┤
/// │ level == 0                   │ no trim, ground row holds   │
/// │ cell below column empty      │ that column is trimmed      │
/// │ row empty after trim         │ Lost                        │
/// │ next level == 11             │ MinorPrizeOffer             │
/// │ next level == 15             │ MajorPrizeWon               │
/// │ otherwise                    │ Advance                     │
/// └──────────────────────────────┴─────────────────────────────┘

use super::block::{Block, Direction};
use super::grid::Grid;
use super::level::{MAJOR_PRIZE_LEVEL, MINOR_PRIZE_LEVEL};

/// What a successful placement leads to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Advance {
    NextLevel,
    MinorPrizeOffer,
    MajorPrizeWon,
}

/// Direction the block should head in before its next move.
pub fn bounce(block: &Block) -> Direction {
    let at_wall = match block.direction {
        Direction::Right => block.touches_right_wall(),
        Direction::Left => block.touches_left_wall(),
    };
    if at_wall {
        block.direction.flipped()
    } else {
        block.direction
    }
}

/// Columns of the block at `level` with nothing underneath.
///
/// The ground row never overhangs.
pub fn overhanging_columns(grid: &Grid, block: &Block, level: usize) -> Vec<usize> {
    if level == 0 {
        return vec![];
    }
    block.columns().filter(|&x| !grid.is_occupied(x, level - 1)).collect()
}

/// A row with no occupied cell after trimming ends the game.
pub fn is_lost(grid: &Grid, level: usize) -> bool {
    grid.count_occupied(level) == 0
}

/// Classify the level the player has just climbed to.
pub fn classify_advance(next_level: usize) -> Advance {
    match next_level {
        MINOR_PRIZE_LEVEL => Advance::MinorPrizeOffer,
        MAJOR_PRIZE_LEVEL => Advance::MajorPrizeWon,
        _ => Advance::NextLevel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_row(y: usize, cols: &[usize]) -> Grid {
        let mut g = Grid::new();
        for &x in cols {
            g.set(x, y, true);
        }
        g
    }

    #[test]
    fn bounce_at_right_wall() {
        let b = Block { position: 4, width: 3, direction: Direction::Right };
        assert_eq!(bounce(&b), Direction::Left);
    }

    #[test]
    fn bounce_at_left_wall() {
        let b = Block { position: 0, width: 2, direction: Direction::Left };
        assert_eq!(bounce(&b), Direction::Right);
    }

    #[test]
    fn no_bounce_mid_row() {
        let b = Block { position: 2, width: 2, direction: Direction::Left };
        assert_eq!(bounce(&b), Direction::Left);
        let b = Block { position: 0, width: 3, direction: Direction::Right };
        assert_eq!(bounce(&b), Direction::Right);
    }

    #[test]
    fn ground_row_never_overhangs() {
        let g = Grid::new();
        let b = Block { position: 2, width: 3, direction: Direction::Right };
        assert!(overhanging_columns(&g, &b, 0).is_empty());
    }

    #[test]
    fn overhang_against_row_below() {
        let g = grid_with_row(3, &[2, 3, 4]);
        let b = Block { position: 3, width: 3, direction: Direction::Right };
        assert_eq!(overhanging_columns(&g, &b, 4), vec![5]);
    }

    #[test]
    fn full_overlap_has_no_overhang() {
        let g = grid_with_row(6, &[1, 2]);
        let b = Block { position: 1, width: 2, direction: Direction::Left };
        assert!(overhanging_columns(&g, &b, 7).is_empty());
    }

    #[test]
    fn empty_row_is_lost() {
        let g = grid_with_row(5, &[0]);
        assert!(is_lost(&g, 6));
        assert!(!is_lost(&g, 5));
    }

    #[test]
    fn classify_levels() {
        assert_eq!(classify_advance(1), Advance::NextLevel);
        assert_eq!(classify_advance(10), Advance::NextLevel);
        assert_eq!(classify_advance(11), Advance::MinorPrizeOffer);
        assert_eq!(classify_advance(12), Advance::NextLevel);
        assert_eq!(classify_advance(15), Advance::MajorPrizeWon);
    }
}
