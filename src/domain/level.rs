/// Difficulty schedule: block width and slide speed per level.
///
/// Both tables are indexed by level (= row). Speed is the number of ticks
/// between one-cell slide advances, so smaller is faster.

use super::grid::ROWS;

pub const SPEED_TABLE: [u32; ROWS] = [20, 17, 17, 16, 15, 14, 14, 12, 12, 12, 10, 13, 12, 11, 7];

/// Level reached after clearing row 10; the player may stop here.
pub const MINOR_PRIZE_LEVEL: usize = 11;
/// One past the top row: every row has been filled.
pub const MAJOR_PRIZE_LEVEL: usize = ROWS;

/// Block width at entry to `level`.
pub fn width(level: usize) -> usize {
    debug_assert!(level < ROWS, "level out of range: {level}");
    match level {
        0..=4 => 3,
        5..=7 => 2,
        _ => 1,
    }
}

/// Ticks between slide moves at `level`.
pub fn speed(level: usize) -> u32 {
    SPEED_TABLE[level]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_bands() {
        for level in 0..=4 { assert_eq!(width(level), 3); }
        for level in 5..=7 { assert_eq!(width(level), 2); }
        for level in 8..ROWS { assert_eq!(width(level), 1); }
    }

    #[test]
    fn width_never_increases() {
        for level in 1..ROWS {
            assert!(width(level) <= width(level - 1));
        }
    }

    #[test]
    fn speed_table_matches_schedule() {
        assert_eq!(speed(0), 20);
        assert_eq!(speed(10), 10);
        assert_eq!(speed(11), 13);
        assert_eq!(speed(14), 7);
        assert!(SPEED_TABLE.iter().all(|&s| s > 0));
    }

    #[test]
    fn prize_levels() {
        assert_eq!(MINOR_PRIZE_LEVEL, 11);
        assert_eq!(MAJOR_PRIZE_LEVEL, 15);
    }
}
