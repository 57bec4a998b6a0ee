/// Points for clearing `cleared_lines` rows with one piece.
///
/// Doubles with every extra row: 1 row is 100 points, 4 rows are 800.
#[must_use]
pub const fn line_clear_points(cleared_lines: usize) -> u64 {
    if cleared_lines == 0 {
        0
    } else {
        50 << cleared_lines
    }
}

/// Game statistics tracking score, cleared rows and piece count.
///
/// # Example
///
/// ```
/// use dropwise_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(0);
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of drops by rows cleared.
    ///
    /// Index `n` counts the drops that cleared exactly `n` rows (0-4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece is locked.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.score += line_clear_points(cleared_lines);
    }

    pub const fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_double_per_row() {
        assert_eq!(
            [0, 1, 2, 3, 4].map(line_clear_points),
            [0, 100, 200, 400, 800]
        );
    }

    #[test]
    fn test_score_accumulates() {
        let mut stats = GameStats::new();
        for lines in [1, 2, 3, 4, 0] {
            stats.complete_piece_drop(lines);
        }
        assert_eq!(stats.score(), 1500);
        assert_eq!(stats.completed_pieces(), 5);
        assert_eq!(stats.total_cleared_lines(), 10);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 1, 1]);

        stats.reset();
        assert_eq!(stats, GameStats::new());
    }
}
