use super::{dimensions::BoardDimensions, piece::Piece};

/// Single row of the board as a bitmask.
///
/// Bit `x` is set when column `x` is occupied. Bits at or beyond the board
/// width are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRow {
    bits: u32,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Checks if a cell at the given column is occupied.
    #[inline]
    #[must_use]
    pub const fn is_cell_occupied(self, column: usize) -> bool {
        (self.bits & (1 << column)) != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    fn occupy_cells(&mut self, bits: u32) {
        self.bits |= bits;
    }
}

/// The settled-cell grid.
///
/// Covers the hidden spawn buffer and the visible playfield (see
/// [`BoardDimensions`] for the row layout). Collision checks treat the walls,
/// the floor and the ceiling as solid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: BoardDimensions,
    full_row: u32,
    rows: Vec<BitRow>,
}

impl Board {
    #[must_use]
    pub fn new(dims: BoardDimensions) -> Self {
        let full_row = if dims.columns() == 32 {
            u32::MAX
        } else {
            (1 << dims.columns()) - 1
        };
        Self {
            dims,
            full_row,
            rows: vec![BitRow::EMPTY; dims.total_rows()],
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> &BoardDimensions {
        &self.dims
    }

    #[must_use]
    pub fn row(&self, row: usize) -> BitRow {
        self.rows[row]
    }

    /// Returns an iterator over the visible rows, top to bottom.
    pub fn visible_rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows[self.dims.hidden_rows()..].iter().copied()
    }

    #[must_use]
    pub fn is_cell_occupied(&self, column: usize, row: usize) -> bool {
        self.rows[row].is_cell_occupied(column)
    }

    /// Checks that every cell of `piece` lies inside the board and is empty.
    #[must_use]
    pub fn is_legal_placement(&self, piece: Piece) -> bool {
        let row0 = i64::from(piece.row());
        for (dy, mask) in (0_i64..).zip(piece.mask()) {
            if mask == 0 {
                continue;
            }
            let Some(row) = usize::try_from(row0 + dy)
                .ok()
                .and_then(|y| self.rows.get(y))
            else {
                return false;
            };
            let Some(bits) = self.shift_mask(mask, piece.column()) else {
                return false;
            };
            if row.bits & bits != 0 {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        !self.is_legal_placement(piece)
    }

    /// Returns `piece` moved straight down as far as it legally goes.
    #[must_use]
    pub fn drop_position(&self, piece: Piece) -> Piece {
        let mut piece = piece;
        while self.is_legal_placement(piece.down()) {
            piece = piece.down();
        }
        piece
    }

    /// Moves a box-relative row mask to `column`, or `None` if any cell falls
    /// outside the walls.
    fn shift_mask(&self, mask: u16, column: i32) -> Option<u32> {
        let shift = column.unsigned_abs();
        if mask == 0 {
            return Some(0);
        }
        // Any set bit this far out is past a wall.
        if (column >= 0 && shift >= u32::BITS) || (column < 0 && shift >= u16::BITS) {
            return None;
        }
        let mask = u64::from(mask);
        let shifted = if column >= 0 {
            mask << shift
        } else {
            if mask & ((1 << shift) - 1) != 0 {
                return None;
            }
            mask >> shift
        };
        if shifted & !u64::from(self.full_row) != 0 {
            return None;
        }
        u32::try_from(shifted).ok()
    }

    /// Writes the piece's cells into the settled grid.
    ///
    /// The placement must be legal; cells outside the board are ignored.
    pub fn commit_piece(&mut self, piece: Piece) {
        debug_assert!(self.is_legal_placement(piece), "committing illegal {piece}");
        let row0 = i64::from(piece.row());
        for (dy, mask) in (0_i64..).zip(piece.mask()) {
            let y = row0 + dy;
            let (Ok(y), Some(bits)) = (usize::try_from(y), self.shift_mask(mask, piece.column()))
            else {
                continue;
            };
            if let Some(row) = self.rows.get_mut(y) {
                row.occupy_cells(bits);
            }
        }
    }

    /// Clears completed rows and returns how many were cleared.
    ///
    /// Rows above a cleared row shift down; empty rows enter at the top.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].bits == self.full_row {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BitRow::EMPTY);
        count
    }

    /// Checks whether any cell of the spawn-buffer row is occupied.
    #[must_use]
    pub fn is_spawn_buffer_occupied(&self) -> bool {
        !self.rows[self.dims.spawn_buffer_row()].is_empty()
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.rows.fill(BitRow::EMPTY);
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is an occupied cell and `.` an empty one. Every line must be
    /// `dims.columns()` cells wide; the lines fill the bottom rows of the
    /// board, so art shorter than the board leaves the top rows empty.
    #[must_use]
    pub fn from_ascii(dims: BoardDimensions, art: &str) -> Self {
        let mut board = Self::new(dims);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= dims.total_rows(),
            "Art has {} rows, board has {}",
            lines.len(),
            dims.total_rows()
        );
        let offset = dims.total_rows() - lines.len();
        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                dims.columns(),
                "Each row must have exactly {} cells, got {} at row {}",
                dims.columns(),
                cells.len(),
                y
            );
            for (x, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    board.rows[offset + y].occupy_cells(1 << x);
                }
            }
        }
        board
    }

    /// Renders the board as ASCII art (inverse of [`Self::from_ascii`]).
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.dims.columns() + 1));
        for row in &self.rows {
            for x in 0..self.dims.columns() {
                out.push(if row.is_cell_occupied(x) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceKind, PieceRotation};

    fn small_dims() -> BoardDimensions {
        BoardDimensions::new(4, 4, 2).unwrap()
    }

    #[test]
    fn test_initial_board_is_empty() {
        let board = Board::new(BoardDimensions::STANDARD);
        for y in 0..24 {
            for x in 0..10 {
                assert!(!board.is_cell_occupied(x, y), "({x}, {y})");
            }
        }
        assert!(!board.is_spawn_buffer_occupied());
    }

    #[test]
    fn test_walls_floor_and_ceiling_are_solid() {
        let board = Board::new(BoardDimensions::STANDARD);
        let i = Piece::new(PieceKind::I, PieceRotation::default(), 0, 5);
        assert!(board.is_legal_placement(i));
        assert!(!board.is_legal_placement(i.left()));
        assert!(board.is_legal_placement(i.at(6, 5)));
        assert!(!board.is_legal_placement(i.at(7, 5)));

        // Vertical I: cells in box column 2, so box column -2 is the left wall.
        let vertical = Piece::new(PieceKind::I, PieceRotation::new(1).unwrap(), -2, 0);
        assert!(board.is_legal_placement(vertical));
        assert!(!board.is_legal_placement(vertical.left()));
        assert!(!board.is_legal_placement(vertical.at(-2, -1)));
        assert!(board.is_legal_placement(vertical.at(-2, 20)));
        assert!(!board.is_legal_placement(vertical.at(-2, 21)));
    }

    #[test]
    fn test_settled_cells_block_placement() {
        let board = Board::from_ascii(
            small_dims(),
            "
            ....
            ....
            .#..
            ####
            ",
        );
        let o = Piece::new(PieceKind::O, PieceRotation::default(), 0, 2);
        assert!(board.is_legal_placement(o.at(2, 2)));
        assert!(!board.is_legal_placement(o.at(0, 3)));
        assert!(!board.is_legal_placement(o.at(1, 4)));
    }

    #[test]
    fn test_commit_and_clear_rows() {
        let mut board = Board::from_ascii(
            small_dims(),
            "
            ....
            #...
            ##..
            ##..
            ",
        );
        let o = board.drop_position(Piece::new(PieceKind::O, PieceRotation::default(), 2, 0));
        assert_eq!(o.row(), 4);
        board.commit_piece(o);
        assert_eq!(board.clear_completed_rows(), 2);
        assert_eq!(
            board,
            Board::from_ascii(
                small_dims(),
                "
                ....
                ....
                ....
                #...
                ",
            )
        );
    }

    #[test]
    fn test_clear_rows_with_gap_between() {
        let mut board = Board::from_ascii(
            small_dims(),
            "
            ####
            .#..
            ####
            #...
            ",
        );
        assert_eq!(board.clear_completed_rows(), 2);
        assert_eq!(
            board.to_ascii(),
            "....\n....\n....\n....\n.#..\n#...\n"
        );
    }

    #[test]
    fn test_spawn_buffer_row() {
        let dims = small_dims();
        let board = Board::from_ascii(
            dims,
            "
            ..#.
            ....
            ....
            ....
            ....
            ",
        );
        assert!(board.is_spawn_buffer_occupied());
        let mut board = board;
        board.clear();
        assert!(!board.is_spawn_buffer_occupied());
    }

    #[test]
    fn test_full_width_board() {
        let dims = BoardDimensions::new(32, 4, 1).unwrap();
        let mut board = Board::new(dims);
        let i = Piece::new(PieceKind::I, PieceRotation::default(), 28, 3);
        assert!(board.is_legal_placement(i));
        assert!(!board.is_legal_placement(i.right()));
        for column in (0..32).step_by(4) {
            board.commit_piece(i.at(column, 3));
        }
        assert_eq!(board.clear_completed_rows(), 1);
    }

    #[test]
    fn test_far_out_of_range_columns_are_illegal() {
        let board = Board::new(BoardDimensions::STANDARD);
        let t = Piece::new(PieceKind::T, PieceRotation::default(), 0, 5);
        for column in [10, 31, 32, 47, 48, 63, 64, 70, i32::MAX] {
            assert!(!board.is_legal_placement(t.at(column, 5)), "column {column}");
        }
        for column in [-3, -16, -17, -64, -70, i32::MIN] {
            assert!(!board.is_legal_placement(t.at(column, 5)), "column {column}");
        }
        // Vertical I sits in box column 2 only.
        let vertical = Piece::new(PieceKind::I, PieceRotation::new(1).unwrap(), 0, 5);
        for column in [8, 62, 64, i32::MAX, -3, -62, i32::MIN] {
            assert!(!board.is_legal_placement(vertical.at(column, 5)), "column {column}");
        }
        assert!(board.is_legal_placement(vertical.at(-2, 5)));
        assert!(board.is_legal_placement(vertical.at(7, 5)));
    }
}
