//! Search-local copy of the visible playfield.
//!
//! A [`BoardSnapshot`] is a `columns × visible_rows` grid of [`CellTag`]s. The
//! placement search rebuilds it from the authoritative [`Board`] before every
//! candidate and marks the candidate's landing cells as provisional, so the
//! heuristic sees the board as it would be after the drop without the board
//! ever being touched.
//!
//! The grid is allocated once and reused for every rebuild.

use dropwise_engine::{Board, Piece};

/// State of one snapshot cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CellTag {
    #[default]
    Empty,
    /// Occupied on the board.
    Settled,
    /// Occupied by the candidate piece at its landing position.
    Provisional,
}

impl CellTag {
    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }
}

/// Board layout the snapshot and a board disagree on.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "snapshot is {snapshot_columns}x{snapshot_rows} with {snapshot_hidden_rows} hidden rows but the board is {board_columns}x{board_rows} with {board_hidden_rows} hidden rows"
)]
pub struct SnapshotDimensionMismatch {
    pub snapshot_columns: usize,
    pub snapshot_rows: usize,
    pub snapshot_hidden_rows: usize,
    pub board_columns: usize,
    pub board_rows: usize,
    pub board_hidden_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    columns: usize,
    rows: usize,
    hidden_rows: usize,
    cells: Vec<CellTag>,
}

impl BoardSnapshot {
    /// Creates an empty snapshot sized for `board`'s visible playfield.
    #[must_use]
    pub fn for_board(board: &Board) -> Self {
        let dims = board.dimensions();
        let mut snapshot = Self {
            columns: dims.columns(),
            rows: dims.visible_rows(),
            hidden_rows: dims.hidden_rows(),
            cells: vec![CellTag::Empty; dims.columns() * dims.visible_rows()],
        };
        snapshot.copy_settled(board);
        snapshot
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the tag at `(column, row)`, row 0 being the top visible row.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> CellTag {
        self.cells[row * self.columns + column]
    }

    #[must_use]
    pub fn row_cells(&self, row: usize) -> &[CellTag] {
        &self.cells[row * self.columns..(row + 1) * self.columns]
    }

    /// Overwrites every cell with the board's settled cells.
    ///
    /// Fails without touching the grid if the board's visible playfield or
    /// hidden buffer is not the size this snapshot was built for.
    pub fn rebuild_from(&mut self, board: &Board) -> Result<(), SnapshotDimensionMismatch> {
        let dims = board.dimensions();
        if dims.columns() != self.columns
            || dims.visible_rows() != self.rows
            || dims.hidden_rows() != self.hidden_rows
        {
            return Err(SnapshotDimensionMismatch {
                snapshot_columns: self.columns,
                snapshot_rows: self.rows,
                snapshot_hidden_rows: self.hidden_rows,
                board_columns: dims.columns(),
                board_rows: dims.visible_rows(),
                board_hidden_rows: dims.hidden_rows(),
            });
        }
        self.copy_settled(board);
        Ok(())
    }

    fn copy_settled(&mut self, board: &Board) {
        for (row, bits) in board.visible_rows().enumerate() {
            let cells = &mut self.cells[row * self.columns..(row + 1) * self.columns];
            for (column, cell) in cells.iter_mut().enumerate() {
                *cell = if bits.is_cell_occupied(column) {
                    CellTag::Settled
                } else {
                    CellTag::Empty
                };
            }
        }
    }

    /// Marks the cells of `piece` (in board coordinates) as provisional.
    ///
    /// Cells in the hidden rows are outside the snapshot and are skipped.
    pub fn mark_provisional(&mut self, piece: Piece) {
        for (column, row) in piece.occupied_cells() {
            let Ok(column) = usize::try_from(column) else {
                continue;
            };
            let Some(row) = usize::try_from(row)
                .ok()
                .and_then(|row| row.checked_sub(self.hidden_rows))
            else {
                continue;
            };
            if column < self.columns && row < self.rows {
                self.cells[row * self.columns + column] = CellTag::Provisional;
            }
        }
    }

    /// Renders the snapshot as ASCII art: `#` settled, `*` provisional, `.` empty.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.columns + 1));
        for row in 0..self.rows {
            for cell in self.row_cells(row) {
                out.push(match cell {
                    CellTag::Empty => '.',
                    CellTag::Settled => '#',
                    CellTag::Provisional => '*',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use dropwise_engine::{BoardDimensions, PieceKind, PieceRotation};

    use super::*;

    fn dims() -> BoardDimensions {
        BoardDimensions::new(4, 3, 2).unwrap()
    }

    #[test]
    fn test_snapshot_copies_visible_rows_only() {
        let board = Board::from_ascii(
            dims(),
            "
            #...
            ....
            .#..
            ##.#
            ",
        );
        let snapshot = BoardSnapshot::for_board(&board);
        assert_eq!(snapshot.to_ascii(), "....\n.#..\n##.#\n");
    }

    #[test]
    fn test_mark_provisional_and_rebuild() {
        let board = Board::from_ascii(dims(), "....\n....\n##.#\n");
        let mut snapshot = BoardSnapshot::for_board(&board);

        // Vertical I in column 2 spanning the bottom hidden row and the visible rows.
        let piece = Piece::new(PieceKind::I, PieceRotation::new(1).unwrap(), 0, 1);
        snapshot.mark_provisional(piece);
        assert_eq!(snapshot.to_ascii(), "..*.\n..*.\n##*#\n");
        assert!(snapshot.cell(2, 2).is_provisional());

        snapshot.rebuild_from(&board).unwrap();
        assert_eq!(snapshot, BoardSnapshot::for_board(&board));
    }

    #[test]
    fn test_rebuild_rejects_other_dimensions() {
        let board = Board::new(dims());
        let mut snapshot = BoardSnapshot::for_board(&board);
        let other = Board::new(BoardDimensions::new(5, 3, 2).unwrap());
        let err = snapshot.rebuild_from(&other).unwrap_err();
        assert_eq!(err.board_columns, 5);
        assert_eq!(err.snapshot_columns, 4);
    }

    #[test]
    fn test_rebuild_rejects_other_hidden_rows() {
        let mut snapshot = BoardSnapshot::for_board(&Board::new(dims()));
        let other = Board::new(BoardDimensions::new(4, 3, 3).unwrap());
        let err = snapshot.rebuild_from(&other).unwrap_err();
        assert_eq!(err.snapshot_hidden_rows, 2);
        assert_eq!(err.board_hidden_rows, 3);
        assert_eq!(
            err.to_string(),
            "snapshot is 4x3 with 2 hidden rows but the board is 4x3 with 3 hidden rows"
        );
    }
}
