//! Placement search: choosing where the live piece should land.
//!
//! The search is exhaustive and looks one piece ahead. For every rotation it
//! starts from the piece's current position (pushed inside the board with the
//! rotation's insets), slides as far left as legal, steps one further left and
//! then walks right one column at a time. Each column reached is a candidate:
//! the piece is dropped straight down, its landing cells are marked on a
//! freshly rebuilt [`BoardSnapshot`] and the snapshot is scored.
//!
//! A candidate replaces the best one only if its score is strictly greater, so
//! among equal scores the first found wins: lowest rotation, then leftmost
//! column.
//!
//! # Usage
//!
//! ```
//! use dropwise_engine::{Board, BoardDimensions, Piece, PieceKind};
//! use dropwise_evaluator::{placement_search::PlacementSearch, weights::WeightVector};
//!
//! let board = Board::new(BoardDimensions::STANDARD);
//! let piece = Piece::spawn(PieceKind::T, board.dimensions());
//!
//! let mut search = PlacementSearch::new(&board);
//! let best = search
//!     .search(piece, &board, &WeightVector::HAND_TUNED)
//!     .unwrap()
//!     .expect("an empty board always has room");
//! assert!(board.is_legal_placement(best.landing_piece()));
//! ```

use dropwise_engine::{Board, Piece, PieceRotation};

use crate::{
    board_snapshot::{BoardSnapshot, SnapshotDimensionMismatch},
    weights::{self, WeightVector},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SearchError {
    #[display("snapshot does not match the board: {_0}")]
    SnapshotDimensionMismatch(SnapshotDimensionMismatch),
}

/// The winning candidate of a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestPlacement {
    /// The piece at the search row, turned and shifted to the chosen column.
    piece: Piece,
    landing_row: i32,
    score: f64,
}

impl BestPlacement {
    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.piece.rotation()
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.piece.column()
    }

    /// Row of the piece's bounding box after the simulated drop.
    #[must_use]
    pub fn landing_row(&self) -> i32 {
        self.landing_row
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The piece at its final resting position.
    #[must_use]
    pub fn landing_piece(&self) -> Piece {
        self.piece.at(self.piece.column(), self.landing_row)
    }
}

/// Exhaustive one-piece placement search.
///
/// Holds the scratch snapshot reused by every candidate; no other state
/// survives between searches.
#[derive(Debug, Clone)]
pub struct PlacementSearch {
    snapshot: BoardSnapshot,
}

impl PlacementSearch {
    /// Creates a search whose snapshot fits `board`'s playfield.
    #[must_use]
    pub fn new(board: &Board) -> Self {
        Self {
            snapshot: BoardSnapshot::for_board(board),
        }
    }

    /// Finds the best placement for `piece` on `board`.
    ///
    /// Returns `Ok(None)` when no rotation has a legal column, which the
    /// caller treats as game over. Fails if `board` is not the size this
    /// search was created for.
    pub fn search(
        &mut self,
        piece: Piece,
        board: &Board,
        weights: &WeightVector,
    ) -> Result<Option<BestPlacement>, SearchError> {
        let dims = *board.dimensions();
        self.snapshot.rebuild_from(board)?;
        let mut best: Option<BestPlacement> = None;

        for rotation in PieceRotation::ALL {
            let mut cursor = piece.rotated_within_bounds(rotation, &dims);
            while board.is_legal_placement(cursor.left()) {
                cursor = cursor.left();
            }
            cursor = cursor.left();

            while board.is_legal_placement(cursor.right()) {
                cursor = cursor.right();

                self.snapshot.rebuild_from(board)?;
                let landing = board.drop_position(cursor);
                self.snapshot.mark_provisional(landing);
                let score = weights::score(&self.snapshot, weights);
                log::trace!(
                    "candidate rotation={rotation} column={} landing_row={} score={score}",
                    cursor.column(),
                    landing.row()
                );

                if best.is_none_or(|best| score > best.score) {
                    best = Some(BestPlacement {
                        piece: cursor,
                        landing_row: landing.row(),
                        score,
                    });
                }
            }
        }

        if let Some(best) = &best {
            log::debug!(
                "best placement for {}: rotation={} column={} score={}",
                piece.kind(),
                best.rotation(),
                best.column(),
                best.score
            );
        } else {
            log::debug!("no legal placement for {piece}");
        }
        Ok(best)
    }
}
