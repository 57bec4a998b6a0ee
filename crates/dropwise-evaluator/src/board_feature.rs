//! Structural features measured on a [`BoardSnapshot`].
//!
//! Settled and provisional cells count alike: the features describe the board
//! as it would look right after the candidate piece lands, before any
//! completed row is removed.

use arrayvec::ArrayVec;
use dropwise_engine::BoardDimensions;

use crate::board_snapshot::BoardSnapshot;

/// The five heuristic features, in weight-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    AggregateHeight,
    CompletedRows,
    Holes,
    Bumpiness,
    Blockades,
}

impl FeatureKind {
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::AggregateHeight,
        Self::CompletedRows,
        Self::Holes,
        Self::Bumpiness,
        Self::Blockades,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AggregateHeight => "height",
            Self::CompletedRows => "lines",
            Self::Holes => "holes",
            Self::Bumpiness => "bumpiness",
            Self::Blockades => "blockades",
        }
    }
}

/// Raw feature values of one snapshot.
///
/// # Raw measurements
///
/// - **aggregate height**: sum over columns of `rows - top`, where `top` is the
///   row of the column's highest occupied cell (0 for an empty column)
/// - **completed rows**: rows with every cell occupied
/// - **holes**: empty cells with at least one occupied cell above them in the
///   same column
/// - **bumpiness**: `Σ |height[x] - height[x + 1]|`
/// - **blockades**: occupied cells whose cell directly below is a hole
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardFeatures {
    pub aggregate_height: u32,
    pub completed_rows: u32,
    pub holes: u32,
    pub bumpiness: u32,
    pub blockades: u32,
}

type ColumnHeights = ArrayVec<u32, { BoardDimensions::MAX_COLUMNS }>;

impl BoardFeatures {
    #[must_use]
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let mut heights = ColumnHeights::new();
        let mut holes = 0;
        let mut blockades = 0;

        for column in 0..snapshot.columns() {
            let mut height = 0;
            let mut covered = false;
            for row in 0..snapshot.rows() {
                let occupied = snapshot.cell(column, row).is_occupied();
                if occupied {
                    if !covered {
                        height = to_u32(snapshot.rows() - row);
                        covered = true;
                    }
                    let below_is_empty =
                        row + 1 < snapshot.rows() && !snapshot.cell(column, row + 1).is_occupied();
                    if below_is_empty {
                        blockades += 1;
                    }
                } else if covered {
                    holes += 1;
                }
            }
            heights.push(height);
        }

        let completed_rows = (0..snapshot.rows())
            .filter(|row| snapshot.row_cells(*row).iter().all(|cell| cell.is_occupied()))
            .count();

        Self {
            aggregate_height: heights.iter().sum(),
            completed_rows: to_u32(completed_rows),
            holes,
            bumpiness: heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum(),
            blockades,
        }
    }

    #[must_use]
    pub fn get(&self, kind: FeatureKind) -> u32 {
        match kind {
            FeatureKind::AggregateHeight => self.aggregate_height,
            FeatureKind::CompletedRows => self.completed_rows,
            FeatureKind::Holes => self.holes,
            FeatureKind::Bumpiness => self.bumpiness,
            FeatureKind::Blockades => self.blockades,
        }
    }

    /// Feature values in weight-vector order.
    #[must_use]
    pub fn to_array(&self) -> [u32; FeatureKind::LEN] {
        FeatureKind::ALL.map(|kind| self.get(kind))
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
