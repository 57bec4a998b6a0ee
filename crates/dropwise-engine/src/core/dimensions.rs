use serde::{Deserialize, Serialize};

use crate::DimensionsError;

/// Size of the playfield.
///
/// Rows are numbered from the top of the hidden spawn buffer: rows
/// `0..hidden_rows` are the buffer, rows `hidden_rows..total_rows()` are the
/// visible playfield. The last buffer row (directly above the visible area) is
/// the spawn-buffer row checked for top-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions", into = "RawDimensions")]
pub struct BoardDimensions {
    columns: usize,
    visible_rows: usize,
    hidden_rows: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawDimensions {
    columns: usize,
    visible_rows: usize,
    hidden_rows: usize,
}

impl TryFrom<RawDimensions> for BoardDimensions {
    type Error = DimensionsError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.columns, raw.visible_rows, raw.hidden_rows)
    }
}

impl From<BoardDimensions> for RawDimensions {
    fn from(dims: BoardDimensions) -> Self {
        Self {
            columns: dims.columns,
            visible_rows: dims.visible_rows,
            hidden_rows: dims.hidden_rows,
        }
    }
}

impl Default for BoardDimensions {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BoardDimensions {
    /// Widest playfield a bit row can hold.
    pub const MAX_COLUMNS: usize = 32;

    /// 10 columns, 20 visible rows and a 4-row spawn buffer.
    pub const STANDARD: Self = Self {
        columns: 10,
        visible_rows: 20,
        hidden_rows: 4,
    };

    pub fn new(
        columns: usize,
        visible_rows: usize,
        hidden_rows: usize,
    ) -> Result<Self, DimensionsError> {
        if columns == 0 || visible_rows == 0 || hidden_rows == 0 {
            return Err(DimensionsError::Empty);
        }
        if columns > Self::MAX_COLUMNS {
            return Err(DimensionsError::TooWide {
                columns,
                max: Self::MAX_COLUMNS,
            });
        }
        Ok(Self {
            columns,
            visible_rows,
            hidden_rows,
        })
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    #[must_use]
    pub const fn hidden_rows(&self) -> usize {
        self.hidden_rows
    }

    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.visible_rows + self.hidden_rows
    }

    /// Row index of the spawn-buffer row (the row just above the visible playfield).
    #[must_use]
    pub const fn spawn_buffer_row(&self) -> usize {
        self.hidden_rows - 1
    }
}
