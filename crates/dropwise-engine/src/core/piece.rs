use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::dimensions::BoardDimensions;

/// A piece (tetromino) at a specific location and orientation.
///
/// The position is the top-left corner of the piece's square bounding box in
/// board coordinates (column to the right, row downward, row 0 at the top of
/// the hidden spawn buffer). It may be negative when the bounding box has
/// empty columns or rows on its left or top side.
///
/// Pieces are immutable values: movement and rotation return new `Piece`s.
///
/// # Example
///
/// ```
/// use dropwise_engine::{BoardDimensions, Piece, PieceKind, PieceRotation};
///
/// let piece = Piece::spawn(PieceKind::T, &BoardDimensions::STANDARD);
/// let moved = piece.right().with_rotation(PieceRotation::new(1).unwrap());
/// assert_eq!(moved.column(), piece.column() + 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{kind}#{rotation}@{column},{row}")]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    column: i32,
    row: i32,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, rotation: PieceRotation, column: i32, row: i32) -> Self {
        Self {
            kind,
            rotation,
            column,
            row,
        }
    }

    /// Creates a piece at its spawn position with rotation 0.
    #[must_use]
    pub fn spawn(kind: PieceKind, dims: &BoardDimensions) -> Self {
        Self::new(
            kind,
            PieceRotation::default(),
            kind.spawn_column(dims),
            kind.spawn_row(),
        )
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn mask(&self) -> PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Iterates over the board cells `(column, row)` covered by this piece.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (self.column + dx, self.row + dy))
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.at(self.column - 1, self.row)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.at(self.column + 1, self.row)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.at(self.column, self.row + 1)
    }

    #[must_use]
    pub const fn at(&self, column: i32, row: i32) -> Self {
        Self::new(self.kind, self.rotation, column, row)
    }

    #[must_use]
    pub const fn with_rotation(&self, rotation: PieceRotation) -> Self {
        Self::new(self.kind, rotation, self.column, self.row)
    }

    /// Returns this piece in `rotation`, shifted away from the walls and the
    /// floor/ceiling so that its occupied cells stay inside the board.
    ///
    /// The returned piece is only bounded, it may still overlap settled cells.
    #[must_use]
    pub fn rotated_within_bounds(&self, rotation: PieceRotation, dims: &BoardDimensions) -> Self {
        let insets = self.kind.insets(rotation);
        let dimension = self.kind.dimension_i32();
        let min_column = -insets.left;
        let max_column = to_i32(dims.columns()) - dimension + insets.right;
        let min_row = -insets.top;
        let max_row = to_i32(dims.total_rows()) - dimension + insets.bottom;
        Self::new(
            self.kind,
            rotation,
            self.column.clamp(min_column, max_column),
            self.row.clamp(min_row, max_row),
        )
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
#[display("{_0}")]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value < 4 { Some(Self(value)) } else { None }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Number of empty columns/rows between each side of a piece's bounding box
/// and its nearest occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceInsets {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Side length of the piece's square bounding box.
    #[must_use]
    pub const fn dimension(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    fn dimension_i32(self) -> i32 {
        to_i32(self.dimension())
    }

    #[must_use]
    pub fn mask(self, rotation: PieceRotation) -> PieceMask {
        PIECE_MASKS[self as usize][rotation.as_usize()]
    }

    /// Returns an iterator of `(dx, dy)` offsets of occupied cells within the bounding box.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        let mask = self.mask(rotation);
        (0..4).flat_map(move |dy| {
            (0..4).filter_map(move |dx| {
                (mask[dy] & (1 << dx) != 0).then(|| (to_i32(dx), to_i32(dy)))
            })
        })
    }

    #[must_use]
    pub fn insets(self, rotation: PieceRotation) -> PieceInsets {
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        let mut min_y = i32::MAX;
        let mut max_y = i32::MIN;
        for (x, y) in self.occupied_offsets(rotation) {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        let last = self.dimension_i32() - 1;
        PieceInsets {
            left: min_x,
            right: last - max_x,
            top: min_y,
            bottom: last - max_y,
        }
    }

    /// Bounding-box column the piece spawns at (centred on the board).
    #[must_use]
    pub fn spawn_column(self, dims: &BoardDimensions) -> i32 {
        to_i32(dims.columns() / 2) - to_i32(self.dimension() / 2)
    }

    /// Bounding-box row the piece spawns at: its topmost cell sits on row 0.
    #[must_use]
    pub fn spawn_row(self) -> i32 {
        -self.insets(PieceRotation::default()).top
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropwise_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Occupancy of a piece within its bounding box, one `u16` per row.
///
/// Bit `x` of row `y` is set when cell `(x, y)` of the box is occupied.
pub type PieceMask = [u16; 4];

/// Generates all 4 rotation states of a piece mask by rotating 90° clockwise.
///
/// # Arguments
///
/// * `size` - Bounding box size (3 for most pieces, 4 for I, 2 for O)
/// * `mask` - Initial piece mask at 0° rotation
const fn mask_rotations(size: usize, mask: PieceMask) -> [PieceMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_mask = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (rotates[i - 1][size - 1 - x] & (1 << y)) != 0 {
                    new_mask[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_mask;
        i += 1;
    }
    rotates
}

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u16 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u16 = m([E; 4]);

    [
        // I-piece
        mask_rotations(4, [EEEE, m([C, C, C, C]), EEEE, EEEE]),
        // O-piece
        mask_rotations(2, [m([C, C, E, E]), m([C, C, E, E]), EEEE, EEEE]),
        // S-piece
        mask_rotations(3, [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE]),
        // Z-piece
        mask_rotations(3, [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE]),
        // J-piece
        mask_rotations(3, [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // L-piece
        mask_rotations(3, [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE]),
        // T-piece
        mask_rotations(3, [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in PieceRotation::ALL {
                assert_eq!(kind.occupied_offsets(rotation).count(), 4, "{kind}#{rotation}");
            }
        }
    }

    #[test]
    fn test_i_piece_insets() {
        let horizontal = PieceKind::I.insets(PieceRotation(0));
        assert_eq!(
            horizontal,
            PieceInsets {
                left: 0,
                right: 0,
                top: 1,
                bottom: 2
            }
        );
        let vertical = PieceKind::I.insets(PieceRotation(1));
        assert_eq!(
            vertical,
            PieceInsets {
                left: 2,
                right: 1,
                top: 0,
                bottom: 0
            }
        );
    }

    #[test]
    fn test_s_piece_rotations() {
        let offsets = |r| {
            let mut v: Vec<_> = PieceKind::S.occupied_offsets(PieceRotation(r)).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(offsets(0), vec![(0, 1), (1, 0), (1, 1), (2, 0)]);
        assert_eq!(offsets(1), vec![(1, 0), (1, 1), (2, 1), (2, 2)]);
        assert_eq!(offsets(2), vec![(0, 2), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_spawn_position_is_centered_on_top_row() {
        let dims = BoardDimensions::STANDARD;
        let i = Piece::spawn(PieceKind::I, &dims);
        assert_eq!((i.column(), i.row()), (3, -1));
        assert!(i.occupied_cells().all(|(_, row)| row == 0));

        let t = Piece::spawn(PieceKind::T, &dims);
        assert_eq!((t.column(), t.row()), (4, 0));
        let o = Piece::spawn(PieceKind::O, &dims);
        assert_eq!((o.column(), o.row()), (4, 0));
    }

    #[test]
    fn test_rotated_within_bounds_pushes_off_walls() {
        let dims = BoardDimensions::STANDARD;
        // Vertical I hugging the left wall: its cells sit in box column 2.
        let piece = Piece::new(PieceKind::I, PieceRotation(1), -2, 5);
        let rotated = piece.rotated_within_bounds(PieceRotation(0), &dims);
        assert_eq!(rotated.column(), 0);
        assert!(rotated.occupied_cells().all(|(c, _)| (0..10).contains(&c)));

        let piece = Piece::new(PieceKind::I, PieceRotation(1), 7, 5);
        let rotated = piece.rotated_within_bounds(PieceRotation(2), &dims);
        assert_eq!(rotated.column(), 6);
        assert!(rotated.occupied_cells().all(|(c, _)| (0..10).contains(&c)));
    }

    #[test]
    fn test_piece_display() {
        let piece = Piece::new(PieceKind::S, PieceRotation(1), -1, 18);
        assert_eq!(piece.to_string(), "S#1@-1,18");
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
    }
}
