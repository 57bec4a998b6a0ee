pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or its walls")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DimensionsError {
    #[display("playfield must have at least one column, one visible row and one hidden row")]
    Empty,
    #[display("playfield is {columns} columns wide, at most {max} are supported")]
    TooWide { columns: usize, max: usize },
}
