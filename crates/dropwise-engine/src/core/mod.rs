pub use self::{board::*, dimensions::*, piece::*};

pub(crate) mod board;
pub(crate) mod dimensions;
pub(crate) mod piece;
