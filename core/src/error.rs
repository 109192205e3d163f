use thiserror::Error;

use crate::TileValue;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SweepError {
    #[error("Position is outside the board")]
    OutOfBounds,
    #[error("Segment does not fit on its row")]
    InvalidSegment,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid tile value {0}")]
    InvalidTileValue(TileValue),
}

pub type Result<T> = core::result::Result<T, SweepError>;
