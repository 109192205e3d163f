use serde::{Deserialize, Serialize};

/// Raw tile value as produced by a board generator.
pub type TileValue = i8;

/// Sentinel value marking a mine.
pub const MINE: TileValue = -1;

/// Largest possible adjacent-mine count.
pub const MAX_BOUNDARY: TileValue = 8;

pub const fn is_mine(value: TileValue) -> bool {
    value < 0
}

/// Empty tiles are traversed by a sweep.
pub const fn is_empty(value: TileValue) -> bool {
    value == 0
}

/// Boundary tiles are revealed but never expanded past.
pub const fn is_boundary(value: TileValue) -> bool {
    value > 0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Mine,
    Empty,
    Boundary(u8),
}

impl TileKind {
    pub const fn classify(value: TileValue) -> Self {
        if is_mine(value) {
            Self::Mine
        } else if is_empty(value) {
            Self::Empty
        } else {
            Self::Boundary(value as u8)
        }
    }

    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Empty)
    }
}
