//! Scanline flood reveal for minesweeper-style boards.
//!
//! A [`TileGrid`] holds the read-only tile values of a board, a [`RevealState`]
//! tracks which cells the player has already seen, and [`sweep`] reveals the
//! connected empty region around a chosen cell without recursing per cell,
//! reporting each cleared horizontal run as a [`ClearedRange`].

#![no_std]

extern crate alloc;

pub use engine::*;
pub use error::*;
pub use grid::*;
pub use queue::*;
pub use segment::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod grid;
mod queue;
mod segment;
mod tile;
mod types;
