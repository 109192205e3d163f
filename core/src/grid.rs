use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only tile values of one board, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData", into = "BoardData")]
pub struct TileGrid {
    size: Coord2,
    tiles: Array2<TileValue>,
}

/// Serialized form of a [`TileGrid`]: `{ "size": [w, h], "tiles": [...] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct BoardData {
    size: Coord2,
    tiles: Vec<TileValue>,
}

impl TileGrid {
    pub fn new(size: Coord2, values: Vec<TileValue>) -> Result<Self> {
        if values.len() != cell_count(size) as usize {
            return Err(SweepError::InvalidBoardShape);
        }
        if let Some(&bad) = values
            .iter()
            .find(|&&value| value != MINE && !(0..=MAX_BOUNDARY).contains(&value))
        {
            return Err(SweepError::InvalidTileValue(bad));
        }

        let tiles = Array2::from_shape_vec(size.to_nd_index(), values)
            .map_err(|_| SweepError::InvalidBoardShape)?;
        Ok(Self { size, tiles })
    }

    /// Builds a grid from rows listed top to bottom.
    pub fn from_rows<R: AsRef<[TileValue]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != width) {
            return Err(SweepError::InvalidBoardShape);
        }
        let width: Coord = width
            .try_into()
            .map_err(|_| SweepError::InvalidBoardShape)?;
        let height: Coord = rows
            .len()
            .try_into()
            .map_err(|_| SweepError::InvalidBoardShape)?;

        let values = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::new((width, height), values)
    }

    /// Places mines at `mine_coords` and fills every other cell with its adjacent mine count.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            let coords = validate_coords(size, coords)?;
            mine_mask[coords.to_nd_index()] = true;
        }

        let mut tiles: Array2<TileValue> = Array2::zeros(size.to_nd_index());
        for y in 0..size.1 {
            for x in 0..size.0 {
                let coords = (x, y);
                tiles[coords.to_nd_index()] = if mine_mask[coords.to_nd_index()] {
                    MINE
                } else {
                    // at most 8 neighbours
                    neighbors(coords, size)
                        .filter(|&pos| mine_mask[pos.to_nd_index()])
                        .count() as TileValue
                };
            }
        }

        Ok(Self { size, tiles })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn cell_count(&self) -> CellCount {
        cell_count(self.size)
    }

    pub fn mine_count(&self) -> CellCount {
        self.tiles.iter().filter(|&&value| is_mine(value)).count() as CellCount
    }

    pub fn value_at(&self, coords: Coord2) -> Result<TileValue> {
        let coords = validate_coords(self.size, coords)?;
        Ok(self[coords])
    }

    pub fn value_at_offset(&self, offset: usize) -> Result<TileValue> {
        let coords = position(self.size, offset)?;
        Ok(self[coords])
    }

    pub fn kind_at(&self, coords: Coord2) -> Result<TileKind> {
        self.value_at(coords).map(TileKind::classify)
    }

    /// Whether every non-mine tile equals the number of mines around it.
    pub fn is_consistent(&self) -> bool {
        (0..self.size.1)
            .flat_map(|y| (0..self.size.0).map(move |x| (x, y)))
            .all(|coords| {
                let value = self[coords];
                is_mine(value)
                    || neighbors(coords, self.size)
                        .filter(|&pos| is_mine(self[pos]))
                        .count()
                        == value as usize
            })
    }
}

impl Index<Coord2> for TileGrid {
    type Output = TileValue;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}

impl TryFrom<BoardData> for TileGrid {
    type Error = SweepError;

    fn try_from(data: BoardData) -> Result<Self> {
        Self::new(data.size, data.tiles)
    }
}

impl From<TileGrid> for BoardData {
    fn from(grid: TileGrid) -> Self {
        Self {
            size: grid.size,
            tiles: grid.tiles.iter().copied().collect(),
        }
    }
}

/// Reveal bookkeeping owned by a game session, addressed by linear offset.
pub trait RevealState {
    fn is_revealed(&self, offset: usize) -> bool;

    /// Marks the cell as revealed, returning whether it was hidden before.
    fn reveal(&mut self, offset: usize) -> bool;
}

/// In-memory [`RevealState`] for one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaskData", into = "MaskData")]
pub struct RevealMask {
    size: Coord2,
    cells: Array2<bool>,
    revealed_count: CellCount,
}

impl RevealMask {
    pub fn new(size: Coord2) -> Self {
        Self {
            size,
            cells: Array2::default(size.to_nd_index()),
            revealed_count: 0,
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn is_revealed_at(&self, coords: Coord2) -> Result<bool> {
        let coords = validate_coords(self.size, coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Hides every cell again, for starting a new game on the same board size.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.revealed_count = 0;
    }
}

/// Serialized form of a [`RevealMask`]: `{ "size": [w, h], "revealed": [...] }`, row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct MaskData {
    size: Coord2,
    revealed: Vec<bool>,
}

impl TryFrom<MaskData> for RevealMask {
    type Error = SweepError;

    fn try_from(data: MaskData) -> Result<Self> {
        if data.revealed.len() != cell_count(data.size) as usize {
            return Err(SweepError::InvalidBoardShape);
        }
        let revealed_count = data.revealed.iter().filter(|&&cell| cell).count() as CellCount;
        let cells = Array2::from_shape_vec(data.size.to_nd_index(), data.revealed)
            .map_err(|_| SweepError::InvalidBoardShape)?;

        Ok(Self {
            size: data.size,
            cells,
            revealed_count,
        })
    }
}

impl From<RevealMask> for MaskData {
    fn from(mask: RevealMask) -> Self {
        Self {
            size: mask.size,
            revealed: mask.cells.iter().copied().collect(),
        }
    }
}

impl RevealState for RevealMask {
    fn is_revealed(&self, offset: usize) -> bool {
        match position(self.size, offset) {
            Ok(coords) => self.cells[coords.to_nd_index()],
            Err(_) => {
                debug_assert!(false, "offset {offset} is off a {:?} board", self.size);
                false
            }
        }
    }

    fn reveal(&mut self, offset: usize) -> bool {
        let Ok(coords) = position(self.size, offset) else {
            debug_assert!(false, "offset {offset} is off a {:?} board", self.size);
            return false;
        };
        let cell = &mut self.cells[coords.to_nd_index()];
        if *cell {
            return false;
        }
        *cell = true;
        self.revealed_count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_mine_coords_counts_neighbors() {
        let grid = TileGrid::from_mine_coords((3, 3), &[(1, 1)]).unwrap();

        assert_eq!(grid.value_at((1, 1)), Ok(MINE));
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    assert_eq!(grid.value_at((x, y)), Ok(1));
                }
            }
        }
        assert_eq!(grid.mine_count(), 1);
        assert!(grid.is_consistent());
    }

    #[test]
    fn from_mine_coords_rejects_off_board_mine() {
        assert_eq!(
            TileGrid::from_mine_coords((2, 2), &[(2, 0)]),
            Err(SweepError::OutOfBounds)
        );
    }

    #[test]
    fn new_validates_shape_and_values() {
        assert_eq!(
            TileGrid::new((2, 2), vec![0, 0, 0]),
            Err(SweepError::InvalidBoardShape)
        );
        assert_eq!(
            TileGrid::new((2, 1), vec![0, 9]),
            Err(SweepError::InvalidTileValue(9))
        );
        assert_eq!(
            TileGrid::new((2, 1), vec![-3, 0]),
            Err(SweepError::InvalidTileValue(-3))
        );
        assert!(TileGrid::new((0, 0), vec![]).is_ok());
    }

    #[test]
    fn from_rows_is_row_major() {
        let grid = TileGrid::from_rows(&[[0, 1, MINE], [0, 1, 1]]).unwrap();

        assert_eq!(grid.size(), (3, 2));
        assert_eq!(grid.value_at((2, 0)), Ok(MINE));
        assert_eq!(grid.value_at_offset(2), Ok(MINE));
        assert_eq!(grid.value_at_offset(4), Ok(1));
        assert_eq!(grid.value_at_offset(6), Err(SweepError::OutOfBounds));
        assert_eq!(grid.kind_at((0, 1)), Ok(TileKind::Empty));

        let ragged: [&[TileValue]; 2] = [&[0, 0], &[0]];
        assert_eq!(
            TileGrid::from_rows(&ragged),
            Err(SweepError::InvalidBoardShape)
        );
    }

    #[test]
    fn inconsistent_counts_are_detected() {
        let grid = TileGrid::from_rows(&[[0, MINE]]).unwrap();
        assert!(!grid.is_consistent());
    }

    #[test]
    fn json_board_round_trips_through_validation() {
        let grid = TileGrid::from_mine_coords((3, 2), &[(0, 0)]).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"{"size":[3,2],"tiles":[-1,1,0,1,1,0]}"#);
        assert_eq!(serde_json::from_str::<TileGrid>(&json).unwrap(), grid);

        let short = r#"{"size":[3,2],"tiles":[0,0]}"#;
        assert!(serde_json::from_str::<TileGrid>(short).is_err());
    }

    #[test]
    fn reveal_mask_reveals_once() {
        let mut mask = RevealMask::new((2, 2));

        assert!(!mask.is_revealed(3));
        assert!(mask.reveal(3));
        assert!(!mask.reveal(3));
        assert!(mask.is_revealed(3));
        assert_eq!(mask.is_revealed_at((1, 1)), Ok(true));
        assert_eq!(mask.revealed_count(), 1);

        assert_eq!(mask.is_revealed_at((2, 0)), Err(SweepError::OutOfBounds));

        mask.clear();
        assert_eq!(mask.revealed_count(), 0);
        assert!(!mask.is_revealed(3));
    }

    #[test]
    fn reveal_mask_json_round_trips() {
        let mut mask = RevealMask::new((3, 2));
        mask.reveal(1);
        mask.reveal(5);

        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(
            json,
            r#"{"size":[3,2],"revealed":[false,true,false,false,false,true]}"#
        );

        let restored: RevealMask = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, mask);
        assert_eq!(restored.revealed_count(), 2);
        assert_eq!(restored.is_revealed_at((2, 1)), Ok(true));
    }

    #[test]
    fn reveal_mask_rejects_mismatched_shape() {
        let short = r#"{"size":[5,5],"revealed":[false]}"#;
        assert!(serde_json::from_str::<RevealMask>(short).is_err());

        let data = MaskData {
            size: (5, 5),
            revealed: vec![false],
        };
        assert_eq!(
            RevealMask::try_from(data),
            Err(SweepError::InvalidBoardShape)
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is off a")]
    fn reveal_mask_flags_offsets_past_the_board() {
        let mut mask = RevealMask::new((2, 2));
        mask.reveal(4);
    }
}
