use crate::*;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for total-cell counts and reveal tallies.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`, also used for a board size `(width, height)`.
pub type Coord2 = (Coord, Coord);

/// Converts a position into an `ndarray` index, or a board size into an array shape.
///
/// Boards are stored as `(height, width)` arrays in standard layout so that the
/// flat slice of an array lines up with [`offset`].
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn cell_count((width, height): Coord2) -> CellCount {
    let a = width as CellCount;
    let b = height as CellCount;
    a.saturating_mul(b)
}

pub fn validate_coords(size: Coord2, coords: Coord2) -> Result<Coord2> {
    if coords.0 < size.0 && coords.1 < size.1 {
        Ok(coords)
    } else {
        Err(SweepError::OutOfBounds)
    }
}

/// Row-major linear offset of `coords` on a board of `size`.
pub fn offset(size: Coord2, coords: Coord2) -> Result<usize> {
    let (x, y) = validate_coords(size, coords)?;
    Ok(usize::from(y) * usize::from(size.0) + usize::from(x))
}

/// Inverse of [`offset`].
pub fn position(size: Coord2, offset: usize) -> Result<Coord2> {
    if offset >= cell_count(size) as usize {
        return Err(SweepError::OutOfBounds);
    }
    let width = usize::from(size.0);
    let x = (offset % width).try_into().map_err(|_| SweepError::OutOfBounds)?;
    let y = (offset / width).try_into().map_err(|_| SweepError::OutOfBounds)?;
    Ok((x, y))
}

/// The up-to-8 in-bounds cells around `center` on a board of `size`, row by row.
pub fn neighbors(center: Coord2, size: Coord2) -> impl Iterator<Item = Coord2> + use<> {
    let (x, y) = center;
    let columns = x.saturating_sub(1)..x.saturating_add(2).min(size.0);
    let rows = y.saturating_sub(1)..y.saturating_add(2).min(size.1);

    rows.flat_map(move |ny| columns.clone().map(move |nx| (nx, ny)))
        .filter(move |&coords| coords != center)
}
