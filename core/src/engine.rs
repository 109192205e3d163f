use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use web_time::Instant;

use crate::*;

/// Lifecycle of a single sweep.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepState {
    NotStarted,
    Draining,
    Done,
}

impl Default for SweepState {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The start cell was already revealed.
    NoChange,
    Revealed,
    /// The start cell holds a mine, nothing was revealed.
    HitMine,
}

impl SweepOutcome {
    pub const fn has_update(self) -> bool {
        use SweepOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Counters are wider than [`CellCount`]: a sweep may pop several segments per cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStats {
    /// Segments that revealed at least one cell.
    pub segments_processed: u64,
    /// Segments popped with nothing left to reveal in their span.
    pub segments_discarded: u64,
    pub ranges_reported: u64,
    pub cells_revealed: u64,
}

/// Reveals the empty region around `start`, see [`Sweeper::run`].
pub fn sweep<S, K>(
    tiles: &TileGrid,
    start: Coord2,
    revealed: &mut S,
    sink: &mut K,
) -> Result<SweepOutcome>
where
    S: RevealState + ?Sized,
    K: RangeSink + ?Sized,
{
    Sweeper::new().run(tiles, start, revealed, sink)
}

/// Scanline flood reveal driven by an explicit work queue.
///
/// Each popped [`Segment`] is walked left to right; every hidden, non-mine cell
/// in it seeds a run that is widened across empty tiles up to and including the
/// first boundary tile or the board edge. A run's empty cells then spawn
/// segments on the neighbouring rows: the part lying under the popped segment
/// only continues in the segment's [`Feed`] direction, while the parts that
/// stick out past it are offered to both rows.
///
/// A sweeper can be reused across sweeps to keep its queue allocation.
#[derive(Clone, Debug, Default)]
pub struct Sweeper {
    queue: PendingQueue,
    state: SweepState,
    stats: SweepStats,
}

impl Sweeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Counters of the last sweep.
    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Sweeps from `start`, marking cells through `revealed` and reporting every
    /// finalized run to `sink`.
    ///
    /// Fails with [`SweepError::OutOfBounds`] when `start` is off the board. A
    /// start that is already revealed changes nothing; a start on a mine
    /// reveals nothing and yields [`SweepOutcome::HitMine`].
    pub fn run<S, K>(
        &mut self,
        tiles: &TileGrid,
        start: Coord2,
        revealed: &mut S,
        sink: &mut K,
    ) -> Result<SweepOutcome>
    where
        S: RevealState + ?Sized,
        K: RangeSink + ?Sized,
    {
        let start_offset = offset(tiles.size(), start)?;
        self.queue.clear();
        self.stats = SweepStats::default();
        self.state = SweepState::NotStarted;

        if revealed.is_revealed(start_offset) {
            self.state = SweepState::Done;
            return Ok(SweepOutcome::NoChange);
        }

        let value = tiles[start];
        if is_mine(value) {
            log::debug!("sweep at {:?} hit a mine", start);
            self.state = SweepState::Done;
            return Ok(SweepOutcome::HitMine);
        }
        if is_boundary(value) {
            log::warn!(
                "sweep started on boundary tile {:?} ({}), revealing it alone",
                start,
                value
            );
        }

        let started = Instant::now();
        self.state = SweepState::Draining;
        self.queue
            .push(Segment::from_span(start.1, start.0, start.0 + 1, Feed::Both));

        while let Some(segment) = self.queue.pop() {
            self.sweep_segment(segment, tiles, revealed, sink)?;
        }

        self.state = SweepState::Done;
        log::debug!(
            "sweep at {:?} done in {:?}: {:?}",
            start,
            started.elapsed(),
            self.stats
        );

        Ok(if self.stats.cells_revealed > 0 {
            SweepOutcome::Revealed
        } else {
            SweepOutcome::NoChange
        })
    }

    fn sweep_segment<S, K>(
        &mut self,
        segment: Segment,
        tiles: &TileGrid,
        revealed: &mut S,
        sink: &mut K,
    ) -> Result<()>
    where
        S: RevealState + ?Sized,
        K: RangeSink + ?Sized,
    {
        let size = tiles.size();
        let row = segment.row();
        let mut productive = false;

        let mut x = segment.begin();
        while x < segment.end() {
            if !is_open(tiles, &*revealed, (x, row))? {
                x += 1;
                continue;
            }

            let range = expand_run(tiles, &*revealed, (x, row))?;
            for cell in range.cells() {
                if revealed.reveal(offset(size, cell)?) {
                    self.stats.cells_revealed += 1;
                }
            }
            sink.report(range);
            self.stats.ranges_reported += 1;

            let children = spawn_children(tiles, &range, &segment);
            log::trace!(
                "segment {:?}: cleared {} with {} children",
                segment,
                range,
                children.len()
            );
            for child in children {
                self.queue.push(child);
            }

            productive = true;
            x = range.end;
        }

        if productive {
            self.stats.segments_processed += 1;
        } else {
            log::trace!("segment {:?} already revealed, discarded", segment);
            self.stats.segments_discarded += 1;
        }
        Ok(())
    }
}

/// Hidden and not a mine.
fn is_open<S>(tiles: &TileGrid, revealed: &S, coords: Coord2) -> Result<bool>
where
    S: RevealState + ?Sized,
{
    let index = offset(tiles.size(), coords)?;
    Ok(!revealed.is_revealed(index) && !is_mine(tiles[coords]))
}

/// Widens the run seeded at an open cell.
///
/// Only empty tiles are walked past; the first boundary tile on either side is
/// kept as the run's last cell. Revealed cells and mines are never included.
fn expand_run<S>(tiles: &TileGrid, revealed: &S, (seed, row): Coord2) -> Result<ClearedRange>
where
    S: RevealState + ?Sized,
{
    let width = tiles.size().0;

    let mut begin = seed;
    if is_empty(tiles[(seed, row)]) {
        while begin > 0 && is_open(tiles, revealed, (begin - 1, row))? {
            begin -= 1;
            if !is_empty(tiles[(begin, row)]) {
                break;
            }
        }
    }

    let mut end = seed + 1;
    while end < width
        && is_empty(tiles[(end - 1, row)])
        && is_open(tiles, revealed, (end, row))?
    {
        end += 1;
    }

    Ok(ClearedRange::new(row, begin, end))
}

/// Segments for the rows next to a freshly cleared `range` found inside `parent`.
fn spawn_children(
    tiles: &TileGrid,
    range: &ClearedRange,
    parent: &Segment,
) -> SmallVec<[Segment; 6]> {
    let mut children = SmallVec::new();
    let row = range.row;

    // boundary tiles only ever sit at the ends of a run
    let mut core_begin = range.begin;
    let mut core_end = range.end;
    if is_boundary(tiles[(core_begin, row)]) {
        core_begin += 1;
    }
    if core_end > core_begin && is_boundary(tiles[(core_end - 1, row)]) {
        core_end -= 1;
    }
    if core_begin >= core_end {
        return children;
    }

    let inner = (
        core_begin.max(parent.begin()),
        core_end.min(parent.end()),
        parent.feed(),
    );
    let left = (core_begin, core_end.min(parent.begin()), Feed::Both);
    let right = (core_begin.max(parent.end()), core_end, Feed::Both);

    let height = tiles.size().1;
    for (begin, end, feed) in [left, inner, right] {
        if begin >= end {
            continue;
        }
        if feed.allows_up() && row > 0 {
            children.push(Segment::from_span(row - 1, begin, end, Feed::Up));
        }
        if feed.allows_down() && row + 1 < height {
            children.push(Segment::from_span(row + 1, begin, end, Feed::Down));
        }
    }
    children
}
