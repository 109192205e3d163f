use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// Nothing on the row intersected, the candidate was queued as is.
    Queued,
    /// A queued segment already covers the candidate.
    Absorbed,
    /// The candidate was coalesced with intersecting queued segments.
    Merged,
}

/// Unordered pool of segments waiting to be swept.
///
/// No two queued segments on the same row ever intersect: a candidate that
/// touches or overlaps queued work is either dropped (when that work already
/// covers it) or coalesced with it. Pops are roughly LIFO.
#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    rows: HashMap<Coord, SmallVec<[Segment; 4]>>,
    // one entry per queued segment at push time; merges can leave stale entries
    order: Vec<Coord>,
    len: usize,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.order.clear();
        self.len = 0;
    }

    pub fn push(&mut self, candidate: Segment) -> PushOutcome {
        let row = candidate.row();
        let queued = self.rows.entry(row).or_default();

        if queued.iter().any(|segment| segment.covers(&candidate)) {
            log::trace!("segment {candidate:?} already covered");
            return PushOutcome::Absorbed;
        }

        let mut merged = candidate;
        let mut absorbed = 0;
        // widening can make the merged segment reach further neighbours, so rescan
        while let Some(index) = queued.iter().position(|segment| segment.intersects(&merged)) {
            merged = merged.merge(&queued.swap_remove(index));
            absorbed += 1;
        }
        queued.push(merged);
        self.len = self.len + 1 - absorbed;

        if absorbed == 0 {
            self.order.push(row);
            PushOutcome::Queued
        } else {
            log::trace!("segment {candidate:?} merged into {merged:?}");
            PushOutcome::Merged
        }
    }

    pub fn pop(&mut self) -> Option<Segment> {
        while let Some(row) = self.order.pop() {
            let Some(queued) = self.rows.get_mut(&row) else {
                continue;
            };
            let Some(segment) = queued.pop() else {
                continue;
            };
            if queued.is_empty() {
                self.rows.remove(&row);
            }
            self.len -= 1;
            return Some(segment);
        }
        debug_assert_eq!(self.len, 0, "queued segments without an order entry");
        None
    }
}
