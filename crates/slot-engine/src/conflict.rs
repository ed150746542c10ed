//! Detect busy intervals that a proposed booking would overlap.
//!
//! Adjacent intervals (where one ends exactly when another starts) are NOT conflicts.

use crate::interval::{BusyInterval, TimeInterval};

/// A busy interval overlapping a proposed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub busy: BusyInterval,
    pub overlap_minutes: i64,
}

/// Find every busy interval overlapping `proposed`, in input order.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(proposed: &TimeInterval, busy: &[BusyInterval]) -> Vec<Conflict> {
    busy.iter()
        .filter(|b| proposed.overlaps(&b.interval))
        .map(|b| {
            let overlap_start = proposed.start.max(b.start());
            let overlap_end = proposed.end.min(b.end());
            Conflict {
                busy: b.clone(),
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            }
        })
        .collect()
}
