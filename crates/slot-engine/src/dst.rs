//! DST transition policies for naive local timestamps.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Upper bound on how far `ShiftForward` searches for the end of a gap.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Policy for naive local times that fall into a DST transition.
///
/// Ambiguous times (fall back) always resolve to the earliest instant; the
/// policy only matters for times inside a spring-forward gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Reject times that fall in the DST gap (e.g., 2:30 AM during spring forward)
    Skip,
    /// Shift to the first valid time after the gap
    ShiftForward,
    /// Keep the elapsed time by applying the offset in effect before the gap
    #[default]
    WallClock,
}

impl DstPolicy {
    /// Resolve a naive local time in `tz` to a concrete instant.
    pub fn resolve(self, tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            LocalResult::None => match self {
                DstPolicy::Skip => Err(SlotError::InvalidArgument(format!(
                    "{} does not exist in {}",
                    naive, tz
                ))),
                DstPolicy::ShiftForward => shift_past_gap(tz, naive),
                DstPolicy::WallClock => {
                    let before_gap = tz
                        .offset_from_utc_datetime(&(naive - Duration::days(1)))
                        .fix();
                    let utc = naive - Duration::seconds(i64::from(before_gap.local_minus_utc()));
                    Ok(tz.from_utc_datetime(&utc))
                }
            },
        }
    }
}

fn shift_past_gap(tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
    let mut candidate = naive.with_second(0).and_then(|n| n.with_nanosecond(0)).unwrap_or(naive);
    for _ in 0..MAX_GAP_MINUTES {
        candidate += Duration::minutes(1);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return Ok(dt);
        }
    }
    Err(SlotError::InvalidArgument(format!(
        "no valid local time after {} in {}",
        naive, tz
    )))
}
