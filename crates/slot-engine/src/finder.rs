//! Compute bookable meeting slots from busy intervals.
//!
//! Sorts busy intervals by start time and scans the gaps between them with a
//! cursor that only moves forward (`cursor = max(cursor, busy.end)`), so
//! overlapping or duplicate intervals need no separate merge pass. Inside each
//! gap, slots are stepped by the requested duration itself, not a fixed grid:
//! every slot is exactly bookable and `slot_start + duration <= gap_end` keeps
//! it clear of the next busy interval.

use chrono::{DateTime, Duration, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::{BusyInterval, CandidateSlot, SearchWindow, TimeInterval};
use crate::zone::SchedulingZone;

/// Result cap used when the caller does not pick one.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Local hour-of-day range `[start_hour, end_hour)` that slot starts must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 18,
        }
    }
}

impl BusinessHours {
    /// # Errors
    /// Returns `SlotError::InvalidArgument` unless `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        let hours = Self {
            start_hour,
            end_hour,
        };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(SlotError::InvalidArgument(format!(
                "business hours must satisfy start < end <= 24, got {}..{}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    pub fn contains(&self, start: &DateTime<Tz>) -> bool {
        (self.start_hour..self.end_hour).contains(&start.hour())
    }
}

/// Free-slot finder configured with a business-hours range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlotFinder {
    business_hours: BusinessHours,
}

impl SlotFinder {
    pub fn new(business_hours: BusinessHours) -> Result<Self> {
        business_hours.validate()?;
        Ok(Self { business_hours })
    }

    pub fn business_hours(&self) -> BusinessHours {
        self.business_hours
    }

    /// Find up to `max_results` slots of exactly `duration` inside `window`
    /// that overlap none of the `busy` intervals.
    ///
    /// Every timestamp is normalized into the window's zone first. Slots are
    /// returned in start order; the earliest `max_results` are kept. When
    /// `business_hours_only` is set, a slot is kept only if its local start
    /// hour lies in the configured business hours.
    ///
    /// A degenerate window (`start >= end`) yields an empty list.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidArgument` if `duration` is not positive.
    pub fn find_slots(
        &self,
        window: &SearchWindow,
        busy: &[BusyInterval],
        duration: Duration,
        business_hours_only: bool,
        max_results: usize,
    ) -> Result<Vec<CandidateSlot>> {
        if duration <= Duration::zero() {
            return Err(SlotError::InvalidArgument(format!(
                "duration must be positive, got {} minutes",
                duration.num_minutes()
            )));
        }

        let zone = SchedulingZone::new(window.start.timezone(), Default::default());
        let window = window.as_interval().normalized(&zone);
        if window.is_empty() || max_results == 0 {
            return Ok(Vec::new());
        }

        // Stable sort keeps equal-start intervals in input order.
        let mut periods: Vec<TimeInterval> = busy
            .iter()
            .map(|b| b.interval.normalized(&zone))
            .filter(|p| !p.is_empty())
            .collect();
        periods.sort_by_key(|p| p.start);

        let mut scan = GapScan {
            duration,
            hours: business_hours_only.then_some(self.business_hours),
            max_results,
            kept: Vec::new(),
        };

        let mut cursor = window.start;
        for period in &periods {
            if scan.is_full() {
                break;
            }
            if cursor < period.start {
                scan.fill(cursor, period.start.min(window.end));
            }
            cursor = cursor.max(period.end);
        }

        if cursor < window.end {
            scan.fill(cursor, window.end);
        }

        Ok(scan.kept)
    }
}

/// Meeting length in whole minutes.
///
/// # Errors
/// Returns `SlotError::InvalidArgument` if `minutes` is not positive or is too
/// large to represent as a duration.
pub fn duration_from_minutes(minutes: i64) -> Result<Duration> {
    if minutes <= 0 {
        return Err(SlotError::InvalidArgument(format!(
            "duration must be positive, got {} minutes",
            minutes
        )));
    }
    Duration::try_minutes(minutes).ok_or_else(|| {
        SlotError::InvalidArgument(format!("duration of {} minutes is out of range", minutes))
    })
}

/// Find slots with the default business hours (09:00-18:00 local).
///
/// See [`SlotFinder::find_slots`].
pub fn find_slots(
    window: &SearchWindow,
    busy: &[BusyInterval],
    duration: Duration,
    business_hours_only: bool,
    max_results: usize,
) -> Result<Vec<CandidateSlot>> {
    SlotFinder::default().find_slots(window, busy, duration, business_hours_only, max_results)
}

struct GapScan {
    duration: Duration,
    hours: Option<BusinessHours>,
    max_results: usize,
    kept: Vec<CandidateSlot>,
}

impl GapScan {
    fn is_full(&self) -> bool {
        self.kept.len() >= self.max_results
    }

    /// Step through `[gap_start, gap_end)` in increments of the duration.
    /// A slot end past chrono's representable range ends the gap.
    fn fill(&mut self, gap_start: DateTime<Tz>, gap_end: DateTime<Tz>) {
        let mut slot_start = gap_start;
        while !self.is_full() {
            let Some(slot_end) = slot_start.checked_add_signed(self.duration) else {
                break;
            };
            if slot_end > gap_end {
                break;
            }
            if self.hours.is_none_or(|h| h.contains(&slot_start)) {
                self.kept.push(CandidateSlot {
                    start: slot_start,
                    end: slot_end,
                    duration_minutes: self.duration.num_minutes(),
                });
            }
            slot_start = slot_end;
        }
    }
}
