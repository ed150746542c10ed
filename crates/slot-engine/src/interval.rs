//! Zoned time intervals: busy periods, search windows, and candidate slots.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::error::Result;
use crate::zone::SchedulingZone;

/// A half-open `[start, end)` range of zoned timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when the interval covers no time at all (including inverted ranges).
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Adjacent intervals (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub(crate) fn normalized(&self, zone: &SchedulingZone) -> Self {
        Self {
            start: zone.normalize(&self.start),
            end: zone.normalize(&self.end),
        }
    }
}

/// A calendar commitment that blocks scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyInterval {
    pub interval: TimeInterval,
    /// Human-readable label, e.g. the event summary.
    pub summary: Option<String>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            interval: TimeInterval::new(start, end),
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Parse a busy interval from timestamp strings, normalizing into `zone`.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` if either timestamp is malformed.
    pub fn parse(
        zone: &SchedulingZone,
        start: &str,
        end: &str,
        summary: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            interval: TimeInterval::new(zone.parse_timestamp(start)?, zone.parse_timestamp(end)?),
            summary: summary.map(str::to_string),
        })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.interval.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.interval.end
    }
}

/// The caller's requested range to search within.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl SearchWindow {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn parse(zone: &SchedulingZone, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(
            zone.parse_timestamp(start)?,
            zone.parse_timestamp(end)?,
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn as_interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end)
    }
}

/// A proposed conflict-free meeting slot of exactly the requested duration.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub duration_minutes: i64,
}

impl CandidateSlot {
    pub fn as_interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end)
    }
}
