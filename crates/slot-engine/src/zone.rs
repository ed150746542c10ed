//! Time-zone anchoring -- every timestamp the engine touches is normalized into
//! one fixed geographic zone so hour-of-day checks use local wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::interval::SearchWindow;

/// Zone used when no configuration says otherwise.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Naive formats accepted by [`SchedulingZone::parse_timestamp`], tried in order.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// The single zone all scheduling arithmetic is anchored to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingZone {
    tz: Tz,
    policy: DstPolicy,
}

impl Default for SchedulingZone {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Asia::Kolkata,
            policy: DstPolicy::default(),
        }
    }
}

impl SchedulingZone {
    pub fn new(tz: Tz, policy: DstPolicy) -> Self {
        Self { tz, policy }
    }

    /// Build a zone from an IANA identifier (e.g., "America/Los_Angeles").
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if the name is not a known IANA zone.
    pub fn parse(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(name.to_string()))?;
        Ok(Self::new(tz, DstPolicy::default()))
    }

    pub fn with_policy(self, policy: DstPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Convert any zone-aware timestamp into this zone.
    pub fn normalize<Z: TimeZone>(&self, dt: &DateTime<Z>) -> DateTime<Tz> {
        dt.with_timezone(&self.tz)
    }

    /// Interpret a naive timestamp as local wall-clock time in this zone.
    pub fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        self.policy.resolve(self.tz, naive)
    }

    /// Parse a timestamp string into this zone.
    ///
    /// Accepts RFC 3339 (with offset or `Z`), which is converted, and naive
    /// datetimes or bare dates, which are taken as local time in this zone.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` if no accepted format matches.
    pub fn parse_timestamp(&self, text: &str) -> Result<DateTime<Tz>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SlotError::Parse("empty timestamp".to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(self.normalize(&dt));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return self.localize(naive);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return self.start_of_day(date);
        }

        Err(SlotError::Parse(format!("unrecognized timestamp '{}'", text)))
    }

    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Tz>> {
        self.localize(date.and_time(NaiveTime::MIN))
    }

    /// The search window spanning whole local days, `start_date 00:00:00`
    /// through `end_date 23:59:59`.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` if either date is not `YYYY-MM-DD`.
    pub fn day_window(&self, start_date: &str, end_date: &str) -> Result<SearchWindow> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        let last_second = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| SlotError::InvalidArgument("invalid end of day".to_string()))?;

        Ok(SearchWindow::new(
            self.start_of_day(start)?,
            self.localize(end.and_time(last_second))?,
        ))
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| SlotError::Parse(format!("invalid date '{}': {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn aware_timestamp_is_converted() {
        let zone = SchedulingZone::default();
        let dt = zone.parse_timestamp("2026-03-02T04:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn naive_timestamp_is_local() {
        let zone = SchedulingZone::default();
        let dt = zone.parse_timestamp("2026-03-02T10:00:00").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.to_rfc3339(), "2026-03-02T10:00:00+05:30");
    }

    #[test]
    fn bare_date_is_local_midnight() {
        let zone = SchedulingZone::default();
        let dt = zone.parse_timestamp("2026-03-02").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-02T00:00:00+05:30");
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let zone = SchedulingZone::default();
        assert!(matches!(
            zone.parse_timestamp("next tuesday"),
            Err(SlotError::Parse(_))
        ));
        assert!(matches!(zone.parse_timestamp("  "), Err(SlotError::Parse(_))));
    }

    #[test]
    fn unknown_zone_rejected() {
        assert!(matches!(
            SchedulingZone::parse("Mars/Olympus_Mons"),
            Err(SlotError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn day_window_spans_whole_days() {
        let zone = SchedulingZone::default();
        let window = zone.day_window("2026-03-02", "2026-03-03").unwrap();
        assert_eq!(window.start.to_rfc3339(), "2026-03-02T00:00:00+05:30");
        assert_eq!(window.end.to_rfc3339(), "2026-03-03T23:59:59+05:30");
    }
}
