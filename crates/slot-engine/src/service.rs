//! Scheduling service -- the orchestration surface an agent or front end calls.
//!
//! Constructed once at startup from a [`SchedulerConfig`] and a
//! [`CalendarBackend`], then shared by reference with every request handler.
//! It fetches busy intervals, runs the finder, checks bookings for conflicts,
//! and shapes results into serializable reports with human-readable times.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::calendar::{CalendarBackend, EventRequest};
use crate::config::SchedulerConfig;
use crate::conflict::find_conflicts;
use crate::error::{Result, SlotError};
use crate::finder::{duration_from_minutes, SlotFinder};
use crate::interval::{CandidateSlot, SearchWindow, TimeInterval};
use crate::zone::SchedulingZone;

const LONG_FORMAT: &str = "%A, %B %d at %I:%M %p %Z";
const SHORT_FORMAT: &str = "%I:%M %p %Z";
const BOOKING_FORMAT: &str = "%Y-%m-%d %I:%M %p %Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Success,
    NoAvailability,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedSlot {
    pub start: String,
    pub end: String,
    pub start_formatted: String,
    pub end_formatted: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityReport {
    pub status: AvailabilityStatus,
    pub message: String,
    pub slots: Vec<FormattedSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedBusy {
    pub start: String,
    pub end: String,
    pub start_formatted: String,
    pub end_formatted: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusyReport {
    pub busy_times: Vec<FormattedBusy>,
    pub count: usize,
    pub timezone: String,
}

/// A booking as requested by the caller; times are parsed in the service zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingRequest {
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub link: String,
    pub description: String,
}

pub struct SchedulingService<B> {
    backend: B,
    zone: SchedulingZone,
    finder: SlotFinder,
    max_results: usize,
    default_duration_minutes: i64,
}

impl<B: CalendarBackend> SchedulingService<B> {
    /// # Errors
    /// Returns the configuration's validation error if it is invalid.
    pub fn new(config: &SchedulerConfig, backend: B) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            zone: config.zone()?,
            finder: config.finder()?,
            max_results: config.max_results,
            default_duration_minutes: config.default_duration_minutes,
        })
    }

    pub fn zone(&self) -> &SchedulingZone {
        &self.zone
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn default_duration_minutes(&self) -> i64 {
        self.default_duration_minutes
    }

    /// Fetch busy intervals for `window` and return the candidate slots.
    pub fn find_slots(
        &self,
        window: &SearchWindow,
        duration_minutes: i64,
        business_hours_only: bool,
    ) -> Result<Vec<CandidateSlot>> {
        let busy = self.backend.busy_intervals(window)?;
        tracing::debug!(
            window_start = %window.start,
            window_end = %window.end,
            busy = busy.len(),
            duration_minutes,
            "searching for slots"
        );
        self.finder.find_slots(
            window,
            &busy,
            duration_from_minutes(duration_minutes)?,
            business_hours_only,
            self.max_results,
        )
    }

    /// Business-hours availability across whole local days
    /// (`YYYY-MM-DD` through `YYYY-MM-DD`, inclusive).
    pub fn check_availability(
        &self,
        start_date: &str,
        end_date: &str,
        duration_minutes: i64,
    ) -> Result<AvailabilityReport> {
        let window = self.zone.day_window(start_date, end_date)?;
        let slots = self.find_slots(&window, duration_minutes, true)?;

        if slots.is_empty() {
            return Ok(AvailabilityReport {
                status: AvailabilityStatus::NoAvailability,
                message: format!(
                    "No available slots found between {} and {} for {} minutes ({})",
                    start_date,
                    end_date,
                    duration_minutes,
                    self.zone.name()
                ),
                slots: Vec::new(),
            });
        }

        let slots: Vec<FormattedSlot> = slots
            .iter()
            .map(|slot| FormattedSlot {
                start: slot.start.to_rfc3339(),
                end: slot.end.to_rfc3339(),
                start_formatted: slot.start.format(LONG_FORMAT).to_string(),
                end_formatted: slot.end.format(SHORT_FORMAT).to_string(),
                duration_minutes: slot.duration_minutes,
            })
            .collect();

        Ok(AvailabilityReport {
            status: AvailabilityStatus::Success,
            message: format!(
                "Found {} available slots in {}",
                slots.len(),
                self.zone.name()
            ),
            slots,
        })
    }

    /// Existing commitments across whole local days.
    pub fn busy_times(&self, start_date: &str, end_date: &str) -> Result<BusyReport> {
        let window = self.zone.day_window(start_date, end_date)?;
        let mut busy = self.backend.busy_intervals(&window)?;
        busy.sort_by_key(|b| b.start());

        let busy_times: Vec<FormattedBusy> = busy
            .iter()
            .map(|b| {
                let start = self.zone.normalize(&b.start());
                let end = self.zone.normalize(&b.end());
                FormattedBusy {
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                    start_formatted: start.format(LONG_FORMAT).to_string(),
                    end_formatted: end.format(SHORT_FORMAT).to_string(),
                    summary: b
                        .summary
                        .clone()
                        .unwrap_or_else(|| crate::calendar::DEFAULT_BUSY_SUMMARY.to_string()),
                }
            })
            .collect();

        Ok(BusyReport {
            count: busy_times.len(),
            busy_times,
            timezone: self.zone.name().to_string(),
        })
    }

    /// Create an event after checking it overlaps no busy interval.
    ///
    /// # Errors
    /// - `SlotError::Parse` if a timestamp is malformed
    /// - `SlotError::InvalidArgument` if the title is blank or `end <= start`
    /// - `SlotError::Conflict` if the booking overlaps an existing commitment
    /// - `SlotError::Calendar` if the backend fails
    pub fn book(&self, request: &BookingRequest) -> Result<Booking> {
        if request.title.trim().is_empty() {
            return Err(SlotError::InvalidArgument("title must not be empty".to_string()));
        }

        let start = self.zone.parse_timestamp(&request.start)?;
        let end = self.zone.parse_timestamp(&request.end)?;
        let proposed = TimeInterval::new(start, end);
        if proposed.is_empty() {
            return Err(SlotError::InvalidArgument(format!(
                "event must end after it starts ({} - {})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }

        let busy = self
            .backend
            .busy_intervals(&SearchWindow::new(start, end))?;
        let conflicts = find_conflicts(&proposed, &busy);
        if !conflicts.is_empty() {
            tracing::warn!(
                title = %request.title,
                conflicts = conflicts.len(),
                "refusing to book over existing commitments"
            );
            return Err(SlotError::Conflict {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
                count: conflicts.len(),
            });
        }

        let created = self.backend.create_event(&EventRequest {
            title: request.title.clone(),
            start,
            end,
            description: request.description.clone(),
            attendees: request.attendees.clone(),
        })?;
        tracing::info!(id = %created.id, title = %request.title, "event created");

        Ok(Booking {
            id: created.id,
            title: request.title.clone(),
            start: format_booking_time(&start),
            end: format_booking_time(&end),
            link: created.html_link,
            description: request.description.clone(),
        })
    }
}

fn format_booking_time(dt: &DateTime<Tz>) -> String {
    dt.format(BOOKING_FORMAT).to_string()
}
