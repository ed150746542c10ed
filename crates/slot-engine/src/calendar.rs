//! Calendar backends -- the collaborators that supply busy intervals and
//! create events.
//!
//! The finder never talks to a calendar itself. A [`CalendarBackend`] resolves
//! provider records into [`BusyInterval`]s for a window and creates events on
//! confirmation. Two backends ship here:
//!
//! - [`OfflineCalendar`] -- explicit offline/test mode with canned data
//! - [`JsonFileCalendar`] -- a local JSON file of provider-style event records

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::{BusyInterval, SearchWindow};
use crate::zone::SchedulingZone;

/// Label used for busy intervals whose record has no summary.
pub const DEFAULT_BUSY_SUMMARY: &str = "Busy";

/// Source of busy intervals and sink for new events.
pub trait CalendarBackend {
    /// All busy intervals that may intersect `window`.
    fn busy_intervals(&self, window: &SearchWindow) -> Result<Vec<BusyInterval>>;

    /// Create one calendar event.
    fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent>;
}

impl<B: CalendarBackend + ?Sized> CalendarBackend for Box<B> {
    fn busy_intervals(&self, window: &SearchWindow) -> Result<Vec<BusyInterval>> {
        (**self).busy_intervals(window)
    }

    fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent> {
        (**self).create_event(request)
    }
}

/// A request to create one calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub description: String,
    pub attendees: Vec<String>,
}

/// What a backend reports back after creating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedEvent {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub html_link: String,
    pub status: String,
}

/// Start or end of a provider event: a timed `dateTime` or an all-day `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    /// The effective timestamp text, preferring `dateTime` over the all-day `date`.
    pub fn effective(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
}

/// A provider event record in Google Calendar's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
}

impl ProviderEvent {
    /// Translate the record into a busy interval in `zone`.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` if a bound has neither `dateTime` nor `date`,
    /// or if either timestamp is malformed.
    pub fn to_busy_interval(&self, zone: &SchedulingZone) -> Result<BusyInterval> {
        let start = self.start.effective().ok_or_else(|| self.missing_time("start"))?;
        let end = self.end.effective().ok_or_else(|| self.missing_time("end"))?;
        BusyInterval::parse(
            zone,
            start,
            end,
            Some(self.summary.as_deref().unwrap_or(DEFAULT_BUSY_SUMMARY)),
        )
    }

    fn missing_time(&self, bound: &str) -> SlotError {
        SlotError::Parse(format!(
            "event {} has no {} dateTime or date",
            self.id.as_deref().unwrap_or("<unnamed>"),
            bound
        ))
    }
}

// ---------------------------------------------------------------------------
// Offline mode
// ---------------------------------------------------------------------------

/// Offline/test calendar.
///
/// Reports one existing meeting from 10:00 to 11:00 local time on the first
/// day of every queried window, plus anything booked through it. Bookings are
/// confirmed with a deterministic mock id and link.
#[derive(Debug, Default)]
pub struct OfflineCalendar {
    booked: Mutex<Vec<CreatedEvent>>,
}

impl OfflineCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    fn canned_meeting(window: &SearchWindow) -> Result<BusyInterval> {
        let tz = window.start.timezone();
        let zone = SchedulingZone::new(tz, Default::default());
        let ten = NaiveTime::from_hms_opt(10, 0, 0)
            .ok_or_else(|| SlotError::Calendar("invalid canned meeting time".to_string()))?;
        let start = zone.localize(window.start.date_naive().and_time(ten))?;
        Ok(BusyInterval::new(start, start + Duration::hours(1)).with_summary("Existing meeting"))
    }
}

impl CalendarBackend for OfflineCalendar {
    fn busy_intervals(&self, window: &SearchWindow) -> Result<Vec<BusyInterval>> {
        let booked = self
            .booked
            .lock()
            .map_err(|_| SlotError::Calendar("offline calendar lock poisoned".to_string()))?;

        let mut busy = vec![Self::canned_meeting(window)?];
        busy.extend(booked.iter().map(|event| {
            BusyInterval::new(event.start, event.end).with_summary(event.summary.clone())
        }));
        tracing::debug!(count = busy.len(), "offline calendar busy intervals");
        Ok(busy)
    }

    fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent> {
        let mut booked = self
            .booked
            .lock()
            .map_err(|_| SlotError::Calendar("offline calendar lock poisoned".to_string()))?;

        let id = format!("offline-{}", booked.len() + 1);
        let event = CreatedEvent {
            html_link: format!("offline://events/{}", id),
            id,
            summary: request.title.clone(),
            start: request.start,
            end: request.end,
            status: "confirmed".to_string(),
        };
        booked.push(event.clone());
        Ok(event)
    }
}

// ---------------------------------------------------------------------------
// JSON file backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    items: Vec<ProviderEvent>,
}

/// Calendar stored as a local JSON file: `{ "items": [ProviderEvent, ...] }`.
///
/// A missing file is an empty calendar; it is created on the first booking.
#[derive(Debug, Clone)]
pub struct JsonFileCalendar {
    path: PathBuf,
    zone: SchedulingZone,
}

impl JsonFileCalendar {
    pub fn new(path: impl Into<PathBuf>, zone: SchedulingZone) -> Self {
        Self {
            path: path.into(),
            zone,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CalendarFile> {
        if !self.path.exists() {
            return Ok(CalendarFile::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            SlotError::Calendar(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            SlotError::Calendar(format!("invalid calendar file {}: {}", self.path.display(), e))
        })
    }

    fn store(&self, file: &CalendarFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| SlotError::Calendar(format!("failed to serialize calendar: {}", e)))?;
        fs::write(&self.path, json).map_err(|e| {
            SlotError::Calendar(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl CalendarBackend for JsonFileCalendar {
    fn busy_intervals(&self, window: &SearchWindow) -> Result<Vec<BusyInterval>> {
        let file = self.load()?;
        let window = window.as_interval();

        let mut busy = Vec::new();
        for item in &file.items {
            if item.status.as_deref() == Some("cancelled") {
                continue;
            }
            let interval = item.to_busy_interval(&self.zone)?;
            if interval.interval.overlaps(&window) {
                busy.push(interval);
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            total = file.items.len(),
            in_window = busy.len(),
            "loaded busy intervals"
        );
        Ok(busy)
    }

    fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent> {
        let mut file = self.load()?;
        let id = next_event_id(&file.items);
        let html_link = format!("file://{}#{}", self.path.display(), id);
        let time = |dt: &DateTime<Tz>| EventTime {
            date_time: Some(dt.to_rfc3339()),
            date: None,
            time_zone: Some(self.zone.name().to_string()),
        };

        file.items.push(ProviderEvent {
            id: Some(id.clone()),
            summary: Some(request.title.clone()),
            description: Some(request.description.clone()).filter(|d| !d.is_empty()),
            start: time(&request.start),
            end: time(&request.end),
            html_link: Some(html_link.clone()),
            status: Some("confirmed".to_string()),
            attendees: request
                .attendees
                .iter()
                .map(|email| Attendee {
                    email: email.clone(),
                })
                .collect(),
        });
        self.store(&file)?;

        Ok(CreatedEvent {
            id,
            summary: request.title.clone(),
            start: request.start,
            end: request.end,
            html_link,
            status: "confirmed".to_string(),
        })
    }
}

/// `evt-N` numbered after the stored events, skipping ids already taken.
fn next_event_id(items: &[ProviderEvent]) -> String {
    let taken = |id: &str| items.iter().any(|item| item.id.as_deref() == Some(id));
    (items.len() + 1..)
        .map(|n| format!("evt-{}", n))
        .find(|id| !taken(id))
        .unwrap_or_default()
}
