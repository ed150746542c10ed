//! Tests for the scheduling service over the offline and JSON-file backends.

use std::fs;

use slot_engine::calendar::{JsonFileCalendar, OfflineCalendar};
use slot_engine::config::SchedulerConfig;
use slot_engine::service::{AvailabilityStatus, BookingRequest, SchedulingService};
use slot_engine::{SchedulingZone, SlotError};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn offline_service() -> SchedulingService<OfflineCalendar> {
    SchedulingService::new(&SchedulerConfig::default(), OfflineCalendar::new()).unwrap()
}

fn booking(title: &str, start: &str, end: &str) -> BookingRequest {
    BookingRequest {
        title: title.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        ..Default::default()
    }
}

const CALENDAR_JSON: &str = r#"{
  "items": [
    {
      "id": "a",
      "summary": "Design review",
      "start": {"dateTime": "2026-03-02T09:00:00+05:30"},
      "end": {"dateTime": "2026-03-02T12:00:00+05:30"}
    },
    {
      "id": "b",
      "summary": "Lunch",
      "start": {"dateTime": "2026-03-02T07:30:00Z"},
      "end": {"dateTime": "2026-03-02T08:30:00Z"}
    },
    {
      "id": "c",
      "summary": "Holiday",
      "start": {"date": "2026-03-03"},
      "end": {"date": "2026-03-04"}
    },
    {
      "id": "d",
      "summary": "Cancelled sync",
      "status": "cancelled",
      "start": {"dateTime": "2026-03-02T15:00:00+05:30"},
      "end": {"dateTime": "2026-03-02T16:00:00+05:30"}
    }
  ]
}"#;

fn file_service(dir: &tempfile::TempDir) -> SchedulingService<JsonFileCalendar> {
    let path = dir.path().join("calendar.json");
    fs::write(&path, CALENDAR_JSON).unwrap();
    let calendar = JsonFileCalendar::new(path, SchedulingZone::default());
    SchedulingService::new(&SchedulerConfig::default(), calendar).unwrap()
}

// ── Availability ────────────────────────────────────────────────────────────

#[test]
fn offline_availability_skips_canned_meeting() {
    let report = offline_service()
        .check_availability("2026-03-02", "2026-03-02", 60)
        .unwrap();

    assert_eq!(report.status, AvailabilityStatus::Success);
    let starts: Vec<&str> = report.slots.iter().map(|s| s.start.as_str()).collect();
    assert_eq!(
        starts,
        vec![
            "2026-03-02T09:00:00+05:30",
            "2026-03-02T11:00:00+05:30",
            "2026-03-02T12:00:00+05:30",
            "2026-03-02T13:00:00+05:30",
            "2026-03-02T14:00:00+05:30",
            "2026-03-02T15:00:00+05:30",
            "2026-03-02T16:00:00+05:30",
            "2026-03-02T17:00:00+05:30",
        ]
    );
    assert!(report.slots[0]
        .start_formatted
        .starts_with("Monday, March 02 at 09:00 AM"));
    assert!(report.slots[0].end_formatted.starts_with("10:00 AM"));
    assert_eq!(report.message, "Found 8 available slots in Asia/Kolkata");
}

#[test]
fn file_calendar_availability_respects_all_events() {
    let dir = tempfile::tempdir().unwrap();
    let report = file_service(&dir)
        .check_availability("2026-03-02", "2026-03-03", 60)
        .unwrap();

    // 09:00-12:00 review, 13:00-14:00 lunch (07:30Z), 03-03 all-day holiday.
    // The cancelled 15:00 sync does not block.
    let starts: Vec<&str> = report.slots.iter().map(|s| s.start.as_str()).collect();
    assert_eq!(
        starts,
        vec![
            "2026-03-02T12:00:00+05:30",
            "2026-03-02T14:00:00+05:30",
            "2026-03-02T15:00:00+05:30",
            "2026-03-02T16:00:00+05:30",
            "2026-03-02T17:00:00+05:30",
        ]
    );
}

#[test]
fn fully_booked_day_reports_no_availability() {
    let dir = tempfile::tempdir().unwrap();
    let report = file_service(&dir)
        .check_availability("2026-03-03", "2026-03-03", 30)
        .unwrap();

    assert_eq!(report.status, AvailabilityStatus::NoAvailability);
    assert!(report.slots.is_empty());
    assert!(report.message.contains("2026-03-03"));
}

#[test]
fn malformed_date_is_an_error_not_an_apology() {
    let result = offline_service().check_availability("March 2nd", "2026-03-02", 60);
    assert!(matches!(result, Err(SlotError::Parse(_))));
}

#[test]
fn non_positive_duration_is_rejected() {
    let result = offline_service().check_availability("2026-03-02", "2026-03-02", 0);
    assert!(matches!(result, Err(SlotError::InvalidArgument(_))));
}

#[test]
fn out_of_range_duration_is_rejected() {
    let result = offline_service().check_availability("2026-03-02", "2026-03-02", i64::MAX);
    assert!(matches!(result, Err(SlotError::InvalidArgument(_))));
}

#[test]
fn availability_report_serializes_snake_case_status() {
    let report = offline_service()
        .check_availability("2026-03-02", "2026-03-02", 60)
        .unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["slots"][0]["duration_minutes"], 60);
}

// ── Busy times ──────────────────────────────────────────────────────────────

#[test]
fn busy_times_are_sorted_and_labelled() {
    let dir = tempfile::tempdir().unwrap();
    let report = file_service(&dir).busy_times("2026-03-02", "2026-03-02").unwrap();

    assert_eq!(report.count, 2);
    assert_eq!(report.timezone, "Asia/Kolkata");
    assert_eq!(report.busy_times[0].summary, "Design review");
    assert_eq!(report.busy_times[1].summary, "Lunch");
    assert_eq!(report.busy_times[1].start, "2026-03-02T13:00:00+05:30");
}

// ── Booking ─────────────────────────────────────────────────────────────────

#[test]
fn booking_into_free_slot_succeeds() {
    let service = offline_service();
    let booked = service
        .book(&booking("1:1", "2026-03-02T14:00:00", "2026-03-02T14:30:00"))
        .unwrap();

    assert_eq!(booked.id, "offline-1");
    assert_eq!(booked.title, "1:1");
    assert_eq!(booked.link, "offline://events/offline-1");
    assert!(booked.start.starts_with("2026-03-02 02:00 PM"));
}

#[test]
fn booking_over_busy_interval_is_refused() {
    let service = offline_service();
    let result = service.book(&booking("Clash", "2026-03-02T10:30:00", "2026-03-02T11:30:00"));

    match result {
        Err(SlotError::Conflict { count, .. }) => assert_eq!(count, 1),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[test]
fn booked_events_block_later_availability() {
    let service = offline_service();
    service
        .book(&booking("Planning", "2026-03-02T09:00:00", "2026-03-02T10:00:00"))
        .unwrap();

    let report = service
        .check_availability("2026-03-02", "2026-03-02", 60)
        .unwrap();
    assert_eq!(report.slots[0].start, "2026-03-02T11:00:00+05:30");

    let again = service.book(&booking("Double", "2026-03-02T09:30:00", "2026-03-02T10:00:00"));
    assert!(matches!(again, Err(SlotError::Conflict { .. })));
}

#[test]
fn inverted_booking_rejected() {
    let result =
        offline_service().book(&booking("Backwards", "2026-03-02T15:00:00", "2026-03-02T14:00:00"));
    assert!(matches!(result, Err(SlotError::InvalidArgument(_))));
}

#[test]
fn blank_title_rejected() {
    let result = offline_service().book(&booking("  ", "2026-03-02T15:00:00", "2026-03-02T16:00:00"));
    assert!(matches!(result, Err(SlotError::InvalidArgument(_))));
}

#[test]
fn booking_appends_to_calendar_file() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);

    let booked = service
        .book(&BookingRequest {
            title: "Retro".to_string(),
            start: "2026-03-02T16:00:00+05:30".to_string(),
            end: "2026-03-02T17:00:00+05:30".to_string(),
            description: "Sprint retro".to_string(),
            attendees: vec!["team@example.com".to_string()],
        })
        .unwrap();
    assert_eq!(booked.id, "evt-5");

    let raw = fs::read_to_string(dir.path().join("calendar.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let created = &json["items"][4];
    assert_eq!(created["summary"], "Retro");
    assert_eq!(created["start"]["dateTime"], "2026-03-02T16:00:00+05:30");
    assert_eq!(created["attendees"][0]["email"], "team@example.com");

    let report = service.busy_times("2026-03-02", "2026-03-02").unwrap();
    assert_eq!(report.count, 3);
}

#[test]
fn booking_never_reuses_a_stored_event_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.json");
    fs::write(
        &path,
        r#"{"items": [{
            "id": "evt-2",
            "summary": "Hand-entered",
            "start": {"dateTime": "2026-03-02T09:00:00+05:30"},
            "end": {"dateTime": "2026-03-02T10:00:00+05:30"}
        }]}"#,
    )
    .unwrap();
    let calendar = JsonFileCalendar::new(path, SchedulingZone::default());
    let service = SchedulingService::new(&SchedulerConfig::default(), calendar).unwrap();

    let booked = service
        .book(&booking(
            "Retro",
            "2026-03-02T16:00:00+05:30",
            "2026-03-02T17:00:00+05:30",
        ))
        .unwrap();
    assert_eq!(booked.id, "evt-3");
}

#[test]
fn missing_calendar_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = JsonFileCalendar::new(dir.path().join("absent.json"), SchedulingZone::default());
    let service = SchedulingService::new(&SchedulerConfig::default(), calendar).unwrap();

    let report = service.busy_times("2026-03-02", "2026-03-02").unwrap();
    assert_eq!(report.count, 0);
}

#[test]
fn corrupt_calendar_file_is_a_calendar_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.json");
    fs::write(&path, "{ not json").unwrap();
    let calendar = JsonFileCalendar::new(path, SchedulingZone::default());
    let service = SchedulingService::new(&SchedulerConfig::default(), calendar).unwrap();

    let result = service.check_availability("2026-03-02", "2026-03-02", 30);
    assert!(matches!(result, Err(SlotError::Calendar(_))));
}
