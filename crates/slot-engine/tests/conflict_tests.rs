//! Tests for booking conflict detection.

use chrono::{DateTime, TimeZone};
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;
use slot_engine::find_conflicts;
use slot_engine::interval::{BusyInterval, TimeInterval};

fn at(hour: u32, min: u32) -> DateTime<Tz> {
    Kolkata.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

fn proposed(start: (u32, u32), end: (u32, u32)) -> TimeInterval {
    TimeInterval::new(at(start.0, start.1), at(end.0, end.1))
}

fn busy(start: (u32, u32), end: (u32, u32)) -> BusyInterval {
    BusyInterval::new(at(start.0, start.1), at(end.0, end.1))
}

#[test]
fn overlapping_busy_interval_detected() {
    // Proposed: 09:00-10:00, Busy: 09:30-10:30 → 30-min overlap
    let conflicts = find_conflicts(&proposed((9, 0), (10, 0)), &[busy((9, 30), (10, 30))]);

    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn non_overlapping_busy_interval_no_conflict() {
    let conflicts = find_conflicts(&proposed((9, 0), (10, 0)), &[busy((11, 0), (12, 0))]);
    assert!(conflicts.is_empty());
}

#[test]
fn adjacent_intervals_not_a_conflict() {
    // Proposed ends exactly when busy starts, and vice versa.
    let b = vec![busy((8, 0), (9, 0)), busy((10, 0), (11, 0))];
    let conflicts = find_conflicts(&proposed((9, 0), (10, 0)), &b);
    assert!(conflicts.is_empty(), "adjacent intervals must not conflict");
}

#[test]
fn containing_busy_interval_reports_proposed_length() {
    let conflicts = find_conflicts(
        &proposed((10, 0), (10, 45)),
        &[busy((9, 0), (12, 0)).with_summary("Offsite")],
    );

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_minutes, 45);
    assert_eq!(conflicts[0].busy.summary.as_deref(), Some("Offsite"));
}

#[test]
fn every_overlapping_interval_reported_in_input_order() {
    let b = vec![
        busy((13, 0), (14, 0)),
        busy((9, 0), (9, 15)),
        busy((9, 45), (10, 15)),
    ];
    let conflicts = find_conflicts(&proposed((9, 0), (13, 30)), &b);

    assert_eq!(conflicts.len(), 3);
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert_eq!(conflicts[1].overlap_minutes, 15);
    assert_eq!(conflicts[2].overlap_minutes, 30);
}
