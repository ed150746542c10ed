//! # slot-engine-python
//!
//! Python bindings for slot-engine, built with PyO3.
//!
//! Exposes the following functions to Python as the `slot_engine._native` module:
//!
//! - `find_slots(...)` -- free meeting slots -> JSON string of slots
//! - `find_conflicts(...)` -- busy intervals a booking would overlap -> JSON string

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Deserialize;
use slot_engine::finder::DEFAULT_MAX_RESULTS;
use slot_engine::{BusyInterval, SchedulingZone, SearchWindow, SlotError, TimeInterval};

#[derive(Deserialize)]
struct BusyInput {
    start: String,
    end: String,
    #[serde(default)]
    summary: Option<String>,
}

fn to_py_err(e: SlotError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_busy(busy_json: &str, zone: &SchedulingZone) -> PyResult<Vec<BusyInterval>> {
    let inputs: Vec<BusyInput> = serde_json::from_str(busy_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid busy JSON: {}", e)))?;

    inputs
        .iter()
        .map(|b| BusyInterval::parse(zone, &b.start, &b.end, b.summary.as_deref()).map_err(to_py_err))
        .collect()
}

/// Find free meeting slots of exactly `duration_minutes` inside a window.
///
/// Args:
///     window_start: Start of the search window (RFC 3339 or naive local time).
///     window_end: End of the search window.
///     busy_json: JSON array of `{start, end, summary?}` busy intervals.
///     duration_minutes: Meeting length in minutes; must be positive.
///     timezone: IANA timezone identifier. Default: "Asia/Kolkata".
///     business_hours_only: Keep only slots starting 09:00-18:00 local. Default: True.
///     max_results: Maximum number of slots. Default: 10.
///
/// Returns:
///     A JSON string containing an array of `{start, end, duration_minutes}` objects.
///
/// Raises:
///     ValueError: If a timestamp, the timezone, the JSON, or the duration is invalid.
#[pyfunction]
#[pyo3(signature = (window_start, window_end, busy_json, duration_minutes, timezone="Asia/Kolkata", business_hours_only=true, max_results=DEFAULT_MAX_RESULTS))]
fn find_slots(
    window_start: &str,
    window_end: &str,
    busy_json: &str,
    duration_minutes: i64,
    timezone: &str,
    business_hours_only: bool,
    max_results: usize,
) -> PyResult<String> {
    let zone = SchedulingZone::parse(timezone).map_err(to_py_err)?;
    let window = SearchWindow::parse(&zone, window_start, window_end).map_err(to_py_err)?;
    let busy = parse_busy(busy_json, &zone)?;

    let duration = slot_engine::duration_from_minutes(duration_minutes).map_err(to_py_err)?;

    let slots = slot_engine::find_slots(
        &window,
        &busy,
        duration,
        business_hours_only,
        max_results,
    )
    .map_err(to_py_err)?;

    let json_slots: Vec<serde_json::Value> = slots
        .iter()
        .map(|s| {
            serde_json::json!({
                "start": s.start.to_rfc3339(),
                "end": s.end.to_rfc3339(),
                "duration_minutes": s.duration_minutes,
            })
        })
        .collect();

    serde_json::to_string(&json_slots).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Find the busy intervals a proposed booking would overlap.
///
/// Args:
///     start: Proposed start (RFC 3339 or naive local time).
///     end: Proposed end.
///     busy_json: JSON array of `{start, end, summary?}` busy intervals.
///     timezone: IANA timezone identifier. Default: "Asia/Kolkata".
///
/// Returns:
///     A JSON string containing an array of `{start, end, summary, overlap_minutes}`.
///
/// Raises:
///     ValueError: If a timestamp, the timezone, or the JSON is invalid.
#[pyfunction]
#[pyo3(signature = (start, end, busy_json, timezone="Asia/Kolkata"))]
fn find_conflicts(start: &str, end: &str, busy_json: &str, timezone: &str) -> PyResult<String> {
    let zone = SchedulingZone::parse(timezone).map_err(to_py_err)?;
    let proposed = TimeInterval::new(
        zone.parse_timestamp(start).map_err(to_py_err)?,
        zone.parse_timestamp(end).map_err(to_py_err)?,
    );
    let busy = parse_busy(busy_json, &zone)?;

    let json_conflicts: Vec<serde_json::Value> = slot_engine::find_conflicts(&proposed, &busy)
        .into_iter()
        .map(|c| {
            serde_json::json!({
                "start": c.busy.start().to_rfc3339(),
                "end": c.busy.end().to_rfc3339(),
                "summary": c.busy.summary,
                "overlap_minutes": c.overlap_minutes,
            })
        })
        .collect();

    serde_json::to_string(&json_conflicts).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The native extension module, exposed as `slot_engine._native`.
#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_slots, m)?)?;
    m.add_function(wrap_pyfunction!(find_conflicts, m)?)?;
    Ok(())
}
