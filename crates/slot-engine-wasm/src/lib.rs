//! WASM bindings for slot-engine.
//!
//! Exposes free-slot finding and booking conflict detection to JavaScript via
//! `wasm-bindgen`. All complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! # Rename .js -> .cjs for ESM compatibility
//! mv packages/slot-engine-js/wasm/slot_engine_wasm.js \
//!    packages/slot-engine-js/wasm/slot_engine_wasm.cjs
//! ```

use serde::{Deserialize, Serialize};
use slot_engine::finder::DEFAULT_MAX_RESULTS;
use slot_engine::{BusyInterval, SchedulingZone, SearchWindow, TimeInterval};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

#[derive(Serialize)]
struct ConflictDto {
    start: String,
    end: String,
    summary: Option<String>,
    overlap_minutes: i64,
}

/// Input format for busy intervals passed from JavaScript.
#[derive(Deserialize)]
struct BusyInput {
    start: String,
    end: String,
    #[serde(default)]
    summary: Option<String>,
}

/// Convert a JSON array of `{start, end, summary?}` objects into busy intervals.
fn parse_busy_json(json: &str, zone: &SchedulingZone) -> Result<Vec<BusyInterval>, String> {
    let inputs: Vec<BusyInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid busy JSON: {}", e))?;

    inputs
        .iter()
        .map(|b| {
            BusyInterval::parse(zone, &b.start, &b.end, b.summary.as_deref())
                .map_err(|e| e.to_string())
        })
        .collect()
}

fn find_slots_json(
    window_start: &str,
    window_end: &str,
    busy_json: &str,
    duration_minutes: u32,
    timezone: &str,
    business_hours_only: bool,
    max_results: Option<u32>,
) -> Result<String, String> {
    let zone = SchedulingZone::parse(timezone).map_err(|e| e.to_string())?;
    let window = SearchWindow::parse(&zone, window_start, window_end).map_err(|e| e.to_string())?;
    let busy = parse_busy_json(busy_json, &zone)?;

    let duration = slot_engine::duration_from_minutes(i64::from(duration_minutes))
        .map_err(|e| e.to_string())?;

    let slots = slot_engine::find_slots(
        &window,
        &busy,
        duration,
        business_hours_only,
        max_results.map_or(DEFAULT_MAX_RESULTS, |n| n as usize),
    )
    .map_err(|e| e.to_string())?;

    let dtos: Vec<SlotDto> = slots
        .iter()
        .map(|s| SlotDto {
            start: s.start.to_rfc3339(),
            end: s.end.to_rfc3339(),
            duration_minutes: s.duration_minutes,
        })
        .collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

fn find_conflicts_json(
    start: &str,
    end: &str,
    busy_json: &str,
    timezone: &str,
) -> Result<String, String> {
    let zone = SchedulingZone::parse(timezone).map_err(|e| e.to_string())?;
    let proposed = TimeInterval::new(
        zone.parse_timestamp(start).map_err(|e| e.to_string())?,
        zone.parse_timestamp(end).map_err(|e| e.to_string())?,
    );
    let busy = parse_busy_json(busy_json, &zone)?;

    let dtos: Vec<ConflictDto> = slot_engine::find_conflicts(&proposed, &busy)
        .into_iter()
        .map(|c| ConflictDto {
            start: c.busy.start().to_rfc3339(),
            end: c.busy.end().to_rfc3339(),
            summary: c.busy.summary,
            overlap_minutes: c.overlap_minutes,
        })
        .collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find free meeting slots of exactly `duration_minutes` inside a window.
///
/// `busy_json` must be a JSON array of `{start, end, summary?}` objects.
/// Timestamps may be RFC 3339 or naive local time in `timezone`. Returns a JSON
/// string containing an array of `{start, end, duration_minutes}` objects.
///
/// # Arguments
/// - `window_start` / `window_end` -- Search window bounds
/// - `busy_json` -- Busy intervals
/// - `duration_minutes` -- Meeting length; must be positive
/// - `timezone` -- IANA timezone all computation is anchored to (e.g., "Asia/Kolkata")
/// - `business_hours_only` -- Keep only slots starting 09:00-18:00 local
/// - `max_results` -- Optional result cap (default 10)
#[wasm_bindgen(js_name = "findSlots")]
pub fn find_slots(
    window_start: &str,
    window_end: &str,
    busy_json: &str,
    duration_minutes: u32,
    timezone: &str,
    business_hours_only: bool,
    max_results: Option<u32>,
) -> Result<String, JsValue> {
    find_slots_json(
        window_start,
        window_end,
        busy_json,
        duration_minutes,
        timezone,
        business_hours_only,
        max_results,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Find the busy intervals a proposed booking would overlap.
///
/// Returns a JSON string containing an array of
/// `{start, end, summary, overlap_minutes}` objects.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    start: &str,
    end: &str,
    busy_json: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    find_conflicts_json(start, end, busy_json, timezone).map_err(|e| JsValue::from_str(&e))
}
