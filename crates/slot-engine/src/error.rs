//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// Input rejected before any computation ran (non-positive duration,
    /// bad business hours, inverted booking, nonexistent local time).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A booking would overlap at least one busy interval.
    #[error("Conflict: {count} busy interval(s) overlap {start} - {end}")]
    Conflict {
        start: String,
        end: String,
        count: usize,
    },

    /// Failure reported by a calendar backend.
    #[error("Calendar error: {0}")]
    Calendar(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
