//! # slot-engine
//!
//! Deterministic free-slot finding for conversational scheduling assistants.
//!
//! A language model is good at understanding "find me an hour with Priya next
//! week" and bad at interval arithmetic. The slot engine takes the arithmetic
//! off its hands: given a search window, the calendar's busy intervals, and a
//! meeting duration, it returns a bounded list of exactly-bookable slots that
//! overlap nothing, anchored to one geographic time zone via `chrono-tz`.
//!
//! ## Modules
//!
//! - [`finder`] — Busy intervals → capped list of candidate slots
//! - [`interval`] — Zoned intervals, busy periods, windows, slots
//! - [`zone`] — Timestamp parsing and normalization into the scheduling zone
//! - [`dst`] — DST transition policies for naive local times
//! - [`conflict`] — Detect busy intervals a booking would overlap
//! - [`calendar`] — Calendar backend trait plus offline and JSON-file backends
//! - [`service`] — Scheduling service wiring a backend to the finder
//! - [`config`] — TOML configuration
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod finder;
pub mod interval;
pub mod service;
pub mod zone;

pub use calendar::{CalendarBackend, JsonFileCalendar, OfflineCalendar};
pub use config::SchedulerConfig;
pub use conflict::find_conflicts;
pub use error::SlotError;
pub use finder::{duration_from_minutes, find_slots, BusinessHours, SlotFinder};
pub use interval::{BusyInterval, CandidateSlot, SearchWindow, TimeInterval};
pub use service::SchedulingService;
pub use zone::SchedulingZone;
