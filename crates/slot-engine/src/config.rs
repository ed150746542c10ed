//! Scheduler configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! timezone = "Asia/Kolkata"
//! max_results = 10
//! default_duration_minutes = 60
//! dst_policy = "wall_clock"
//!
//! [business_hours]
//! start_hour = 9
//! end_hour = 18
//!
//! [calendar]
//! offline = false
//! file = "calendar.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::finder::{BusinessHours, SlotFinder, DEFAULT_MAX_RESULTS};
use crate::zone::{SchedulingZone, DEFAULT_TIMEZONE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// IANA zone all scheduling is anchored to.
    pub timezone: String,
    pub business_hours: BusinessHours,
    pub max_results: usize,
    pub default_duration_minutes: i64,
    pub dst_policy: DstPolicy,
    pub calendar: CalendarConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            business_hours: BusinessHours::default(),
            max_results: DEFAULT_MAX_RESULTS,
            default_duration_minutes: 60,
            dst_policy: DstPolicy::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

/// Which calendar backend to talk to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Use the canned offline calendar instead of a real one.
    pub offline: bool,
    /// Path of a JSON calendar file.
    pub file: Option<PathBuf>,
}

impl SchedulerConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` on malformed TOML, or the validation error
    /// from [`SchedulerConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SlotError::Parse(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.business_hours.validate()?;
        self.zone()?;
        if self.default_duration_minutes <= 0 {
            return Err(SlotError::InvalidArgument(format!(
                "default_duration_minutes must be positive, got {}",
                self.default_duration_minutes
            )));
        }
        Ok(())
    }

    pub fn zone(&self) -> Result<SchedulingZone> {
        Ok(SchedulingZone::parse(&self.timezone)?.with_policy(self.dst_policy))
    }

    pub fn finder(&self) -> Result<SlotFinder> {
        SlotFinder::new(self.business_hours)
    }
}
