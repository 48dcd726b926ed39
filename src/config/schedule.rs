use chrono::{Duration, NaiveTime};
use serde::Deserialize;

use crate::league::slots::SlotDefaults;

/// Facility defaults for generated matches and the finalization claim lease
#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSettings {
    pub default_match_time: NaiveTime,
    pub default_location: String,
    pub finalization_lease_seconds: u32,
}

impl ScheduleSettings {
    pub fn slot_defaults(&self) -> SlotDefaults {
        SlotDefaults {
            match_time: self.default_match_time,
            location: self.default_location.trim().to_string(),
        }
    }

    pub fn finalization_lease(&self) -> Duration {
        Duration::seconds(i64::from(self.finalization_lease_seconds))
    }
}
