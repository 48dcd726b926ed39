use chrono::{Days, NaiveDate, NaiveTime};
use crate::league::error::ScheduleError;
use crate::league::validation::ScheduleValidator;
use crate::models::league::{MatchSlot, Pairing};

/// Facility defaults attached to every generated match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDefaults {
    pub match_time: NaiveTime,
    pub location: String,
}

/// Service responsible for placing pairings on the calendar
pub struct SlotAssigner {
    defaults: SlotDefaults,
    validator: ScheduleValidator,
}

impl SlotAssigner {
    pub fn new(defaults: SlotDefaults) -> Self {
        Self {
            defaults,
            validator: ScheduleValidator::new(),
        }
    }

    /// Date of a week's matches: one week apart starting on `start_date`.
    pub fn date_for_week(&self, start_date: NaiveDate, week_number: i32) -> Result<NaiveDate, ScheduleError> {
        self.validator.validate_week_number(week_number)?;

        let days_to_add = 7 * u64::from((week_number - 1).unsigned_abs());
        start_date
            .checked_add_days(Days::new(days_to_add))
            .ok_or(ScheduleError::DateOutOfRange(week_number))
    }

    /// Attach date, default time and location to each pairing, preserving order
    pub fn assign(&self, pairings: &[Pairing], start_date: NaiveDate) -> Result<Vec<MatchSlot>, ScheduleError> {
        pairings
            .iter()
            .map(|pairing| {
                let scheduled_date = self.date_for_week(start_date, pairing.week_number)?;
                Ok(MatchSlot {
                    home_team_id: pairing.home_team_id,
                    away_team_id: pairing.away_team_id,
                    week_number: pairing.week_number,
                    scheduled_date,
                    scheduled_time: self.defaults.match_time,
                    location: self.defaults.location.clone(),
                })
            })
            .collect()
    }
}
