use std::collections::HashSet;
use uuid::Uuid;
use crate::league::error::ScheduleError;
use crate::models::league::Registration;

/// Upper bound on teams in one schedule; keeps week numbers well inside `i32`.
pub const MAX_TEAMS: usize = 1000;

const MAX_TEAM_NAME_LEN: usize = 100;

/// Centralized validation for schedule inputs
pub struct ScheduleValidator;

impl ScheduleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the ordered team list handed to the pairing algorithm
    pub fn validate_team_ids(&self, team_ids: &[Uuid]) -> Result<(), ScheduleError> {
        if team_ids.len() < 2 {
            return Err(ScheduleError::NotEnoughTeams { count: team_ids.len() });
        }

        if team_ids.len() > MAX_TEAMS {
            return Err(ScheduleError::TooManyTeams { count: team_ids.len(), max: MAX_TEAMS });
        }

        let mut unique_teams = HashSet::new();
        for team_id in team_ids {
            if team_id.is_nil() {
                return Err(ScheduleError::NilTeamId);
            }
            if !unique_teams.insert(team_id) {
                return Err(ScheduleError::DuplicateTeam(*team_id));
            }
        }

        Ok(())
    }

    /// Validate week number
    pub fn validate_week_number(&self, week_number: i32) -> Result<(), ScheduleError> {
        if week_number < 1 {
            return Err(ScheduleError::InvalidWeek(week_number));
        }
        Ok(())
    }

    /// Trim and strip null bytes
    pub fn sanitize_string_input(&self, input: &str) -> String {
        input
            .trim()
            .chars()
            .filter(|&c| c != '\0')
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Display name for the team materialized from a registration.
    /// Falls back to the captain when the registered name is blank.
    pub fn team_name_for(&self, registration: &Registration) -> String {
        let sanitized = self.sanitize_string_input(&registration.team_name);
        let name = if sanitized.is_empty() {
            format!("Team {}", self.sanitize_string_input(&registration.captain_name))
        } else {
            sanitized
        };

        name.chars().take(MAX_TEAM_NAME_LEN).collect()
    }
}

impl Default for ScheduleValidator {
    fn default() -> Self {
        Self::new()
    }
}
