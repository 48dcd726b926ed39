use std::fmt;
use uuid::Uuid;
use thiserror::Error as ThisError;

/// Rejections raised by the pure scheduling code. These are caller bugs, not
/// runtime conditions: the orchestrator checks its inputs before reaching them.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("at least 2 teams are required to build a schedule, got {count}")]
    NotEnoughTeams { count: usize },

    #[error("team {0} appears more than once")]
    DuplicateTeam(Uuid),

    #[error("nil UUID is not a valid team id")]
    NilTeamId,

    #[error("week number must be at least 1, got {0}")]
    InvalidWeek(i32),

    #[error("at most {max} teams can share one schedule, got {count}")]
    TooManyTeams { count: usize, max: usize },

    #[error("week {0} falls outside the supported calendar range")]
    DateOutOfRange(i32),
}

/// Step of a finalization run, reported with persistence failures so the
/// caller knows how far the run got before the store refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeStep {
    FetchLeague,
    ClaimLeague,
    FetchRegistrations,
    InsertTeams,
    MarkRegistrationsConverted,
    InsertMatches,
    ActivateLeague,
    LoadSchedule,
}

impl FinalizeStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalizeStep::FetchLeague => "fetch_league",
            FinalizeStep::ClaimLeague => "claim_league",
            FinalizeStep::FetchRegistrations => "fetch_registrations",
            FinalizeStep::InsertTeams => "insert_teams",
            FinalizeStep::MarkRegistrationsConverted => "mark_registrations_converted",
            FinalizeStep::InsertMatches => "insert_matches",
            FinalizeStep::ActivateLeague => "activate_league",
            FinalizeStep::LoadSchedule => "load_schedule",
        }
    }

    /// Teams are committed before `MarkRegistrationsConverted`, so failures from
    /// that step onward leave them behind and a retry resumes from them.
    pub fn leaves_partial_state(&self) -> bool {
        matches!(
            self,
            FinalizeStep::MarkRegistrationsConverted | FinalizeStep::InsertMatches | FinalizeStep::ActivateLeague
        )
    }
}

impl fmt::Display for FinalizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, ThisError)]
pub enum FinalizeError {
    #[error("invalid schedule input: {0}")]
    InvalidInput(#[from] ScheduleError),

    #[error("league {0} not found")]
    NotFound(Uuid),

    #[error("league {0} has no paid registrations waiting to become teams")]
    NoEligibleRegistrations(Uuid),

    #[error("league {0} is already being finalized")]
    FinalizationInProgress(Uuid),

    #[error("store failure during {step}: {source}")]
    Persistence {
        step: FinalizeStep,
        #[source]
        source: sqlx::Error,
    },
}

impl FinalizeError {
    pub fn persistence(step: FinalizeStep) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| FinalizeError::Persistence { step, source }
    }
}
