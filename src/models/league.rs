// src/models/league.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use std::fmt;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: LeagueStatus,
    pub finalization_started_at: Option<DateTime<Utc>>, // Claim held by a running finalization
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeagueStatus {
    Setup,
    Active,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Registration {
    pub id: Uuid,
    pub league_id: Uuid,
    pub team_name: String,
    pub captain_name: String,
    pub captain_email: String,
    pub captain_phone: Option<String>,
    pub roster: Vec<String>,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub team_created: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl Registration {
    /// Paid and not yet turned into a team
    pub fn is_eligible(&self) -> bool {
        self.payment_status == PaymentStatus::Paid && !self.team_created
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub league_id: Uuid,
    pub registration_id: Uuid,
    pub name: String,
    pub captain_name: String,
    pub captain_email: String,
    pub captain_phone: Option<String>,
    pub roster: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One scheduled match-up before it is placed on the calendar.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pairing {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub week_number: i32,
}

/// All pairings of one week plus the team sitting out, if any.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Round {
    pub week_number: i32,
    pub pairings: Vec<Pairing>,
    pub bye: Option<Uuid>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub week_number: i32,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub location: String,
    #[sqlx(try_from = "String")]
    pub status: MatchStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A pairing placed on the calendar, not yet persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchSlot {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub week_number: i32,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub location: String,
}

impl MatchSlot {
    pub fn into_match(self, league_id: Uuid, created_at: DateTime<Utc>) -> Match {
        Match {
            id: Uuid::new_v4(),
            league_id,
            home_team_id: self.home_team_id,
            away_team_id: self.away_team_id,
            week_number: self.week_number,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            location: self.location,
            status: MatchStatus::Scheduled,
            home_score: None,
            away_score: None,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeOutcome {
    Created,   // Teams materialized and schedule generated in this run
    Recovered, // Teams from an interrupted run were scheduled
    AlreadyActive,
}

/// Weekly bye of a team in an odd-sized league
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Bye {
    pub week_number: i32,
    pub team_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FinalizedSchedule {
    pub league: League,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub byes: Vec<Bye>,
    pub outcome: FinalizeOutcome,
}

/// Where a league stands with respect to finalization.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ScheduleState {
    /// Still in setup, nothing materialized yet
    Pending,
    /// Teams exist but no matches: an earlier run stopped after materializing teams
    Partial { team_count: usize },
    /// Teams and matches exist but the league was never activated
    Scheduled { team_count: usize, match_count: usize },
    Active { team_count: usize, match_count: usize },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeagueScheduleResponse {
    pub league: League,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub total_weeks: i32,
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchedulePreviewRequest {
    pub team_ids: Vec<Uuid>,
    pub start_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewWeek {
    pub week_number: i32,
    pub scheduled_date: NaiveDate,
    pub matches: Vec<MatchSlot>,
    pub bye: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SchedulePreviewResponse {
    pub total_weeks: i32,
    pub total_matches: usize,
    pub weeks: Vec<PreviewWeek>,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownStatus {
    kind: &'static str,
    value: String,
}

// Helper implementations
impl LeagueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeagueStatus::Setup => "setup",
            LeagueStatus::Active => "active",
        }
    }
}

impl TryFrom<String> for LeagueStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "setup" => Ok(LeagueStatus::Setup),
            "active" => Ok(LeagueStatus::Active),
            _ => Err(UnknownStatus { kind: "league status", value: s }),
        }
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(UnknownStatus { kind: "payment status", value: s }),
        }
    }
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<String> for MatchStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "in_progress" => Ok(MatchStatus::InProgress),
            "completed" => Ok(MatchStatus::Completed),
            "cancelled" => Ok(MatchStatus::Cancelled),
            _ => Err(UnknownStatus { kind: "match status", value: s }),
        }
    }
}

impl fmt::Display for LeagueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {}: {} vs {}", self.week_number, self.home_team_id, self.away_team_id)
    }
}
