//! Persistence seam for league finalization.
//!
//! Every method is atomic on its own (all rows or none) but there is no
//! transaction spanning several calls; the finalizer orders its calls so a
//! failure can only leave teams without matches, never the reverse.

use std::future::Future;
use chrono::Duration;
use uuid::Uuid;
use crate::models::league::{League, LeagueStatus, Match, Registration, Team};

pub trait LeagueStore: Send + Sync {
    fn get_league(&self, league_id: Uuid) -> impl Future<Output = Result<Option<League>, sqlx::Error>> + Send;

    /// Paid registrations with `team_created = false`, oldest first
    fn get_paid_unconverted_registrations(
        &self,
        league_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Registration>, sqlx::Error>> + Send;

    fn insert_teams(&self, teams: &[Team]) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Flip `team_created` on the given registrations. Returns how many rows
    /// actually changed; rows already converted are left alone.
    fn mark_registrations_converted(
        &self,
        registration_ids: &[Uuid],
    ) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;

    fn insert_matches(&self, matches: &[Match]) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Set the league status. Activation also drops any finalization claim.
    fn set_league_status(
        &self,
        league_id: Uuid,
        status: LeagueStatus,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Atomic check-and-set: succeeds only for a league still in setup whose
    /// claim is absent or older than `lease`.
    fn try_claim_finalization(
        &self,
        league_id: Uuid,
        lease: Duration,
    ) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    fn release_finalization(&self, league_id: Uuid) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Teams of a league in creation order
    fn get_teams(&self, league_id: Uuid) -> impl Future<Output = Result<Vec<Team>, sqlx::Error>> + Send;

    /// Matches of a league ordered by week
    fn get_matches(&self, league_id: Uuid) -> impl Future<Output = Result<Vec<Match>, sqlx::Error>> + Send;
}
