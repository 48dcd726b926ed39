use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use pitchside_backend::db::LeagueStore;
use pitchside_backend::models::league::{
    League, LeagueStatus, Match, PaymentStatus, Registration, Team,
};

/// Store calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    FetchRegistrations,
    InsertTeams,
    MarkConverted,
    InsertMatches,
    SetStatus,
}

#[derive(Default)]
struct State {
    leagues: HashMap<Uuid, League>,
    registrations: Vec<Registration>,
    teams: Vec<Team>,
    matches: Vec<Match>,
    fail_at: Option<FailPoint>,
}

/// In-memory `LeagueStore` mirroring the Postgres constraints that matter to
/// finalization: one team per registration and one match per unordered pair.
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    state: Arc<Mutex<State>>,
    yield_between_calls: bool,
}

impl MemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call yields to the runtime first, so concurrent runs joined on
    /// one task interleave at each store call.
    pub fn interleaving() -> Self {
        Self {
            yield_between_calls: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    async fn enter(&self, point: Option<FailPoint>) -> Result<(), sqlx::Error> {
        if self.yield_between_calls {
            tokio::task::yield_now().await;
        }
        match (point, self.lock().fail_at) {
            (Some(point), Some(fail_at)) if point == fail_at => {
                Err(sqlx::Error::Protocol(format!("injected failure at {:?}", point)))
            }
            _ => Ok(()),
        }
    }

    pub fn fail_at(&self, point: FailPoint) {
        self.lock().fail_at = Some(point);
    }

    pub fn clear_failure(&self) {
        self.lock().fail_at = None;
    }

    pub fn add_league(&self, name: &str, start_date: NaiveDate) -> League {
        let now = Utc::now();
        let league = League {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date,
            status: LeagueStatus::Setup,
            finalization_started_at: None,
            created_at: now,
            updated_at: now,
        };
        self.lock().leagues.insert(league.id, league.clone());
        league
    }

    /// Registrations are spaced a second apart so creation order is stable
    pub fn add_registrations(&self, league_id: Uuid, count: usize, payment_status: PaymentStatus) -> Vec<Registration> {
        let mut state = self.lock();
        let base = Utc::now() - Duration::days(1) + Duration::seconds(state.registrations.len() as i64);
        let registrations: Vec<Registration> = (0..count)
            .map(|i| {
                let number = state.registrations.len() + i + 1;
                Registration {
                    id: Uuid::new_v4(),
                    league_id,
                    team_name: format!("  Team {}  ", number),
                    captain_name: format!("Captain {}", number),
                    captain_email: format!("captain{}@example.com", number),
                    captain_phone: None,
                    roster: vec![format!("Player {}a", number), format!("Player {}b", number)],
                    payment_status,
                    team_created: false,
                    created_at: base + Duration::seconds(i as i64),
                }
            })
            .collect();
        state.registrations.extend(registrations.iter().cloned());
        registrations
    }

    pub fn set_claim(&self, league_id: Uuid, started_at: Option<DateTime<Utc>>) {
        if let Some(league) = self.lock().leagues.get_mut(&league_id) {
            league.finalization_started_at = started_at;
        }
    }

    pub fn league(&self, league_id: Uuid) -> Option<League> {
        self.lock().leagues.get(&league_id).cloned()
    }

    pub fn registrations(&self, league_id: Uuid) -> Vec<Registration> {
        self.lock()
            .registrations
            .iter()
            .filter(|r| r.league_id == league_id)
            .cloned()
            .collect()
    }

    pub fn team_count(&self, league_id: Uuid) -> usize {
        self.lock().teams.iter().filter(|t| t.league_id == league_id).count()
    }

    pub fn match_count(&self, league_id: Uuid) -> usize {
        self.lock().matches.iter().filter(|m| m.league_id == league_id).count()
    }
}

fn unordered(home: Uuid, away: Uuid) -> (Uuid, Uuid) {
    if home < away { (home, away) } else { (away, home) }
}

impl LeagueStore for MemoryLeagueStore {
    async fn get_league(&self, league_id: Uuid) -> Result<Option<League>, sqlx::Error> {
        self.enter(None).await?;
        Ok(self.lock().leagues.get(&league_id).cloned())
    }

    async fn get_paid_unconverted_registrations(&self, league_id: Uuid) -> Result<Vec<Registration>, sqlx::Error> {
        self.enter(Some(FailPoint::FetchRegistrations)).await?;
        let mut eligible: Vec<Registration> = self
            .lock()
            .registrations
            .iter()
            .filter(|r| r.league_id == league_id && r.is_eligible())
            .cloned()
            .collect();
        eligible.sort_by_key(|r| (r.created_at, r.id));
        Ok(eligible)
    }

    async fn insert_teams(&self, teams: &[Team]) -> Result<(), sqlx::Error> {
        self.enter(Some(FailPoint::InsertTeams)).await?;
        let mut state = self.lock();
        for team in teams {
            if state.teams.iter().any(|t| t.registration_id == team.registration_id) {
                return Err(sqlx::Error::Protocol(format!(
                    "duplicate team for registration {}",
                    team.registration_id
                )));
            }
        }
        state.teams.extend(teams.iter().cloned());
        Ok(())
    }

    async fn mark_registrations_converted(&self, registration_ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        self.enter(Some(FailPoint::MarkConverted)).await?;
        let mut converted = 0;
        for registration in self.lock().registrations.iter_mut() {
            if registration_ids.contains(&registration.id) && !registration.team_created {
                registration.team_created = true;
                converted += 1;
            }
        }
        Ok(converted)
    }

    async fn insert_matches(&self, matches: &[Match]) -> Result<(), sqlx::Error> {
        self.enter(Some(FailPoint::InsertMatches)).await?;
        let mut state = self.lock();
        for game in matches {
            let pair = unordered(game.home_team_id, game.away_team_id);
            let taken = state.matches.iter().any(|m| {
                m.league_id == game.league_id && unordered(m.home_team_id, m.away_team_id) == pair
            });
            if game.home_team_id == game.away_team_id || taken {
                return Err(sqlx::Error::Protocol(format!("match {} violates pair constraint", game.id)));
            }
        }
        state.matches.extend(matches.iter().cloned());
        Ok(())
    }

    async fn set_league_status(&self, league_id: Uuid, status: LeagueStatus) -> Result<(), sqlx::Error> {
        self.enter(Some(FailPoint::SetStatus)).await?;
        let mut state = self.lock();
        let league = state.leagues.get_mut(&league_id).ok_or(sqlx::Error::RowNotFound)?;
        league.status = status;
        if status == LeagueStatus::Active {
            league.finalization_started_at = None;
        }
        league.updated_at = Utc::now();
        Ok(())
    }

    async fn try_claim_finalization(&self, league_id: Uuid, lease: Duration) -> Result<bool, sqlx::Error> {
        self.enter(None).await?;
        let now = Utc::now();
        let mut state = self.lock();
        let Some(league) = state.leagues.get_mut(&league_id) else {
            return Ok(false);
        };
        let free = match league.finalization_started_at {
            None => true,
            Some(started_at) => started_at < now - lease,
        };
        if league.status == LeagueStatus::Setup && free {
            league.finalization_started_at = Some(now);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn release_finalization(&self, league_id: Uuid) -> Result<(), sqlx::Error> {
        self.enter(None).await?;
        if let Some(league) = self.lock().leagues.get_mut(&league_id) {
            league.finalization_started_at = None;
        }
        Ok(())
    }

    async fn get_teams(&self, league_id: Uuid) -> Result<Vec<Team>, sqlx::Error> {
        self.enter(None).await?;
        Ok(self
            .lock()
            .teams
            .iter()
            .filter(|t| t.league_id == league_id)
            .cloned()
            .collect())
    }

    async fn get_matches(&self, league_id: Uuid) -> Result<Vec<Match>, sqlx::Error> {
        self.enter(None).await?;
        let mut matches: Vec<Match> = self
            .lock()
            .matches
            .iter()
            .filter(|m| m.league_id == league_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order within a week
        matches.sort_by_key(|m| m.week_number);
        Ok(matches)
    }
}
