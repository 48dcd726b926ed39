use chrono::{Duration, Utc};
use uuid::Uuid;
use crate::db::store::LeagueStore;
use crate::league::error::{FinalizeError, FinalizeStep, ScheduleError};
use crate::league::round_robin;
use crate::league::slots::{SlotAssigner, SlotDefaults};
use crate::league::validation::ScheduleValidator;
use crate::models::league::*;

/// Turns a league's paid registrations into teams and a persisted
/// round-robin schedule, then activates the league.
pub struct LeagueFinalizer<S> {
    store: S,
    slots: SlotAssigner,
    validator: ScheduleValidator,
    lease: Duration,
}

impl<S: LeagueStore> LeagueFinalizer<S> {
    pub fn new(store: S, defaults: SlotDefaults, lease: Duration) -> Self {
        Self {
            store,
            slots: SlotAssigner::new(defaults),
            validator: ScheduleValidator::new(),
            lease,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Finalize a league. Safe to call repeatedly: an active league is
    /// returned as is, and a run interrupted after team creation is resumed
    /// from the existing teams.
    #[tracing::instrument(name = "Finalizing league", skip(self))]
    pub async fn finalize(&self, league_id: Uuid) -> Result<FinalizedSchedule, FinalizeError> {
        let league = self.load_league(league_id).await?;

        if league.status == LeagueStatus::Active {
            tracing::info!("League {} is already active, returning existing schedule", league_id);
            return self.existing_schedule(league, FinalizeOutcome::AlreadyActive).await;
        }

        let claimed = self
            .store
            .try_claim_finalization(league_id, self.lease)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::ClaimLeague))?;
        if !claimed {
            tracing::warn!("League {} is already being finalized", league_id);
            return Err(FinalizeError::FinalizationInProgress(league_id));
        }

        let result = self.finalize_claimed(league).await;

        if let Err(e) = &result {
            tracing::error!("Finalization of league {} failed: {}", league_id, e);
            if let Err(release_err) = self.store.release_finalization(league_id).await {
                // The claim lapses on its own once the lease runs out
                tracing::error!("Failed to release finalization claim for league {}: {}", league_id, release_err);
            }
        }

        result
    }

    /// Current finalization state of a league, including the partial state
    /// left behind when match persistence failed after teams were committed.
    pub async fn schedule_state(&self, league_id: Uuid) -> Result<ScheduleState, FinalizeError> {
        let league = self.load_league(league_id).await?;
        let teams = self.load_teams(league_id).await?;
        let matches = self.load_matches(league_id).await?;

        let state = match (league.status, teams.len(), matches.len()) {
            (LeagueStatus::Active, team_count, match_count) => ScheduleState::Active { team_count, match_count },
            (LeagueStatus::Setup, 0, _) => ScheduleState::Pending,
            (LeagueStatus::Setup, team_count, 0) => ScheduleState::Partial { team_count },
            (LeagueStatus::Setup, team_count, match_count) => ScheduleState::Scheduled { team_count, match_count },
        };

        Ok(state)
    }

    /// Persisted teams and matches of a league
    pub async fn get_schedule(&self, league_id: Uuid) -> Result<LeagueScheduleResponse, FinalizeError> {
        let league = self.load_league(league_id).await?;
        let teams = self.load_teams(league_id).await?;
        let matches = self.load_matches(league_id).await?;
        let total_weeks = matches.iter().map(|m| m.week_number).max().unwrap_or(0);

        Ok(LeagueScheduleResponse {
            league,
            teams,
            matches,
            total_weeks,
        })
    }

    /// Dry run of pairing and slot assignment; nothing is persisted.
    pub fn preview(&self, request: &SchedulePreviewRequest) -> Result<SchedulePreviewResponse, ScheduleError> {
        let rounds = round_robin::generate_rounds(&request.team_ids)?;
        let total_weeks = rounds.len() as i32;
        let mut total_matches = 0;
        let mut weeks = Vec::with_capacity(rounds.len());

        for round in rounds {
            let matches = self.slots.assign(&round.pairings, request.start_date)?;
            total_matches += matches.len();
            weeks.push(PreviewWeek {
                week_number: round.week_number,
                scheduled_date: self.slots.date_for_week(request.start_date, round.week_number)?,
                matches,
                bye: round.bye,
            });
        }

        Ok(SchedulePreviewResponse {
            total_weeks,
            total_matches,
            weeks,
        })
    }

    async fn finalize_claimed(&self, league: League) -> Result<FinalizedSchedule, FinalizeError> {
        let existing_teams = self.load_teams(league.id).await?;

        let (teams, outcome) = if existing_teams.is_empty() {
            (self.materialize_teams(&league).await?, FinalizeOutcome::Created)
        } else {
            tracing::warn!(
                "League {} still in setup with {} teams already created, resuming interrupted finalization",
                league.id,
                existing_teams.len()
            );
            // The earlier run may have stopped before flipping its registrations
            let registration_ids: Vec<Uuid> = existing_teams.iter().map(|t| t.registration_id).collect();
            self.mark_converted(league.id, &registration_ids).await?;
            (existing_teams, FinalizeOutcome::Recovered)
        };

        let existing_matches = self.load_matches(league.id).await?;
        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let rounds = round_robin::generate_rounds(&team_ids)?;

        let matches = if existing_matches.is_empty() {
            let pairings: Vec<Pairing> = rounds.iter().flat_map(|r| r.pairings.iter().copied()).collect();
            let created_at = Utc::now();
            let matches: Vec<Match> = self
                .slots
                .assign(&pairings, league.start_date)?
                .into_iter()
                .map(|slot| slot.into_match(league.id, created_at))
                .collect();

            self.store
                .insert_matches(&matches)
                .await
                .map_err(FinalizeError::persistence(FinalizeStep::InsertMatches))?;

            tracing::info!(
                "Scheduled {} matches over {} weeks for league {}",
                matches.len(),
                rounds.len(),
                league.id
            );
            matches
        } else {
            tracing::warn!("League {} already has {} matches, only activating", league.id, existing_matches.len());
            existing_matches
        };

        self.store
            .set_league_status(league.id, LeagueStatus::Active)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::ActivateLeague))?;

        tracing::info!("League {} is now active", league.id);

        let league = League {
            status: LeagueStatus::Active,
            finalization_started_at: None,
            ..league
        };

        Ok(FinalizedSchedule {
            league,
            teams,
            matches,
            byes: byes_of(&rounds),
            outcome,
        })
    }

    /// Steps 2-4: eligible registrations become teams, then are marked converted.
    async fn materialize_teams(&self, league: &League) -> Result<Vec<Team>, FinalizeError> {
        let registrations = self
            .store
            .get_paid_unconverted_registrations(league.id)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::FetchRegistrations))?;

        if registrations.is_empty() {
            return Err(FinalizeError::NoEligibleRegistrations(league.id));
        }
        // Checked before anything is written
        if registrations.len() < 2 {
            return Err(ScheduleError::NotEnoughTeams { count: registrations.len() }.into());
        }

        let created_at = Utc::now();
        let teams: Vec<Team> = registrations
            .iter()
            .map(|registration| Team {
                id: Uuid::new_v4(),
                league_id: league.id,
                registration_id: registration.id,
                name: self.validator.team_name_for(registration),
                captain_name: registration.captain_name.clone(),
                captain_email: registration.captain_email.clone(),
                captain_phone: registration.captain_phone.clone(),
                roster: registration.roster.clone(),
                created_at,
            })
            .collect();

        self.store
            .insert_teams(&teams)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::InsertTeams))?;

        let registration_ids: Vec<Uuid> = registrations.iter().map(|r| r.id).collect();
        let converted = self.mark_converted(league.id, &registration_ids).await?;

        if converted != registration_ids.len() as u64 {
            tracing::warn!(
                "Expected to convert {} registrations for league {}, store converted {}",
                registration_ids.len(),
                league.id,
                converted
            );
        }

        tracing::info!("Created {} teams for league {}", teams.len(), league.id);
        Ok(teams)
    }

    /// Flip `team_created` on the source registrations. Already converted rows
    /// are skipped by the store, so calling this on recovery is harmless.
    async fn mark_converted(&self, league_id: Uuid, registration_ids: &[Uuid]) -> Result<u64, FinalizeError> {
        let converted = self
            .store
            .mark_registrations_converted(registration_ids)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::MarkRegistrationsConverted))?;

        if converted > 0 {
            tracing::info!("Marked {} registrations converted for league {}", converted, league_id);
        }
        Ok(converted)
    }

    async fn existing_schedule(&self, league: League, outcome: FinalizeOutcome) -> Result<FinalizedSchedule, FinalizeError> {
        let teams = self.load_teams(league.id).await?;
        let matches = self.load_matches(league.id).await?;
        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let byes = if team_ids.len() >= 2 {
            byes_of(&round_robin::generate_rounds(&team_ids)?)
        } else {
            Vec::new()
        };

        Ok(FinalizedSchedule {
            league,
            teams,
            matches,
            byes,
            outcome,
        })
    }

    async fn load_league(&self, league_id: Uuid) -> Result<League, FinalizeError> {
        self.store
            .get_league(league_id)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::FetchLeague))?
            .ok_or(FinalizeError::NotFound(league_id))
    }

    async fn load_teams(&self, league_id: Uuid) -> Result<Vec<Team>, FinalizeError> {
        self.store
            .get_teams(league_id)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::LoadSchedule))
    }

    async fn load_matches(&self, league_id: Uuid) -> Result<Vec<Match>, FinalizeError> {
        self.store
            .get_matches(league_id)
            .await
            .map_err(FinalizeError::persistence(FinalizeStep::LoadSchedule))
    }
}

fn byes_of(rounds: &[Round]) -> Vec<Bye> {
    rounds
        .iter()
        .filter_map(|round| {
            round.bye.map(|team_id| Bye {
                week_number: round.week_number,
                team_id,
            })
        })
        .collect()
}
