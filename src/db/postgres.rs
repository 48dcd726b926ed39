use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;
use crate::db::store::LeagueStore;
use crate::models::league::{League, LeagueStatus, Match, PaymentStatus, Registration, Team};

/// Postgres-backed league store
#[derive(Debug, Clone)]
pub struct PgLeagueStore {
    pool: PgPool,
}

impl PgLeagueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LeagueStore for PgLeagueStore {
    async fn get_league(&self, league_id: Uuid) -> Result<Option<League>, sqlx::Error> {
        sqlx::query_as::<_, League>(
            r#"
            SELECT id, name, start_date, status, finalization_started_at, created_at, updated_at
            FROM leagues
            WHERE id = $1
            "#,
        )
        .bind(league_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_paid_unconverted_registrations(&self, league_id: Uuid) -> Result<Vec<Registration>, sqlx::Error> {
        sqlx::query_as::<_, Registration>(
            r#"
            SELECT id, league_id, team_name, captain_name, captain_email, captain_phone,
                   roster, payment_status, team_created, created_at
            FROM league_registrations
            WHERE league_id = $1
            AND payment_status = $2
            AND team_created = FALSE
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(league_id)
        .bind(PaymentStatus::Paid.as_str())
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_teams(&self, teams: &[Team]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for team in teams {
            sqlx::query(
                r#"
                INSERT INTO teams (
                    id, league_id, registration_id, name, captain_name,
                    captain_email, captain_phone, roster, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(team.id)
            .bind(team.league_id)
            .bind(team.registration_id)
            .bind(&team.name)
            .bind(&team.captain_name)
            .bind(&team.captain_email)
            .bind(&team.captain_phone)
            .bind(&team.roster)
            .bind(team.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!("Inserted {} teams", teams.len());
        Ok(())
    }

    async fn mark_registrations_converted(&self, registration_ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let updated = sqlx::query(
            r#"
            UPDATE league_registrations
            SET team_created = TRUE
            WHERE id = ANY($1) AND team_created = FALSE
            "#,
        )
        .bind(registration_ids)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated)
    }

    async fn insert_matches(&self, matches: &[Match]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for game in matches {
            sqlx::query(
                r#"
                INSERT INTO matches (
                    id, league_id, home_team_id, away_team_id, week_number,
                    scheduled_date, scheduled_time, location, status, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(game.id)
            .bind(game.league_id)
            .bind(game.home_team_id)
            .bind(game.away_team_id)
            .bind(game.week_number)
            .bind(game.scheduled_date)
            .bind(game.scheduled_time)
            .bind(&game.location)
            .bind(game.status.as_str())
            .bind(game.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!("Inserted {} matches", matches.len());
        Ok(())
    }

    async fn set_league_status(&self, league_id: Uuid, status: LeagueStatus) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE leagues
            SET status = $1,
                finalization_started_at = CASE WHEN $1 = 'active' THEN NULL ELSE finalization_started_at END,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(status.as_str())
        .bind(league_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn try_claim_finalization(&self, league_id: Uuid, lease: Duration) -> Result<bool, sqlx::Error> {
        let claimed = sqlx::query(
            r#"
            UPDATE leagues
            SET finalization_started_at = NOW(), updated_at = NOW()
            WHERE id = $1
            AND status = 'setup'
            AND (
                finalization_started_at IS NULL
                OR finalization_started_at < NOW() - make_interval(secs => $2)
            )
            "#,
        )
        .bind(league_id)
        .bind(lease.num_seconds() as f64)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(claimed == 1)
    }

    async fn release_finalization(&self, league_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leagues SET finalization_started_at = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(league_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_teams(&self, league_id: Uuid) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, league_id, registration_id, name, captain_name, captain_email,
                   captain_phone, roster, created_at
            FROM teams
            WHERE league_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_matches(&self, league_id: Uuid) -> Result<Vec<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(
            r#"
            SELECT id, league_id, home_team_id, away_team_id, week_number, scheduled_date,
                   scheduled_time, location, status, home_score, away_score, created_at
            FROM matches
            WHERE league_id = $1
            ORDER BY week_number ASC, seq ASC
            "#,
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
    }
}
