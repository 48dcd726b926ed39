//! Single round-robin pairing by the circle method.
//!
//! The last entry stays put while the others rotate one position per round.
//! An odd field gets a placeholder in that fixed position; whoever draws the
//! placeholder sits the week out and no pairing is produced for it.

use uuid::Uuid;
use crate::league::error::ScheduleError;
use crate::league::validation::ScheduleValidator;
use crate::models::league::{Pairing, Round};

/// Generate every round of a single round-robin over `team_ids`, in the order given.
/// Week numbers start at 1.
pub fn generate_rounds(team_ids: &[Uuid]) -> Result<Vec<Round>, ScheduleError> {
    ScheduleValidator::new().validate_team_ids(team_ids)?;

    let mut slots: Vec<Option<Uuid>> = team_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let total = slots.len();
    let rotating = total - 1;
    let fixed = slots[rotating];
    let mut rounds = Vec::with_capacity(rotating);

    for round in 0..rotating {
        // Bounded by MAX_TEAMS
        let week_number = (round + 1) as i32;
        let mut pairings = Vec::with_capacity(total / 2);
        let mut bye = None;

        for slot in 0..total / 2 {
            let (home, away) = if slot == 0 {
                // Fixed entry alternates sides so it is not away every week
                if round % 2 == 0 {
                    (slots[round], fixed)
                } else {
                    (fixed, slots[round])
                }
            } else {
                (
                    slots[(round + slot) % rotating],
                    slots[(rotating - slot + round) % rotating],
                )
            };

            match (home, away) {
                (Some(home_team_id), Some(away_team_id)) => pairings.push(Pairing {
                    home_team_id,
                    away_team_id,
                    week_number,
                }),
                (Some(team_id), None) | (None, Some(team_id)) => bye = Some(team_id),
                (None, None) => {}
            }
        }

        tracing::debug!(
            "Round {}: {} pairings, bye: {:?}",
            week_number,
            pairings.len(),
            bye
        );

        rounds.push(Round { week_number, pairings, bye });
    }

    Ok(rounds)
}

/// Flattened form of [`generate_rounds`], ordered by week then slot.
pub fn generate_pairings(team_ids: &[Uuid]) -> Result<Vec<Pairing>, ScheduleError> {
    Ok(generate_rounds(team_ids)?
        .into_iter()
        .flat_map(|round| round.pairings)
        .collect())
}

/// Number of weeks a single round-robin over `team_count` teams needs
pub fn total_weeks(team_count: usize) -> usize {
    match team_count {
        0 | 1 => 0,
        n if n % 2 == 0 => n - 1,
        n => n,
    }
}

/// Number of matches in a single round-robin: every pair once
pub fn total_matches(team_count: usize) -> usize {
    team_count * team_count.saturating_sub(1) / 2
}
