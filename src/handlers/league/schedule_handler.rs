use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;
use crate::db::store::LeagueStore;
use crate::league::{FinalizeError, LeagueFinalizer, ScheduleError};
use crate::models::common::ApiResponse;
use crate::models::league::SchedulePreviewRequest;

/// POST /leagues/{league_id}/finalize
pub async fn finalize_league<S: LeagueStore + 'static>(
    path: web::Path<Uuid>,
    finalizer: web::Data<LeagueFinalizer<S>>,
) -> Result<HttpResponse> {
    let league_id = path.into_inner();

    match finalizer.finalize(league_id).await {
        Ok(schedule) => {
            tracing::info!(
                "Finalize request for league {} finished: {:?}, {} teams, {} matches",
                league_id,
                schedule.outcome,
                schedule.teams.len(),
                schedule.matches.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success("League finalized", schedule)))
        }
        Err(e) => Ok(finalize_error_response(&e)),
    }
}

/// GET /leagues/{league_id}/schedule
pub async fn get_league_schedule<S: LeagueStore + 'static>(
    path: web::Path<Uuid>,
    finalizer: web::Data<LeagueFinalizer<S>>,
) -> Result<HttpResponse> {
    let league_id = path.into_inner();

    match finalizer.get_schedule(league_id).await {
        Ok(schedule) => Ok(HttpResponse::Ok().json(ApiResponse::success("League schedule", schedule))),
        Err(e) => Ok(finalize_error_response(&e)),
    }
}

/// GET /leagues/{league_id}/schedule_state
pub async fn get_schedule_state<S: LeagueStore + 'static>(
    path: web::Path<Uuid>,
    finalizer: web::Data<LeagueFinalizer<S>>,
) -> Result<HttpResponse> {
    let league_id = path.into_inner();

    match finalizer.schedule_state(league_id).await {
        Ok(state) => Ok(HttpResponse::Ok().json(ApiResponse::success("Schedule state", state))),
        Err(e) => Ok(finalize_error_response(&e)),
    }
}

/// POST /schedule/preview
pub async fn preview_schedule<S: LeagueStore + 'static>(
    body: web::Json<SchedulePreviewRequest>,
    finalizer: web::Data<LeagueFinalizer<S>>,
) -> Result<HttpResponse> {
    match finalizer.preview(&body) {
        Ok(preview) => Ok(HttpResponse::Ok().json(ApiResponse::success("Schedule preview", preview))),
        Err(e) => {
            tracing::warn!("Rejected schedule preview: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
    }
}

/// Map finalization failures to status codes. Persistence failures name the
/// step that failed so the caller can tell whether teams were already committed.
fn finalize_error_response(error: &FinalizeError) -> HttpResponse {
    match error {
        FinalizeError::InvalidInput(ScheduleError::NotEnoughTeams { count }) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error_with_message(
                "Not enough teams to schedule",
                format!("At least 2 paid registrations are required, found {}", count),
            ))
        }
        FinalizeError::InvalidInput(e) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string()))
        }
        FinalizeError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error("League not found"))
        }
        FinalizeError::NoEligibleRegistrations(_) => {
            HttpResponse::UnprocessableEntity().json(ApiResponse::<()>::error(error.to_string()))
        }
        FinalizeError::FinalizationInProgress(_) => {
            HttpResponse::Conflict().json(ApiResponse::<()>::error(error.to_string()))
        }
        FinalizeError::Persistence { step, source } => {
            tracing::error!("Database error during {}: {}", step, source);
            let message = if step.leaves_partial_state() {
                format!("Database error during {}; teams were kept and a retry will resume", step)
            } else {
                format!("Database error during {}", step)
            };
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_with_message(
                message,
                step.as_str(),
            ))
        }
    }
}
