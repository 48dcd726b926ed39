// src/routes/league.rs
use actix_web::web;

use crate::db::store::LeagueStore;
use crate::handlers::league::schedule_handler;

/// League finalization and schedule routes. Handlers are generic over the
/// store, so they are registered as resources rather than attribute macros.
pub fn configure<S: LeagueStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leagues")
            .service(
                web::resource("/{league_id}/finalize")
                    .route(web::post().to(schedule_handler::finalize_league::<S>))
            )
            .service(
                web::resource("/{league_id}/schedule")
                    .route(web::get().to(schedule_handler::get_league_schedule::<S>))
            )
            .service(
                web::resource("/{league_id}/schedule_state")
                    .route(web::get().to(schedule_handler::get_schedule_state::<S>))
            )
    );
    cfg.service(
        web::resource("/schedule/preview")
            .route(web::post().to(schedule_handler::preview_schedule::<S>))
    );
}
