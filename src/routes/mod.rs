use actix_web::web;

pub mod backend_health;
pub mod league;

use crate::db::store::LeagueStore;

pub fn init_routes<S: LeagueStore + 'static>(cfg: &mut web::ServiceConfig) {
    backend_health::configure(cfg);

    league::configure::<S>(cfg);
}
