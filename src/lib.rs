use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod db;
pub mod league;
pub mod telemetry;
use crate::routes::init_routes;
use crate::db::store::LeagueStore;
use crate::league::LeagueFinalizer;

pub fn run<S: LeagueStore + 'static>(
    listener: TcpListener,
    finalizer: LeagueFinalizer<S>,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let finalizer = web::Data::new(finalizer);

    let server = HttpServer::new( move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(finalizer.clone())
            .configure(init_routes::<S>)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
