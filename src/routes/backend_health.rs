use actix_web::web;

use crate::handlers::backend_health_handler::backend_health_check;

/// Liveness probe; answers without touching the store
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/backend_health")
            .route(web::get().to(backend_health_check))
            .route(web::head().to(backend_health_check)),
    );
}
