// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/session", web::get().to(handlers::get_session))
            .service(
                web::scope("/views")
                    .route("", web::post().to(handlers::open_view))
                    .route("/{id}", web::get().to(handlers::get_view))
                    .route("/{id}", web::delete().to(handlers::close_view))
                    .route("/{id}/file", web::post().to(handlers::select_file))
                    .route("/{id}/submit", web::post().to(handlers::submit))
            )
    )
    .route("/{_:.*}", web::get().to(handlers::static_file_handler));
}
