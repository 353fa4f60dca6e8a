//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;


use actix_web::{HttpRequest, error::JsonPayloadError, web};

use crate::middleware::error::AppError;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                .route("/users/{id}/posts", web::get().to(posts::by_user))
                // Literal segments before `{id}`
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/search", web::get().to(posts::search))
                        .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                        .route("/{id}", web::get().to(posts::get_by_id))
                        .route("/{id}", web::put().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete))
                        .route("/{id}/like", web::post().to(posts::like)),
                ),
        );
}
