//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod users;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{AppError, AppResult, json_error, path_error};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/health", web::get().to(health::health_check))
        .route("/users-list/", web::get().to(users::list))
        .route("/users-detail/{id}/", web::get().to(users::retrieve))
        .service(
            web::resource("/posts/")
                .route(web::get().to(posts::list))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{id}/")
                .route(web::get().to(posts::retrieve))
                .route(web::put().to(posts::replace))
                .route(web::patch().to(posts::patch))
                .route(web::delete().to(posts::delete)),
        )
        .service(
            web::resource("/comments/")
                .route(web::get().to(comments::list))
                .route(web::post().to(comments::create)),
        )
        .service(
            web::resource("/comments/{id}/")
                .route(web::get().to(comments::retrieve))
                .route(web::put().to(comments::replace))
                .route(web::patch().to(comments::patch))
                .route(web::delete().to(comments::delete)),
        )
        .service(
            web::resource("/categories/")
                .route(web::get().to(categories::list))
                .route(web::post().to(categories::create)),
        )
        .service(
            web::resource("/categories/{id}/")
                .route(web::get().to(categories::retrieve))
                .route(web::put().to(categories::replace))
                .route(web::patch().to(categories::patch))
                .route(web::delete().to(categories::delete)),
        )
        .service(
            web::scope("/api/v1/auth")
                .route("/register", web::post().to(auth::register))
                .route("/token", web::post().to(auth::login))
                .route("/token/refresh", web::post().to(auth::refresh))
                .service(
                    web::resource("/me")
                        .route(web::get().to(auth::me))
                        .route(web::delete().to(auth::delete_me)),
                ),
        );
}

/// Fallback for paths no route matches.
pub async fn not_found() -> AppResult<actix_web::HttpResponse> {
    Err(AppError::NotFound("No resource matches the given path.".to_string()))
}
