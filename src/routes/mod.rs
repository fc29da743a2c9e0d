pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use crate::error::AppError;
use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    // Undeserializable bodies and query strings are client input problems,
    // reported as 422 like validator failures, not actix's default 400.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::refresh_access_token),
    )
    .service(
        web::scope("/users")
            .service(users::create_user)
            .service(users::read_users)
            .service(users::read_user)
            .service(users::update_user)
            .service(users::delete_user),
    )
    .service(
        web::scope("/todos")
            .service(todos::create_todo)
            .service(todos::list_todos)
            .service(todos::patch_todo)
            .service(todos::delete_todo),
    );
}
