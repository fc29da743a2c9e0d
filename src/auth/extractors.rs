use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::token::validate_token;
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::User;

/// The authenticated caller, resolved from the request's bearer token.
///
/// This extractor is the sole gate between the transport layer and any handler
/// that requires an authenticated user. It pulls the token from the
/// `Authorization: Bearer <token>` header, validates it against the server's
/// signing config, and looks the subject email up in the database.
///
/// Every failure mode — missing header, bad signature, expired token, unknown
/// subject — produces the same `401 Could not validate credentials` response,
/// so a caller cannot tell which check failed.
#[derive(Debug)]
pub struct CurrentUser(pub User);

fn credentials_error() -> AppError {
    AppError::Unauthorized("Could not validate credentials".into())
}

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError is converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("Database pool not configured".into())
                })?;
            let config = req
                .app_data::<web::Data<AuthConfig>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("Auth config not configured".into())
                })?;

            // Scheme matching is case-insensitive: "bearer" and "Bearer"
            // are both accepted.
            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| {
                    let (scheme, token) = value.split_once(' ')?;
                    scheme.eq_ignore_ascii_case("bearer").then_some(token)
                })
                .ok_or_else(credentials_error)?;

            let subject = validate_token(token, Utc::now(), &config)
                .map_err(|_| credentials_error())?;

            let user = sqlx::query_as::<_, User>(
                "SELECT id, username, email, password, created_at, updated_at \
                 FROM users WHERE email = $1",
            )
            .bind(&subject)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(AppError::from)?;

            match user {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(credentials_error().into()),
            }
        })
    }
}
