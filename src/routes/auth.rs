use crate::{
    auth::{issue_token, verify_password, CurrentUser, LoginRequest, TokenResponse},
    config::AuthConfig,
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::PgPool;

/// Exchanges email + password for a bearer access token.
///
/// The form is OAuth2 password-flow shaped: `username` carries the email.
/// An unknown email and a wrong password produce the same 401 response, so
/// the endpoint never confirms whether an account exists.
#[post("/token")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<AuthConfig>,
    login_data: web::Form<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(&login_data.username)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) if verify_password(&login_data.password, &user.password) => {
            let token = issue_token(&user.email, Utc::now(), &config)?;
            Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
        }
        _ => Err(AppError::Unauthorized("Incorrect email or password".into())),
    }
}

/// Issues a fresh access token for the authenticated caller.
///
/// The incoming token must still be valid; an expired token fails here with
/// the same 401 as everywhere else, so refresh cannot resurrect a dead
/// session.
#[post("/refresh_token")]
pub async fn refresh_access_token(
    config: web::Data<AuthConfig>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let token = issue_token(&current_user.0.email, Utc::now(), &config)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
