use crate::{
    auth::{hash_password, CurrentUser},
    error::AppError,
    models::{FilterPage, User, UserInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

const USER_COLUMNS: &str = "id, username, email, password, created_at, updated_at";

/// Registers a new user account.
///
/// Checks both uniqueness invariants with a single username-OR-email lookup;
/// when both collide, the username conflict is reported. The password is
/// stored bcrypt-hashed, never in plaintext.
///
/// ## Responses:
/// - `201 Created`: the new user (without the password hash).
/// - `409 Conflict`: `Username already exists` / `Email already exists`.
/// - `422 Unprocessable Entity`: input validation failed.
#[post("")]
pub async fn create_user(
    pool: web::Data<PgPool>,
    user_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let existing = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2"
    ))
    .bind(&user_data.username)
    .bind(&user_data.email)
    .fetch_optional(&**pool)
    .await?;

    if let Some(existing) = existing {
        if existing.username == user_data.username {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password(&user_data.password)?;

    // A concurrent registration can still slip past the lookup above; the
    // unique constraints are the last line of defense and surface as 409 via
    // the From<sqlx::Error> conversion.
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&user_data.username)
    .bind(&user_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(user))
}

/// Lists users with offset/limit pagination. No authentication required.
#[get("")]
pub async fn read_users(
    pool: web::Data<PgPool>,
    query: web::Query<FilterPage>,
) -> Result<impl Responder, AppError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2"
    ))
    .bind(query.offset)
    .bind(query.limit)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

/// Fetches a single user by id. No authentication required.
#[get("/{id}")]
pub async fn read_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id.into_inner())
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

/// Replaces the authenticated user's profile. Full-replace semantics: all of
/// username, email and password are overwritten, with the password re-hashed.
///
/// ## Responses:
/// - `200 OK`: the updated user.
/// - `403 Forbidden`: the path id does not match the authenticated caller.
/// - `409 Conflict`: the new username or email collides with another user.
/// - `422 Unprocessable Entity`: input validation failed.
#[put("/{id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    user_data: web::Json<UserInput>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    if current_user.0.id != *user_id {
        return Err(AppError::Forbidden("Not enough permissions".into()));
    }

    let password_hash = hash_password(&user_data.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET username = $1, email = $2, password = $3, updated_at = now() \
         WHERE id = $4 RETURNING {USER_COLUMNS}"
    ))
    .bind(&user_data.username)
    .bind(&user_data.email)
    .bind(&password_hash)
    .bind(current_user.0.id)
    .fetch_one(&**pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Username or Email already exists".into())
        }
        _ => AppError::from(e),
    })?;

    Ok(HttpResponse::Ok().json(user))
}

/// Deletes the authenticated user's account. Owned todos are removed by the
/// database's cascade rule.
///
/// ## Responses:
/// - `200 OK`: `{"message": "User deleted"}`.
/// - `403 Forbidden`: the path id does not match the authenticated caller.
#[delete("/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    if current_user.0.id != *user_id {
        return Err(AppError::Forbidden("Not enough permissions".into()));
    }

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(current_user.0.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}
