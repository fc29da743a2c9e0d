use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Todo, TodoFilter, TodoInput, TodoUpdate},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

const TODO_COLUMNS: &str = "id, title, description, state, user_id, created_at, updated_at";

/// Creates a new todo owned by the authenticated user.
///
/// The owner is always the caller; the request body cannot assign a todo to
/// someone else.
///
/// ## Responses:
/// - `201 Created`: the new todo.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: input validation failed.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    todo_data: web::Json<TodoInput>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = sqlx::query_as::<_, Todo>(&format!(
        "INSERT INTO todos (title, description, state, user_id) VALUES ($1, $2, $3, $4) \
         RETURNING {TODO_COLUMNS}"
    ))
    .bind(&todo_data.title)
    .bind(&todo_data.description)
    .bind(todo_data.state)
    .bind(current_user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(todo))
}

/// Lists the authenticated user's todos.
///
/// Supports substring filters on `title` and `description`, an exact filter
/// on `state`, and offset/limit pagination. Conditions are appended
/// dynamically and bound positionally; every query is scoped to the caller's
/// own todos.
#[get("")]
pub async fn list_todos(
    pool: web::Data<PgPool>,
    query_params: web::Query<TodoFilter>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let mut sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1");
    let mut param_count = 2;

    if query_params.title.is_some() {
        sql.push_str(&format!(" AND title LIKE ${}", param_count));
        param_count += 1;
    }
    if query_params.description.is_some() {
        sql.push_str(&format!(" AND description LIKE ${}", param_count));
        param_count += 1;
    }
    if query_params.state.is_some() {
        sql.push_str(&format!(" AND state = ${}", param_count));
        param_count += 1;
    }

    sql.push_str(&format!(
        " ORDER BY id OFFSET ${} LIMIT ${}",
        param_count,
        param_count + 1
    ));

    let mut query_builder = sqlx::query_as::<_, Todo>(&sql).bind(current_user.0.id);

    if let Some(title) = &query_params.title {
        query_builder = query_builder.bind(format!("%{}%", title));
    }
    if let Some(description) = &query_params.description {
        query_builder = query_builder.bind(format!("%{}%", description));
    }
    if let Some(state) = query_params.state {
        query_builder = query_builder.bind(state);
    }

    let todos = query_builder
        .bind(query_params.offset)
        .bind(query_params.limit)
        .fetch_all(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "todos": todos })))
}

/// Partially updates one of the authenticated user's todos.
///
/// Patch semantics: only fields present in the request body are applied;
/// absent fields keep their stored values. The lookup is scoped by owner in a
/// single query, so another user's todo is indistinguishable from a missing
/// one.
///
/// ## Responses:
/// - `200 OK`: the updated todo.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: `Task not found` (nonexistent or owned by someone else).
/// - `422 Unprocessable Entity`: input validation failed.
#[patch("/{id}")]
pub async fn patch_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    todo_data: web::Json<TodoUpdate>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let todo_id = todo_id.into_inner();

    let existing = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND user_id = $2"
    ))
    .bind(todo_id)
    .bind(current_user.0.id)
    .fetch_optional(&**pool)
    .await?;

    let Some(existing) = existing else {
        return Err(AppError::NotFound("Task not found".into()));
    };

    let update = todo_data.into_inner();
    let title = update.title.unwrap_or(existing.title);
    let description = update.description.unwrap_or(existing.description);
    let state = update.state.unwrap_or(existing.state);

    let todo = sqlx::query_as::<_, Todo>(&format!(
        "UPDATE todos SET title = $1, description = $2, state = $3, updated_at = now() \
         WHERE id = $4 AND user_id = $5 RETURNING {TODO_COLUMNS}"
    ))
    .bind(&title)
    .bind(&description)
    .bind(state)
    .bind(todo_id)
    .bind(current_user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes one of the authenticated user's todos.
///
/// The delete is scoped by owner; a todo belonging to another user yields the
/// same 404 as a nonexistent one.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task has been deleted successfully"}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: `Task not found`.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
        .bind(todo_id.into_inner())
        .bind(current_user.0.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task has been deleted successfully" })))
}
