use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the lifecycle state of a todo item.
/// Corresponds to the `todo_state` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TodoState {
    /// Not yet committed to.
    Draft,
    /// Planned but not started.
    Todo,
    /// Currently being worked on.
    Doing,
    /// Finished.
    Done,
    /// Discarded without being done.
    Trash,
}

/// Input structure for creating a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters.
    #[validate(length(max = 1000))]
    pub description: String,

    pub state: TodoState,
}

/// Sparse update payload for a todo. Only fields present in the request body
/// are applied; absent fields leave the stored value untouched.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct TodoUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub state: Option<TodoState>,
}

/// Represents a todo item as stored in the database and returned by the API.
///
/// The owner's id is used for ownership-scoped queries but is not exposed in
/// responses.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing todos: substring filters on title and
/// description, an exact filter on state, plus pagination.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoFilter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}
