use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use todo_feature::{CreateTodoInput, TodoService, UpdateTodoInput};
use uuid::Uuid;

use super::parse_id;
use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::AppState;

/// Wire representation of a Todo
///
/// `completedAt` is omitted (not null) when the todo is not completed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoBody {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl From<domain::Todo> for TodoBody {
    fn from(todo: domain::Todo) -> Self {
        Self {
            id: todo.id,
            owner_id: todo.user_id,
            text: todo.text,
            completed: todo.completed,
            completed_at: todo.completed_at,
        }
    }
}

#[derive(Serialize)]
pub struct TodoDoc {
    pub todo: TodoBody,
}

#[derive(Serialize)]
pub struct TodoList {
    pub todos: Vec<TodoBody>,
}

// `text` is optional at the serde level so an empty body reaches the service
// and comes back as a 400 rather than a deserialization rejection.
#[derive(Deserialize)]
pub struct CreateTodoBody {
    #[serde(default)]
    pub text: Option<String>,
}

// Unknown fields (including a client-supplied completedAt) are ignored.
#[derive(Deserialize)]
pub struct UpdateTodoBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// POST /todos
pub async fn create_todo(
    State(state): State<AppState>,
    session: AuthSession,
    Json(body): Json<CreateTodoBody>,
) -> Result<Json<TodoBody>, ApiError> {
    let todo = TodoService::create(
        &state.pool,
        CreateTodoInput {
            user_id: session.user.id,
            text: body.text.unwrap_or_default(),
        },
    )
    .await?;

    Ok(Json(todo.into()))
}

/// GET /todos
pub async fn list_todos(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<TodoList>, ApiError> {
    let todos = TodoService::list_for_owner(&state.pool, session.user.id).await?;

    Ok(Json(TodoList {
        todos: todos.into_iter().map(Into::into).collect(),
    }))
}

/// GET /todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<Json<TodoDoc>, ApiError> {
    let id = parse_id(&id)?;
    let todo = TodoService::get(&state.pool, id, session.user.id).await?;

    Ok(Json(TodoDoc { todo: todo.into() }))
}

/// PATCH /todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
    Json(body): Json<UpdateTodoBody>,
) -> Result<Json<TodoDoc>, ApiError> {
    let id = parse_id(&id)?;
    let todo = TodoService::update(
        &state.pool,
        id,
        session.user.id,
        UpdateTodoInput {
            text: body.text,
            completed: body.completed,
        },
    )
    .await?;

    Ok(Json(TodoDoc { todo: todo.into() }))
}

/// DELETE /todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<Json<TodoDoc>, ApiError> {
    let id = parse_id(&id)?;
    let todo = TodoService::delete(&state.pool, id, session.user.id).await?;

    Ok(Json(TodoDoc { todo: todo.into() }))
}
