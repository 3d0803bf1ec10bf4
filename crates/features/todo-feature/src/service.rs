use domain::{Todo, TodoChanges, TodoRepository};
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::error::TodoFeatureError;

/// Input for creating a new todo
pub struct CreateTodoInput {
    pub user_id: Uuid,
    pub text: String,
}

/// Input for a partial todo update
///
/// Only `text` and `completed` are mutable; `completed_at` is always derived
/// server-side, never accepted from the caller.
pub struct UpdateTodoInput {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Service for todo operations, all scoped to the owning user
pub struct TodoService;

impl TodoService {
    /// Create a new todo for a user
    ///
    /// Text is trimmed before validation and storage; an empty result is
    /// rejected.
    pub async fn create(pool: &PgPool, input: CreateTodoInput) -> Result<Todo, TodoFeatureError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(TodoFeatureError::EmptyText);
        }

        let todo = TodoRepository::create(pool, input.user_id, text).await?;
        debug!(todo_id = %todo.id, user_id = %todo.user_id, "todo created");
        Ok(todo)
    }

    /// Get a todo by ID, visible only to its owner
    pub async fn get(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Todo, TodoFeatureError> {
        TodoRepository::find_owned(pool, id, user_id)
            .await?
            .ok_or(TodoFeatureError::NotFound(id))
    }

    /// List a user's todos, newest first
    pub async fn list_for_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Todo>, TodoFeatureError> {
        Ok(TodoRepository::list_by_owner(pool, user_id).await?)
    }

    /// Partially update an owned todo
    ///
    /// Completion is normalized before the write: `completed == true` stamps
    /// `completed_at` with the current time, anything else (false or absent)
    /// forces `completed = false` and clears `completed_at`. The write is a
    /// single statement filtered on `id AND user_id`.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        input: UpdateTodoInput,
    ) -> Result<Todo, TodoFeatureError> {
        let text = match input.text {
            Some(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(TodoFeatureError::EmptyText);
                }
                Some(text)
            }
            None => None,
        };

        let (completed, completed_at) = normalize_completion(input.completed, now_millis());

        TodoRepository::update_owned(
            pool,
            id,
            user_id,
            TodoChanges {
                text,
                completed,
                completed_at,
            },
        )
        .await?
        .ok_or(TodoFeatureError::NotFound(id))
    }

    /// Delete an owned todo, returning its final state
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Todo, TodoFeatureError> {
        TodoRepository::delete_owned(pool, id, user_id)
            .await?
            .ok_or(TodoFeatureError::NotFound(id))
    }
}

/// The completed/completedAt pairing rule
fn normalize_completion(completed: Option<bool>, now_millis: i64) -> (bool, Option<i64>) {
    if completed == Some(true) {
        (true, Some(now_millis))
    } else {
        (false, None)
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completing_stamps_the_clock() {
        assert_eq!(normalize_completion(Some(true), 1234), (true, Some(1234)));
    }

    #[test]
    fn uncompleting_clears_the_stamp() {
        assert_eq!(normalize_completion(Some(false), 1234), (false, None));
    }

    #[test]
    fn absent_flag_also_clears_the_stamp() {
        // A text-only patch resets completion; completed_at never goes stale.
        assert_eq!(normalize_completion(None, 1234), (false, None));
    }
}
