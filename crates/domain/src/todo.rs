use sea_query::{Expr, Iden, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::DomainError;

/// Schema definition for the todos table
#[derive(Iden)]
pub enum Todos {
    Table,
    Id,
    UserId,
    Text,
    Completed,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

/// Todo entity
///
/// `completed_at` is epoch milliseconds and is present exactly when
/// `completed` is true.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Field changes applied by [`TodoRepository::update_owned`].
///
/// `completed` and `completed_at` are always written as a pair; `text` is
/// only written when present.
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<i64>,
}

const TODO_COLUMNS: [Todos; 7] = [
    Todos::Id,
    Todos::UserId,
    Todos::Text,
    Todos::Completed,
    Todos::CompletedAt,
    Todos::CreatedAt,
    Todos::UpdatedAt,
];

/// Repository for Todo operations
///
/// Reads and writes that take an owner are scoped to `id AND user_id` inside
/// a single statement, so a foreign caller can never observe or mutate the
/// row between a lookup and a write.
pub struct TodoRepository;

impl TodoRepository {
    /// Create a new todo owned by `user_id`
    pub async fn create(pool: &PgPool, user_id: Uuid, text: &str) -> Result<Todo, DomainError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let (sql, values) = Query::insert()
            .into_table(Todos::Table)
            .columns(TODO_COLUMNS)
            .values_panic([
                id.into(),
                user_id.into(),
                text.into(),
                false.into(),
                Option::<i64>::None.into(),
                now.into(),
                now.into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, Todo, _>(&sql, values)
            .fetch_one(pool)
            .await?;

        Ok(row)
    }

    /// Find a todo by id, visible only to its owner
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Todo>, DomainError> {
        let (sql, values) = Query::select()
            .columns(TODO_COLUMNS)
            .from(Todos::Table)
            .and_where(Expr::col(Todos::Id).eq(id))
            .and_where(Expr::col(Todos::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, Todo, _>(&sql, values)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }

    /// List todos for an owner, newest first
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Todo>, DomainError> {
        let (sql, values) = Query::select()
            .columns(TODO_COLUMNS)
            .from(Todos::Table)
            .and_where(Expr::col(Todos::UserId).eq(user_id))
            .order_by(Todos::CreatedAt, sea_query::Order::Desc)
            .build_sqlx(PostgresQueryBuilder);

        let rows = sqlx::query_as_with::<_, Todo, _>(&sql, values)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }

    /// Apply changes to an owned todo in one filter-and-mutate statement
    ///
    /// Returns `None` when no row matches `id AND user_id`, whether the todo
    /// does not exist or belongs to someone else.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DomainError> {
        let now = OffsetDateTime::now_utc();

        let mut stmt = Query::update();
        stmt.table(Todos::Table).values([
            (Todos::Completed, changes.completed.into()),
            (Todos::CompletedAt, changes.completed_at.into()),
            (Todos::UpdatedAt, now.into()),
        ]);
        if let Some(text) = changes.text {
            stmt.value(Todos::Text, text);
        }
        let (sql, values) = stmt
            .and_where(Expr::col(Todos::Id).eq(id))
            .and_where(Expr::col(Todos::UserId).eq(user_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, Todo, _>(&sql, values)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }

    /// Delete an owned todo, returning the deleted row
    pub async fn delete_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Todo>, DomainError> {
        let (sql, values) = Query::delete()
            .from_table(Todos::Table)
            .and_where(Expr::col(Todos::Id).eq(id))
            .and_where(Expr::col(Todos::UserId).eq(user_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, Todo, _>(&sql, values)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }
}
