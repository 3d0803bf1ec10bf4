use sea_query::{Expr, Iden, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::DomainError;

/// The only access class issued for tokens
pub const ACCESS_AUTH: &str = "auth";

/// Schema definition for the users table
#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

/// Schema definition for the auth_tokens table
#[derive(Iden)]
pub enum AuthTokens {
    Table,
    Id,
    UserId,
    Access,
    Token,
    CreatedAt,
}

/// User entity
///
/// `password_hash` never leaves the service layer.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One entry in a user's token sequence
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access: String,
    pub token: String,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: [Users; 5] = [
    Users::Id,
    Users::Email,
    Users::PasswordHash,
    Users::CreatedAt,
    Users::UpdatedAt,
];

/// Repository for User operations, including the token sequence
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    ///
    /// Generic over the executor so signup can run it inside a transaction.
    /// The unique constraint on email surfaces as a database error when the
    /// address is already taken.
    pub async fn create<'e, E>(
        executor: E,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let (sql, values) = Query::insert()
            .into_table(Users::Table)
            .columns(USER_COLUMNS)
            .values_panic([
                id.into(),
                email.into(),
                password_hash.into(),
                now.into(),
                now.into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_one(executor)
            .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DomainError> {
        let (sql, values) = Query::select()
            .columns(USER_COLUMNS)
            .from(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DomainError> {
        let (sql, values) = Query::select()
            .columns(USER_COLUMNS)
            .from(Users::Table)
            .and_where(Expr::col(Users::Email).eq(email))
            .build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Append a token to a user's token sequence
    pub async fn add_token<'e, E>(
        executor: E,
        user_id: Uuid,
        token: &str,
    ) -> Result<AuthToken, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let (sql, values) = Query::insert()
            .into_table(AuthTokens::Table)
            .columns([
                AuthTokens::Id,
                AuthTokens::UserId,
                AuthTokens::Access,
                AuthTokens::Token,
                AuthTokens::CreatedAt,
            ])
            .values_panic([
                id.into(),
                user_id.into(),
                ACCESS_AUTH.into(),
                token.into(),
                now.into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, AuthToken, _>(&sql, values)
            .fetch_one(executor)
            .await?;

        Ok(row)
    }

    /// Resolve the user holding a token, if any
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<User>, DomainError> {
        let (sql, values) = Query::select()
            .columns([
                (Users::Table, Users::Id),
                (Users::Table, Users::Email),
                (Users::Table, Users::PasswordHash),
                (Users::Table, Users::CreatedAt),
                (Users::Table, Users::UpdatedAt),
            ])
            .from(Users::Table)
            .inner_join(
                AuthTokens::Table,
                Expr::col((AuthTokens::Table, AuthTokens::UserId))
                    .equals((Users::Table, Users::Id)),
            )
            .and_where(Expr::col((AuthTokens::Table, AuthTokens::Token)).eq(token))
            .and_where(Expr::col((AuthTokens::Table, AuthTokens::Access)).eq(ACCESS_AUTH))
            .build_sqlx(PostgresQueryBuilder);

        let user = sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Remove exactly one token value from a user's sequence
    ///
    /// Other tokens held by the same user are untouched.
    pub async fn remove_token(
        pool: &PgPool,
        user_id: Uuid,
        token: &str,
    ) -> Result<bool, DomainError> {
        let (sql, values) = Query::delete()
            .from_table(AuthTokens::Table)
            .and_where(Expr::col(AuthTokens::UserId).eq(user_id))
            .and_where(Expr::col(AuthTokens::Token).eq(token))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's tokens in append order
    pub async fn list_tokens(pool: &PgPool, user_id: Uuid) -> Result<Vec<AuthToken>, DomainError> {
        let (sql, values) = Query::select()
            .columns([
                AuthTokens::Id,
                AuthTokens::UserId,
                AuthTokens::Access,
                AuthTokens::Token,
                AuthTokens::CreatedAt,
            ])
            .from(AuthTokens::Table)
            .and_where(Expr::col(AuthTokens::UserId).eq(user_id))
            .order_by(AuthTokens::CreatedAt, sea_query::Order::Asc)
            .build_sqlx(PostgresQueryBuilder);

        let rows = sqlx::query_as_with::<_, AuthToken, _>(&sql, values)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }
}
