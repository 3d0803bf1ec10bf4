use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DomainError {
    /// True when the underlying database error is a unique-constraint
    /// violation (e.g. a duplicate email).
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DomainError::Database(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    }
}
